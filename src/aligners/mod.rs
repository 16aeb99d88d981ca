//! Capability interfaces for the two alignment engines the consensus core
//! depends on, plus their production bindings.

mod clustal;
mod clustal_format;
mod pairwise;

pub use clustal::{ClustalAligner, ClustalConfig};
pub use clustal_format::{parse_blocked_alignment, write_labeled_fasta};
pub use pairwise::EndGapFreeAligner;

use crate::strcon::LocusError;

pub const GAP: u8 = b'-';

/// Scores a pair of sequences under global alignment with free terminal overhangs.
pub trait PairwiseAligner {
    /// Alignment identity in `[0, 1]`; symmetric in its arguments.
    fn similarity(&mut self, a: &[u8], b: &[u8]) -> f64;
}

/// Aligns a set of labeled sequences into equal-width rows.
pub trait MultipleAligner {
    fn align(
        &mut self,
        seqs: &[(String, &str)],
        profile: MsaProfile,
        token: &ArtifactToken,
    ) -> Result<MultipleAlignment, LocusError>;
}

/// Engine settings for the two kinds of multiple alignment the core requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsaProfile {
    /// Reads of one allele, engine defaults.
    Consensus,
    /// Consensus against the padded reference: free end gaps, costly gap
    /// opening, free gap extension.
    Reference,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    pub label: String,
    pub residues: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultipleAlignment {
    pub rows: Vec<AlignedRow>,
}

impl MultipleAlignment {
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |row| row.residues.len())
    }

    pub fn row(&self, label: &str) -> Option<&[u8]> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.residues.as_slice())
    }

    /// Shared row width; rows of differing widths are unparseable.
    pub fn check_width(&self) -> Result<usize, LocusError> {
        let width = self.width();
        match self.rows.iter().find(|row| row.residues.len() != width) {
            Some(row) => Err(LocusError::UnparseableAlignment {
                reason: format!(
                    "row '{}' has {} columns, expected {}",
                    row.label,
                    row.residues.len(),
                    width
                ),
            }),
            None => Ok(width),
        }
    }

    /// Symbols of column `index` in row order.
    pub fn column(&self, index: usize) -> Vec<u8> {
        self.rows.iter().map(|row| row.residues[index]).collect()
    }
}

/// Names the transient artifacts of one engine invocation. Unique per
/// (locus, call), so loci processed in parallel never share files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactToken {
    pub locus_id: String,
    pub call: usize,
}

impl ArtifactToken {
    pub fn stem(&self) -> String {
        const MAX_ID_LEN: usize = 40;
        let id: String = self
            .locus_id
            .chars()
            .take(MAX_ID_LEN)
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("{}-{}", id, self.call)
    }
}

/// Hands out consecutive call tokens for one locus.
#[derive(Debug)]
pub struct ArtifactTokens {
    locus_id: String,
    calls: usize,
}

impl ArtifactTokens {
    pub fn new(locus_id: &str) -> Self {
        ArtifactTokens {
            locus_id: locus_id.to_string(),
            calls: 0,
        }
    }

    pub fn next_token(&mut self) -> ArtifactToken {
        self.calls += 1;
        ArtifactToken {
            locus_id: self.locus_id.clone(),
            call: self.calls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_numbered_per_locus() {
        let mut tokens = ArtifactTokens::new("chr1:100-200");
        let first = tokens.next_token();
        let second = tokens.next_token();
        assert_eq!(first.stem(), "chr1_100_200-1");
        assert_eq!(second.stem(), "chr1_100_200-2");
    }

    #[test]
    fn alignment_row_lookup_by_label() {
        let alignment = MultipleAlignment {
            rows: vec![
                AlignedRow {
                    label: "allele".to_string(),
                    residues: b"AC-T".to_vec(),
                },
                AlignedRow {
                    label: "ref".to_string(),
                    residues: b"ACGT".to_vec(),
                },
            ],
        };
        assert_eq!(alignment.width(), 4);
        assert_eq!(alignment.row("ref"), Some(&b"ACGT"[..]));
        assert_eq!(alignment.row("read"), None);
        assert_eq!(alignment.column(2), b"-G".to_vec());
        assert_eq!(alignment.check_width(), Ok(4));
    }

    #[test]
    fn ragged_rows_fail_the_width_check() {
        let alignment = MultipleAlignment {
            rows: vec![
                AlignedRow {
                    label: "0".to_string(),
                    residues: b"ACGT".to_vec(),
                },
                AlignedRow {
                    label: "1".to_string(),
                    residues: b"ACG".to_vec(),
                },
            ],
        };
        assert!(matches!(
            alignment.check_width(),
            Err(LocusError::UnparseableAlignment { .. })
        ));
    }
}
