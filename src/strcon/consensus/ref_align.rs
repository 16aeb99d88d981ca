use super::{EditOp, EditScript};
use crate::aligners::{ArtifactTokens, MsaProfile, MultipleAligner, GAP};
use crate::strcon::{ConsensusParams, FlankSide, LocusError};

pub const REF_LABEL: &str = "ref";
pub const ALLELE_LABEL: &str = "allele";

/// Gap-free allele sequence and its edit script against the unpadded reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjustedAllele {
    pub seq: String,
    pub script: EditScript,
}

/// Aligns a consensus to the flank-padded reference and reports it relative
/// to the locus span. An empty consensus is reported as is.
pub fn align_to_reference(
    consensus: &str,
    reference: &str,
    msa: &mut dyn MultipleAligner,
    tokens: &mut ArtifactTokens,
    params: &ConsensusParams,
) -> Result<AdjustedAllele, LocusError> {
    if consensus.is_empty() {
        return Ok(AdjustedAllele::default());
    }

    let seqs = [
        (REF_LABEL.to_string(), reference),
        (ALLELE_LABEL.to_string(), consensus),
    ];
    let token = tokens.next_token();
    let alignment = msa.align(&seqs, MsaProfile::Reference, &token)?;
    alignment.check_width()?;
    let missing = |label: &str| LocusError::MissingAlignmentRow {
        label: label.to_string(),
    };
    let ref_row = alignment.row(REF_LABEL).ok_or_else(|| missing(REF_LABEL))?;
    let allele_row = alignment
        .row(ALLELE_LABEL)
        .ok_or_else(|| missing(ALLELE_LABEL))?;
    log::trace!(
        "{}: allele {}",
        token.locus_id,
        String::from_utf8_lossy(allele_row)
    );
    log::trace!(
        "{}: ref    {}",
        token.locus_id,
        String::from_utf8_lossy(ref_row)
    );

    let (ref_row, allele_row) = trim_alignment(ref_row, allele_row, params.flank_padding)?;
    Ok(build_edit_script(ref_row, allele_row))
}

/// Drops columns outside the locus span: leading and trailing columns where
/// the reference is a gap, then `padding` reference bases from each end
/// together with any columns interleaved with them.
pub fn trim_alignment<'a>(
    reference: &'a [u8],
    allele: &'a [u8],
    padding: usize,
) -> Result<(&'a [u8], &'a [u8]), LocusError> {
    if reference.len() != allele.len() {
        return Err(LocusError::UnparseableAlignment {
            reason: format!(
                "reference row has {} columns, allele row has {}",
                reference.len(),
                allele.len()
            ),
        });
    }
    let insufficient = |side, found| LocusError::InsufficientReferencePadding {
        side,
        found,
        required: padding,
    };

    let (first, last) = match (
        reference.iter().position(|&b| b != GAP),
        reference.iter().rposition(|&b| b != GAP),
    ) {
        (Some(first), Some(last)) => (first, last),
        _ if padding == 0 => return Ok((&reference[..0], &allele[..0])),
        _ => return Err(insufficient(FlankSide::Left, 0)),
    };
    let (reference, allele) = (&reference[first..=last], &allele[first..=last]);

    let start = left_cut(reference, padding)
        .ok_or_else(|| insufficient(FlankSide::Left, count_bases(reference)))?;
    let end = right_cut(&reference[start..], padding)
        .ok_or_else(|| insufficient(FlankSide::Right, count_bases(&reference[start..])))?
        + start;

    Ok((&reference[start..end], &allele[start..end]))
}

fn count_bases(row: &[u8]) -> usize {
    row.iter().filter(|&&b| b != GAP).count()
}

/// Index just past the `padding`-th reference base.
fn left_cut(reference: &[u8], padding: usize) -> Option<usize> {
    if padding == 0 {
        return Some(0);
    }
    reference
        .iter()
        .enumerate()
        .filter(|(_, &b)| b != GAP)
        .nth(padding - 1)
        .map(|(index, _)| index + 1)
}

/// Index of the `padding`-th reference base counted from the end.
fn right_cut(reference: &[u8], padding: usize) -> Option<usize> {
    if padding == 0 {
        return Some(reference.len());
    }
    reference
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, &b)| b != GAP)
        .nth(padding - 1)
        .map(|(index, _)| index)
}

/// Classifies each aligned column and removes gaps from the allele.
pub fn build_edit_script(reference: &[u8], allele: &[u8]) -> AdjustedAllele {
    let script = EditScript::from_ops(
        allele
            .iter()
            .zip(reference)
            .map(|(&a, &r)| EditOp::classify(a, r)),
    );
    let seq = allele
        .iter()
        .filter(|&&b| b != GAP)
        .map(|&b| b as char)
        .collect();
    AdjustedAllele { seq, script }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aligners::{AlignedRow, MultipleAlignment};
    use crate::strcon::test_utils::ScriptedMsa;

    const LEFT_FLANK: &str = "GATTACAGGCTTACG";
    const RIGHT_FLANK: &str = "TCCGATGGAACTTGA";

    fn rows(reference: &str, allele: &str) -> MultipleAlignment {
        MultipleAlignment {
            rows: vec![
                AlignedRow {
                    label: ALLELE_LABEL.to_string(),
                    residues: allele.as_bytes().to_vec(),
                },
                AlignedRow {
                    label: REF_LABEL.to_string(),
                    residues: reference.as_bytes().to_vec(),
                },
            ],
        }
    }

    #[test]
    fn empty_alignment_gives_empty_result() {
        let adjusted = build_edit_script(b"", b"");
        assert_eq!(adjusted.seq, "");
        assert_eq!(adjusted.script.to_string(), "");
    }

    #[test]
    fn single_column_has_bare_op() {
        let adjusted = build_edit_script(b"A", b"C");
        assert_eq!(adjusted.seq, "C");
        assert_eq!(adjusted.script.to_string(), "m");
    }

    #[test]
    fn trims_end_gaps_and_padding() {
        let reference = b"--AAACAGCAGTTT--";
        let allele = b"GGAAACAG---TTTCC";
        let (r, a) = trim_alignment(reference, allele, 3).unwrap();
        assert_eq!(r, b"CAGCAG");
        assert_eq!(a, b"CAG---");
    }

    #[test]
    fn columns_inside_padding_are_dropped() {
        let reference = b"AA-ACAGT-TT";
        let allele = b"AAGACTGTCTT";
        let (r, a) = trim_alignment(reference, allele, 3).unwrap();
        assert_eq!(r, b"CAG");
        assert_eq!(a, b"CTG");
    }

    #[test]
    fn insertion_next_to_padding_is_kept() {
        let reference = b"AAA--CAGTTT";
        let allele = b"AAAGGCAGTTT";
        let (r, a) = trim_alignment(reference, allele, 3).unwrap();
        assert_eq!(build_edit_script(r, a).script.to_string(), "2I3M");
    }

    #[test]
    fn short_padding_err() {
        let result = trim_alignment(b"AACAG", b"AACAG", 3);
        assert_eq!(
            result,
            Err(LocusError::InsufficientReferencePadding {
                side: FlankSide::Right,
                found: 2,
                required: 3,
            })
        );
        assert!(matches!(
            trim_alignment(b"A-", b"AC", 3),
            Err(LocusError::InsufficientReferencePadding {
                side: FlankSide::Left,
                found: 1,
                ..
            })
        ));
    }

    #[test]
    fn exact_padding_leaves_nothing() {
        let (r, a) = trim_alignment(b"AAATTT", b"AAATTT", 3).unwrap();
        let adjusted = build_edit_script(r, a);
        assert_eq!((adjusted.seq.as_str(), adjusted.script.to_string().as_str()), ("", ""));
    }

    #[test]
    fn allele_identical_to_locus_span_is_all_match() {
        let span = "CAGCAGCAGCAGCAG";
        let reference = format!("{}{}{}", LEFT_FLANK, span, RIGHT_FLANK);
        let mut msa = ScriptedMsa::default();
        let mut tokens = ArtifactTokens::new("locus");
        let adjusted = align_to_reference(
            span,
            &reference,
            &mut msa,
            &mut tokens,
            &ConsensusParams::default(),
        )
        .unwrap();
        assert_eq!(adjusted.seq, span);
        assert_eq!(adjusted.script.runs(), &[(span.len(), EditOp::Match)]);
        assert_eq!(msa.requests()[0].profile, MsaProfile::Reference);
    }

    #[test]
    fn scripted_alignment_is_trimmed_and_encoded() {
        let reference = format!("{}CAGCAGCAG{}", LEFT_FLANK, RIGHT_FLANK);
        let ref_row = format!("---{}CAGCAGCAG---{}", LEFT_FLANK, RIGHT_FLANK);
        let allele_row = format!("TTT{}CAGCTG---CAG{}", LEFT_FLANK, &RIGHT_FLANK[..4]);
        let allele_row = format!("{}{}", allele_row, "-".repeat(ref_row.len() - allele_row.len()));
        let mut msa = ScriptedMsa::with_responses(vec![Ok(rows(&ref_row, &allele_row))]);
        let mut tokens = ArtifactTokens::new("locus");
        let adjusted = align_to_reference(
            "unused",
            &reference,
            &mut msa,
            &mut tokens,
            &ConsensusParams::default(),
        )
        .unwrap();
        assert_eq!(adjusted.seq, "CAGCTGCAG");
        assert_eq!(adjusted.script.to_string(), "4M1m1M3D3I");
    }

    #[test]
    fn empty_consensus_skips_engine() {
        let mut msa = ScriptedMsa::default();
        let mut tokens = ArtifactTokens::new("locus");
        let adjusted =
            align_to_reference("", "ACGT", &mut msa, &mut tokens, &ConsensusParams::default())
                .unwrap();
        assert_eq!(adjusted, AdjustedAllele::default());
        assert_eq!(msa.calls(), 0);
    }

    #[test]
    fn missing_row_err() {
        let mut alignment = rows("ACGT", "ACGT");
        alignment.rows[1].label = "reference".to_string();
        let mut msa = ScriptedMsa::with_responses(vec![Ok(alignment)]);
        let mut tokens = ArtifactTokens::new("locus");
        let result =
            align_to_reference("ACGT", "ACGT", &mut msa, &mut tokens, &ConsensusParams::default());
        assert_eq!(
            result,
            Err(LocusError::MissingAlignmentRow {
                label: REF_LABEL.to_string()
            })
        );
    }

    #[test]
    fn ragged_reference_rows_are_unparseable() {
        let reference = format!("{}CAG{}", LEFT_FLANK, RIGHT_FLANK);
        let mut msa = ScriptedMsa::with_responses(vec![Ok(rows(&reference, "CAG"))]);
        let mut tokens = ArtifactTokens::new("locus");
        let result = align_to_reference(
            "CAG",
            &reference,
            &mut msa,
            &mut tokens,
            &ConsensusParams::default(),
        );
        assert!(matches!(
            result,
            Err(LocusError::UnparseableAlignment { .. })
        ));
        assert!(matches!(
            trim_alignment(b"AAACAGTTT", b"CAG", 3),
            Err(LocusError::UnparseableAlignment { .. })
        ));
    }
}
