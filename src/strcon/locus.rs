use super::{parse_reads, LocusError, Read};
use crate::utils::{open_locus_reader, Result};
use crossbeam_channel::Sender;
use std::{io::BufRead, path::Path};

/// One STR locus: declared alleles, the flank-padded reference and the reads
/// already assigned to it.
#[derive(Debug, Clone)]
pub struct Locus {
    pub id: String,
    pub allele1: i32,
    pub allele2: i32,
    pub reference: String,
    pub reads: Vec<Read>,
}

impl Locus {
    /// Decodes a `locus_id allele1 allele2 padded_reference reads` line.
    pub fn from_line(line: &str) -> std::result::Result<Self, LocusError> {
        const EXPECTED_FIELD_COUNT: usize = 5;
        let split_line: Vec<&str> = line.split('\t').collect();
        if split_line.len() != EXPECTED_FIELD_COUNT {
            return Err(LocusError::MalformedLocus {
                reason: format!(
                    "Expected {} tab-separated fields in the format 'id allele1 allele2 reference reads', found {}",
                    EXPECTED_FIELD_COUNT,
                    split_line.len()
                ),
            });
        }

        let (id, allele1, allele2, reference, reads) = match &split_line[..] {
            [id, allele1, allele2, reference, reads] => (*id, *allele1, *allele2, *reference, *reads),
            _ => unreachable!(),
        };

        let parse_allele = |value: &str| {
            value
                .trim()
                .parse::<i32>()
                .map_err(|e| LocusError::MalformedLocus {
                    reason: format!("Invalid allele '{}' at locus {}: {}", value, id, e),
                })
        };

        let reference = reference.trim().to_uppercase();
        if reference.is_empty() {
            return Err(LocusError::MalformedLocus {
                reason: format!("Empty reference at locus {}", id),
            });
        }

        Ok(Locus {
            id: id.trim().to_string(),
            allele1: parse_allele(allele1)?,
            allele2: parse_allele(allele2)?,
            reference,
            reads: parse_reads(reads)?,
        })
    }

    pub fn seqs(&self) -> Vec<&str> {
        self.reads.iter().map(|r| r.seq.as_str()).collect()
    }

    /// Indexes of the reads declared for `allele`, in read order.
    pub fn reads_with_allele(&self, allele: i32) -> Vec<usize> {
        self.reads
            .iter()
            .filter(|r| r.allele == allele)
            .map(|r| r.index)
            .collect()
    }
}

fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

pub fn stream_loci_into_channel(loci_path: &Path, sender: Sender<Result<Locus>>) -> Result<()> {
    let locus_reader = open_locus_reader(loci_path)?;

    for (line_number, result_line) in locus_reader.lines().enumerate() {
        let line = result_line.map_err(|e| format!("Error at line {}: {}", line_number + 1, e))?;
        if is_skippable(&line) {
            continue;
        }

        let locus = Locus::from_line(&line)
            .map_err(|e| format!("Error at line {}: {}", line_number + 1, e));
        if sender.send(locus).is_err() {
            return Err("Locus receiver disconnected".to_string());
        }
    }
    Ok(())
}
