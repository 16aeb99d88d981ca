//! Defines the `TsvWriter` struct for writing per-locus consensus results.
//!

use crate::strcon::{workflows::LocusResult, Locus};
use crate::utils::Result;
use std::{
    fs::File,
    io::{BufWriter, Write},
};

const HEADER: [&str; 7] = [
    "#locus_id",
    "allele1",
    "allele2",
    "allele1_seq",
    "allele2_seq",
    "allele1_cigar",
    "allele2_cigar",
];

/// Tab-separated consensus table, one row per successfully analyzed locus.
pub struct TsvWriter<W: Write = BufWriter<File>> {
    writer: W,
    output_path: String,
}

impl TsvWriter {
    /// Creates the output file and writes the column header.
    ///
    /// # Arguments
    /// * `output_path` - Path of the output TSV file.
    pub fn new(output_path: &str) -> Result<TsvWriter> {
        let file = File::create(output_path)
            .map_err(|e| format!("Invalid TSV output path {}: {}", output_path, e))?;
        TsvWriter::from_writer(BufWriter::new(file), output_path)
    }
}

impl<W: Write> TsvWriter<W> {
    pub fn from_writer(mut writer: W, output_path: &str) -> Result<TsvWriter<W>> {
        writeln!(writer, "{}", HEADER.join("\t"))
            .map_err(|e| format!("Failed to write header to {}: {}", output_path, e))?;
        Ok(TsvWriter {
            writer,
            output_path: output_path.to_string(),
        })
    }

    /// Writes the consensus row of one locus.
    ///
    /// # Arguments
    /// * `locus` - `Locus` the result belongs to.
    /// * `result` - `LocusResult` holding both adjusted alleles.
    pub fn write(&mut self, locus: &Locus, result: &LocusResult) -> Result<()> {
        let (seq1, seq2, script1, script2) = result.to_tuple();
        writeln!(
            self.writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            locus.id, locus.allele1, locus.allele2, seq1, seq2, script1, script2
        )
        .map_err(|e| format!("Failed to write locus {} to {}: {}", locus.id, self.output_path, e))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| format!("Failed to flush {}: {}", self.output_path, e))
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
