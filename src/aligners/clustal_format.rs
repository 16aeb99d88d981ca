use super::{AlignedRow, MultipleAlignment};
use crate::strcon::LocusError;
use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

pub fn write_labeled_fasta(path: &Path, seqs: &[(String, &str)]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for (label, seq) in seqs {
        writeln!(writer, ">{}", label)?;
        writeln!(writer, "{}", seq)?;
    }
    writer.flush()
}

/// Parses blocked (CLUSTAL-style) alignment text.
///
/// The first non-blank line is the header. Blocks are separated by blank
/// lines; each row is `label residues [count]`. Annotation rows, such as the
/// conservation line, start with whitespace and are skipped. Rows are joined
/// across blocks by label and returned in first-seen order.
pub fn parse_blocked_alignment(text: &str) -> Result<MultipleAlignment, LocusError> {
    let unparseable = |reason: String| LocusError::UnparseableAlignment { reason };

    let mut lines = text.lines();
    let header = lines
        .by_ref()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| unparseable("empty alignment output".to_string()))?;
    log::trace!("Alignment header: {}", header.trim());

    let mut rows: Vec<AlignedRow> = Vec::new();
    let mut row_by_label: HashMap<String, usize> = HashMap::new();
    for line in lines {
        if line.trim().is_empty() || line.starts_with(char::is_whitespace) {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (label, residues) = match (fields.next(), fields.next()) {
            (Some(label), Some(residues)) => (label, residues),
            _ => return Err(unparseable(format!("row without residues: '{}'", line))),
        };

        match row_by_label.get(label) {
            Some(&index) => rows[index].residues.extend_from_slice(residues.as_bytes()),
            None => {
                row_by_label.insert(label.to_string(), rows.len());
                rows.push(AlignedRow {
                    label: label.to_string(),
                    residues: residues.as_bytes().to_vec(),
                });
            }
        }
    }

    if rows.is_empty() {
        return Err(unparseable("no sequence rows".to_string()));
    }

    let alignment = MultipleAlignment { rows };
    alignment.check_width()?;
    Ok(alignment)
}
