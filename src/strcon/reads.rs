use super::LocusError;

/// A read assigned to a locus, labeled with the allele it was declared to support.
#[derive(Debug, Clone, PartialEq)]
pub struct Read {
    pub index: usize,
    pub seq: String,
    /// Repeat-length offset relative to the reference.
    pub allele: i32,
    pub strand: String,
}

/// Decodes comma-joined `sequence:allele:strand[:...]` records.
pub fn parse_reads(encoding: &str) -> Result<Vec<Read>, LocusError> {
    if encoding.trim().is_empty() {
        return Ok(Vec::new());
    }
    encoding
        .split(',')
        .enumerate()
        .map(|(index, record)| parse_record(index, record))
        .collect()
}

fn parse_record(index: usize, record: &str) -> Result<Read, LocusError> {
    const MIN_FIELD_COUNT: usize = 3;
    let malformed = |reason: String| LocusError::MalformedReadRecord {
        record: record.to_string(),
        reason,
    };

    let fields: Vec<&str> = record.split(':').collect();
    if fields.len() < MIN_FIELD_COUNT {
        return Err(malformed(format!(
            "expected at least {} ':'-separated fields, found {}",
            MIN_FIELD_COUNT,
            fields.len()
        )));
    }

    let seq = fields[0].trim();
    if seq.is_empty() {
        return Err(malformed("empty sequence".to_string()));
    }
    let allele = fields[1]
        .trim()
        .parse::<i32>()
        .map_err(|e| malformed(format!("invalid allele '{}': {}", fields[1], e)))?;

    Ok(Read {
        index,
        seq: seq.to_uppercase(),
        allele,
        strand: fields[2].trim().to_string(),
    })
}
