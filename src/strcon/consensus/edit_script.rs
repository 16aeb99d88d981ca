use crate::aligners::GAP;
use itertools::Itertools;
use std::{fmt, str::FromStr};

/// Relation of one allele column to the reference column it is aligned with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Match,
    Mismatch,
    /// Base present in the allele only.
    Insertion,
    /// Base present in the reference only.
    Deletion,
}

impl EditOp {
    pub fn classify(allele: u8, reference: u8) -> Self {
        if allele == reference {
            EditOp::Match
        } else if allele == GAP {
            EditOp::Deletion
        } else if reference == GAP {
            EditOp::Insertion
        } else {
            EditOp::Mismatch
        }
    }

    pub fn as_char(self) -> char {
        match self {
            EditOp::Match => 'M',
            EditOp::Mismatch => 'm',
            EditOp::Insertion => 'I',
            EditOp::Deletion => 'D',
        }
    }

    pub fn from_char(op: char) -> Option<Self> {
        match op {
            'M' => Some(EditOp::Match),
            'm' => Some(EditOp::Mismatch),
            'I' => Some(EditOp::Insertion),
            'D' => Some(EditOp::Deletion),
            _ => None,
        }
    }
}

/// Run-length encoded edit operations of an allele against the reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditScript {
    runs: Vec<(usize, EditOp)>,
}

impl EditScript {
    pub fn from_ops<I: IntoIterator<Item = EditOp>>(ops: I) -> Self {
        let runs = ops
            .into_iter()
            .chunk_by(|op| *op)
            .into_iter()
            .map(|(op, group)| (group.count(), op))
            .collect();
        EditScript { runs }
    }

    pub fn runs(&self) -> &[(usize, EditOp)] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Number of alignment columns covered.
    pub fn aligned_len(&self) -> usize {
        self.runs.iter().map(|(count, _)| count).sum()
    }

    pub fn expand(&self) -> Vec<EditOp> {
        self.runs
            .iter()
            .flat_map(|&(count, op)| std::iter::repeat(op).take(count))
            .collect()
    }
}

impl fmt::Display for EditScript {
    /// A one-column script is written as the bare operation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [(1, op)] = self.runs[..] {
            return write!(f, "{}", op.as_char());
        }
        for (count, op) in &self.runs {
            write!(f, "{}{}", count, op.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for EditScript {
    type Err = String;

    fn from_str(encoding: &str) -> Result<Self, Self::Err> {
        let mut runs: Vec<(usize, EditOp)> = Vec::new();
        let mut count = String::new();
        for symbol in encoding.chars() {
            if symbol.is_ascii_digit() {
                count.push(symbol);
                continue;
            }
            let op = EditOp::from_char(symbol)
                .ok_or_else(|| format!("Invalid operation '{}' in edit script {}", symbol, encoding))?;
            let run_len = if count.is_empty() && encoding.len() == 1 {
                1
            } else {
                count
                    .parse::<usize>()
                    .map_err(|_| format!("Missing run length in edit script {}", encoding))?
            };
            if run_len == 0 {
                return Err(format!("Zero-length run in edit script {}", encoding));
            }
            match runs.last_mut() {
                Some((last_count, last_op)) if *last_op == op => *last_count += run_len,
                _ => runs.push((run_len, op)),
            }
            count.clear();
        }
        if !count.is_empty() {
            return Err(format!("Dangling run length in edit script {}", encoding));
        }
        Ok(EditScript { runs })
    }
}
