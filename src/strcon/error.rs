use std::fmt;

/// Failure confined to a single locus. The batch runner logs these and
/// continues with the next locus.
#[derive(Debug, Clone, PartialEq)]
pub enum LocusError {
    MalformedReadRecord { record: String, reason: String },
    MalformedLocus { reason: String },
    EngineFailure { engine: String, reason: String },
    EngineTimeout { engine: String, seconds: u64 },
    UnparseableAlignment { reason: String },
    MissingAlignmentRow { label: String },
    InsufficientReferencePadding {
        side: FlankSide,
        found: usize,
        required: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlankSide {
    Left,
    Right,
}

impl fmt::Display for FlankSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlankSide::Left => write!(f, "left"),
            FlankSide::Right => write!(f, "right"),
        }
    }
}

impl fmt::Display for LocusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocusError::MalformedReadRecord { record, reason } => {
                write!(f, "Malformed read record '{}': {}", record, reason)
            }
            LocusError::MalformedLocus { reason } => write!(f, "Malformed locus: {}", reason),
            LocusError::EngineFailure { engine, reason } => {
                write!(f, "Alignment engine {} failed: {}", engine, reason)
            }
            LocusError::EngineTimeout { engine, seconds } => {
                write!(f, "Alignment engine {} timed out after {}s", engine, seconds)
            }
            LocusError::UnparseableAlignment { reason } => {
                write!(f, "Unable to parse alignment output: {}", reason)
            }
            LocusError::MissingAlignmentRow { label } => {
                write!(f, "Alignment output is missing row '{}'", label)
            }
            LocusError::InsufficientReferencePadding {
                side,
                found,
                required,
            } => write!(
                f,
                "Reference has {} aligned {} flank bases, {} required",
                found, side, required
            ),
        }
    }
}

impl std::error::Error for LocusError {}

impl From<LocusError> for String {
    fn from(err: LocusError) -> Self {
        err.to_string()
    }
}
