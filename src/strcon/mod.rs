pub mod consensus;
mod error;
pub mod locus;
mod params;
mod reads;
#[cfg(test)]
pub mod test_utils;
pub mod workflows;
pub mod writers;

pub use error::{FlankSide, LocusError};
pub use locus::Locus;
pub use params::{ConsensusParams, GapVotePolicy};
pub use reads::{parse_reads, Read};
