mod locus_consensus;
mod locus_result;

pub use locus_consensus::analyze_locus;
pub use locus_result::{AlleleConsensus, LocusResult};
