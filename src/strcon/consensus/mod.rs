mod allele_count;
mod dist_matrix;
mod edit_script;
mod msa_consensus;
mod partition;
mod ref_align;

pub use allele_count::{resolve_allele_count, AlleleCountCall, ClusterForest, ClusterNode};
pub use dist_matrix::DistanceMatrix;
pub use edit_script::{EditOp, EditScript};
pub use msa_consensus::{build_consensus, column_consensus, majority_vote, vote_column};
pub use partition::{partition_reads, Partition};
pub use ref_align::{
    align_to_reference, build_edit_script, trim_alignment, AdjustedAllele, ALLELE_LABEL,
    REF_LABEL,
};
