use crate::strcon::consensus::{AdjustedAllele, Partition};
use arrayvec::ArrayVec;

pub type AlleleConsensus = ArrayVec<AdjustedAllele, 2>;

#[derive(Debug, Clone, PartialEq)]
pub struct LocusResult {
    /// Alleles found among the reads: 2 unless a shared length resolved to one.
    pub num_alleles: usize,
    pub partition: Partition,
    pub alleles: AlleleConsensus,
}

impl LocusResult {
    /// `(allele1_seq, allele2_seq, allele1_script, allele2_script)`
    pub fn to_tuple(&self) -> (String, String, String, String) {
        let field = |index: usize| {
            self.alleles
                .get(index)
                .map(|allele| (allele.seq.clone(), allele.script.to_string()))
                .unwrap_or_default()
        };
        let (seq1, script1) = field(0);
        let (seq2, script2) = field(1);
        (seq1, seq2, script1, script2)
    }
}
