use super::DistanceMatrix;
use crate::strcon::{ConsensusParams, Locus};

/// Read indexes assigned to each allele. A read in neither set was discarded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub allele1: Vec<usize>,
    pub allele2: Vec<usize>,
}

impl Partition {
    pub fn new(allele1: Vec<usize>, allele2: Vec<usize>) -> Self {
        let partition = Partition { allele1, allele2 };
        debug_assert!(partition.is_disjoint());
        partition
    }

    pub fn is_disjoint(&self) -> bool {
        !self.allele1.iter().any(|read| self.allele2.contains(read))
    }

    pub fn contains(&self, read: usize) -> bool {
        self.allele1.contains(&read) || self.allele2.contains(&read)
    }

    /// Reads among `0..num_reads` assigned to neither allele.
    pub fn discarded(&self, num_reads: usize) -> Vec<usize> {
        (0..num_reads).filter(|&read| !self.contains(read)).collect()
    }
}

/// Splits reads between two alleles of different lengths. Reads labeled with
/// either allele seed its set; every other read joins the set it is more
/// similar to on average (ties go to allele 2), unless both averages fall
/// below `min_similarity`. Sets grow as reads are assigned, in read order.
pub fn partition_reads(
    locus: &Locus,
    similarities: &DistanceMatrix,
    params: &ConsensusParams,
) -> Partition {
    let mut allele1 = locus.reads_with_allele(locus.allele1);
    let mut allele2 = locus.reads_with_allele(locus.allele2);

    for read in &locus.reads {
        if read.allele == locus.allele1 || read.allele == locus.allele2 {
            continue;
        }

        let sim1 = similarities.avg_similarity(read.index, &allele1);
        let sim2 = similarities.avg_similarity(read.index, &allele2);
        if sim1.max(sim2) < params.min_similarity {
            log::debug!(
                "{}: Read {} discarded (similarity {:.3} / {:.3})",
                locus.id,
                read.seq,
                sim1,
                sim2
            );
        } else if sim1 > sim2 {
            allele1.push(read.index);
        } else {
            allele2.push(read.index);
        }
    }

    Partition::new(allele1, allele2)
}
