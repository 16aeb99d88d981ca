use super::{AlleleConsensus, LocusResult};
use crate::aligners::{ArtifactTokens, MultipleAligner, PairwiseAligner};
use crate::strcon::{
    consensus::{
        align_to_reference, build_consensus, partition_reads, resolve_allele_count,
        DistanceMatrix,
    },
    ConsensusParams, Locus, LocusError,
};

/// Consensus sequence and reference edit script of both alleles at one locus.
///
/// Alleles of different declared lengths split the reads by similarity;
/// alleles of the same length are clustered to decide whether one or two
/// sequences are present. With one allele present both entries are equal.
pub fn analyze_locus(
    locus: &Locus,
    params: &ConsensusParams,
    pairwise: &mut dyn PairwiseAligner,
    msa: &mut dyn MultipleAligner,
) -> Result<LocusResult, LocusError> {
    let seqs = locus.seqs();
    log::debug!(
        "{}: {} reads, declared alleles {} / {}",
        locus.id,
        seqs.len(),
        locus.allele1,
        locus.allele2
    );
    let similarities = DistanceMatrix::build(&seqs, pairwise);
    let mut tokens = ArtifactTokens::new(&locus.id);

    let (num_alleles, partition) = if locus.allele1 != locus.allele2 {
        (2, partition_reads(locus, &similarities, params))
    } else {
        let reads = locus.reads_with_allele(locus.allele1);
        let call = resolve_allele_count(&reads, &similarities, params);
        log::debug!(
            "{}: {} allele(s) of length {} (separation {:?})",
            locus.id,
            call.num_alleles,
            locus.allele1,
            call.separation
        );
        (call.num_alleles, call.partition)
    };
    log::debug!(
        "{}: {} / {} reads assigned, {} discarded",
        locus.id,
        partition.allele1.len(),
        partition.allele2.len(),
        partition.discarded(seqs.len()).len()
    );

    let consensus1 = build_consensus(&partition.allele1, &seqs, msa, &mut tokens, params)?;
    let allele1 = align_to_reference(&consensus1, &locus.reference, msa, &mut tokens, params)?;

    let allele2 = if num_alleles == 1 {
        allele1.clone()
    } else {
        let consensus2 = build_consensus(&partition.allele2, &seqs, msa, &mut tokens, params)?;
        align_to_reference(&consensus2, &locus.reference, msa, &mut tokens, params)?
    };

    let mut alleles = AlleleConsensus::new();
    alleles.push(allele1);
    alleles.push(allele2);

    Ok(LocusResult {
        num_alleles,
        partition,
        alleles,
    })
}
