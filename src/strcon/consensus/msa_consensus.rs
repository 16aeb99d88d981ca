use crate::aligners::{ArtifactTokens, MsaProfile, MultipleAligner, MultipleAlignment, GAP};
use crate::strcon::{ConsensusParams, GapVotePolicy, LocusError};

/// Consensus of the reads in `group`. A single read is returned as is and
/// an empty group yields an empty consensus; otherwise the reads are aligned
/// and voted on column by column.
pub fn build_consensus(
    group: &[usize],
    seqs: &[&str],
    msa: &mut dyn MultipleAligner,
    tokens: &mut ArtifactTokens,
    params: &ConsensusParams,
) -> Result<String, LocusError> {
    match group {
        [] => return Ok(String::new()),
        [read] => return Ok(seqs[*read].to_string()),
        _ => {}
    }

    let labeled = group
        .iter()
        .map(|&read| (read.to_string(), seqs[read]))
        .collect::<Vec<_>>();
    let token = tokens.next_token();
    let alignment = msa.align(&labeled, MsaProfile::Consensus, &token)?;
    alignment.check_width()?;
    if alignment.rows.len() != group.len() {
        return Err(LocusError::UnparseableAlignment {
            reason: format!(
                "expected {} rows, found {}",
                group.len(),
                alignment.rows.len()
            ),
        });
    }

    let consensus = column_consensus(&alignment, params);
    log::trace!(
        "{}: consensus of {} reads: {}",
        token.locus_id,
        group.len(),
        consensus
    );
    Ok(consensus)
}

/// Gap-free consensus of an alignment, one vote per column.
pub fn column_consensus(alignment: &MultipleAlignment, params: &ConsensusParams) -> String {
    let consensus: Vec<u8> = (0..alignment.width())
        .filter_map(|index| vote_column(&alignment.column(index), params))
        .collect();
    String::from_utf8_lossy(&consensus).into_owned()
}

/// Winning base of one column, or `None` if the column contributes nothing.
pub fn vote_column(column: &[u8], params: &ConsensusParams) -> Option<u8> {
    let candidates: Vec<u8> = column
        .iter()
        .copied()
        .filter(|&symbol| symbol != params.filler_base)
        .filter(|&symbol| params.gap_vote == GapVotePolicy::Count || symbol != GAP)
        .collect();
    majority_vote(&candidates).filter(|&winner| winner != GAP)
}

/// Most frequent symbol; ties go to the symbol seen first.
pub fn majority_vote(symbols: &[u8]) -> Option<u8> {
    let mut counts: Vec<(u8, usize)> = Vec::new();
    for &symbol in symbols {
        match counts.iter_mut().find(|(seen, _)| *seen == symbol) {
            Some((_, count)) => *count += 1,
            None => counts.push((symbol, 1)),
        }
    }

    let mut winner: Option<(u8, usize)> = None;
    for (symbol, count) in counts {
        if winner.map_or(true, |(_, best)| count > best) {
            winner = Some((symbol, count));
        }
    }
    winner.map(|(symbol, _)| symbol)
}
