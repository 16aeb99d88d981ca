use std::str::FromStr;

/// How gap symbols take part in the per-column majority vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapVotePolicy {
    /// Gaps are removed before voting; a column survives if any base is present.
    Exclude,
    /// Gaps vote like bases; a winning gap drops the column.
    Count,
}

impl FromStr for GapVotePolicy {
    type Err = &'static str;
    fn from_str(policy: &str) -> Result<Self, Self::Err> {
        match policy {
            "exclude" => Ok(GapVotePolicy::Exclude),
            "count" => Ok(GapVotePolicy::Count),
            _ => Err("Invalid gap vote policy. Options are: exclude, count"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConsensusParams {
    /// Reads whose average similarity to both alleles is below this are discarded.
    pub min_similarity: f64,
    /// Two same-length clusters further apart than this are reported as two alleles.
    pub max_distance: f64,
    /// Bases of flank padding on each side of the reference.
    pub flank_padding: usize,
    pub gap_vote: GapVotePolicy,
    /// Ambiguous-base filler that never wins a column.
    pub filler_base: u8,
}

impl Default for ConsensusParams {
    fn default() -> Self {
        ConsensusParams {
            min_similarity: 0.85,
            max_distance: 0.05,
            flank_padding: 15,
            gap_vote: GapVotePolicy::Exclude,
            filler_base: b'N',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_policy_from_valid_string_ok() {
        assert_eq!("exclude".parse::<GapVotePolicy>(), Ok(GapVotePolicy::Exclude));
        assert_eq!("count".parse::<GapVotePolicy>(), Ok(GapVotePolicy::Count));
    }

    #[test]
    fn gap_policy_from_invalid_string_err() {
        assert!("majority".parse::<GapVotePolicy>().is_err());
    }
}
