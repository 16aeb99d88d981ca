use super::PairwiseAligner;
use bio::alignment::pairwise::{Aligner, MatchParams, Scoring};
use bio::alignment::AlignmentOperation;

/// Global alignment where unaligned sequence ends cost nothing. At each end
/// only one of the two sequences may overhang, so mismatched end bases are
/// still aligned and counted. Identity is measured over the aligned core only.
pub struct EndGapFreeAligner {
    /// One aligner per choice of overhanging sequence at each end.
    aligners: Vec<Aligner<MatchParams>>,
}

impl EndGapFreeAligner {
    pub fn new() -> Self {
        Self::with_scores(-5, -1, 1, -1)
    }

    pub fn with_scores(gap_open: i32, gap_extend: i32, match_score: i32, mismatch: i32) -> Self {
        let aligners = [(true, true), (true, false), (false, true), (false, false)]
            .into_iter()
            .map(|(x_prefix_free, x_suffix_free)| {
                // Clips left at MIN_SCORE force that end of the sequence to align
                let mut scoring =
                    Scoring::from_scores(gap_open, gap_extend, match_score, mismatch);
                if x_prefix_free {
                    scoring.xclip_prefix = 0;
                } else {
                    scoring.yclip_prefix = 0;
                }
                if x_suffix_free {
                    scoring.xclip_suffix = 0;
                } else {
                    scoring.yclip_suffix = 0;
                }
                Aligner::with_scoring(scoring)
            })
            .collect();
        EndGapFreeAligner { aligners }
    }
}

impl Default for EndGapFreeAligner {
    fn default() -> Self {
        Self::new()
    }
}

impl PairwiseAligner for EndGapFreeAligner {
    fn similarity(&mut self, a: &[u8], b: &[u8]) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        // Traceback ties depend on argument order
        let (x, y) = if (a.len(), a) <= (b.len(), b) {
            (a, b)
        } else {
            (b, a)
        };
        self.aligners
            .iter_mut()
            .map(|aligner| aligner.custom(x, y))
            .reduce(|best, candidate| {
                if candidate.score > best.score {
                    candidate
                } else {
                    best
                }
            })
            .map_or(0.0, |alignment| identity(&alignment.operations))
    }
}

fn identity(operations: &[AlignmentOperation]) -> f64 {
    let mut matches = 0;
    let mut columns = 0;
    for op in operations {
        match op {
            AlignmentOperation::Match => {
                matches += 1;
                columns += 1;
            }
            AlignmentOperation::Subst | AlignmentOperation::Del | AlignmentOperation::Ins => {
                columns += 1
            }
            AlignmentOperation::Xclip(_) | AlignmentOperation::Yclip(_) => {}
        }
    }
    if columns == 0 {
        0.0
    } else {
        matches as f64 / columns as f64
    }
}
