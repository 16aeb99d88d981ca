use crate::aligners::PairwiseAligner;

/// Symmetric all-vs-all similarity of the reads at one locus. Despite the
/// name the entries are similarities: higher means more alike.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    num_seqs: usize,
    scores: Vec<f64>,
}

impl DistanceMatrix {
    /// Aligns every unordered pair, self-pairs included.
    pub fn build(seqs: &[&str], aligner: &mut dyn PairwiseAligner) -> Self {
        let num_seqs = seqs.len();
        let mut scores = vec![0.0; num_seqs * num_seqs];
        for i in 0..num_seqs {
            for j in i..num_seqs {
                let score = aligner.similarity(seqs[i].as_bytes(), seqs[j].as_bytes());
                scores[i * num_seqs + j] = score;
                scores[j * num_seqs + i] = score;
            }
        }
        let matrix = DistanceMatrix { num_seqs, scores };
        if log::log_enabled!(log::Level::Trace) {
            for i in 0..num_seqs {
                log::trace!("{:?}", matrix.row(i));
            }
        }
        matrix
    }

    /// Builds a matrix from precomputed rows; the rows must form a symmetric square.
    #[cfg(test)]
    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let num_seqs = rows.len();
        assert!(rows.iter().all(|row| row.len() == num_seqs));
        let scores = rows.iter().flatten().copied().collect();
        DistanceMatrix { num_seqs, scores }
    }

    pub fn len(&self) -> usize {
        self.num_seqs
    }

    pub fn is_empty(&self) -> bool {
        self.num_seqs == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.scores[i * self.num_seqs + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.scores[i * self.num_seqs..(i + 1) * self.num_seqs]
    }

    /// Mean similarity of `read` to each member of `group`; 0 for an empty group.
    pub fn avg_similarity(&self, read: usize, group: &[usize]) -> f64 {
        if group.is_empty() {
            return 0.0;
        }
        let total: f64 = group.iter().map(|&other| self.get(read, other)).sum();
        total / group.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aligners::EndGapFreeAligner;

    #[test]
    fn matrix_is_symmetric_with_self_identity_diagonal() {
        let seqs = ["CAGCAGCAGCAG", "CAGCAGCAGCAGCAG", "CAGCATCAGCAG", "TTTTTTTT"];
        let mut aligner = EndGapFreeAligner::new();
        let dists = DistanceMatrix::build(&seqs, &mut aligner);
        assert_eq!(dists.len(), 4);
        for i in 0..seqs.len() {
            assert_eq!(dists.get(i, i), aligner.similarity(seqs[i].as_bytes(), seqs[i].as_bytes()));
            for j in 0..seqs.len() {
                assert_eq!(dists.get(i, j), dists.get(j, i));
            }
        }
        assert_eq!(dists.get(0, 1), 1.0);
        assert!(dists.get(0, 2) < 1.0);
    }

    #[test]
    fn no_reads_no_matrix() {
        let mut aligner = EndGapFreeAligner::new();
        let dists = DistanceMatrix::build(&[], &mut aligner);
        assert!(dists.is_empty());
    }

    #[test]
    fn average_similarity_to_group() {
        let dists = DistanceMatrix::from_rows(&[
            vec![1.0, 0.9, 0.7],
            vec![0.9, 1.0, 0.5],
            vec![0.7, 0.5, 1.0],
        ]);
        assert!((dists.avg_similarity(0, &[1, 2]) - 0.8).abs() < 1e-12);
        assert_eq!(dists.avg_similarity(0, &[]), 0.0);
    }
}
