use super::{DistanceMatrix, Partition};
use crate::strcon::ConsensusParams;

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterNode {
    /// Colon-joined names of the merged reads.
    pub name: String,
    pub members: Vec<usize>,
}

/// Agglomerative clustering state: an arena of group nodes plus a cached
/// lower-triangular distance table. Only the row of a newly merged node is
/// computed on each step.
#[derive(Debug, Clone)]
pub struct ClusterForest {
    nodes: Vec<ClusterNode>,
    /// Live node ids in scan order; a merged node is appended last.
    active: Vec<usize>,
    /// `dists[a][b]` for `b < a`.
    dists: Vec<Vec<f64>>,
}

impl ClusterForest {
    /// Starts one singleton per read; the distance between reads is
    /// `1 - similarity`.
    pub fn new(reads: &[usize], similarities: &DistanceMatrix) -> Self {
        let nodes = reads
            .iter()
            .map(|&read| ClusterNode {
                name: read.to_string(),
                members: vec![read],
            })
            .collect();
        let dists = reads
            .iter()
            .enumerate()
            .map(|(a, &read_a)| {
                reads[..a]
                    .iter()
                    .map(|&read_b| 1.0 - similarities.get(read_a, read_b))
                    .collect()
            })
            .collect();
        ClusterForest {
            nodes,
            active: (0..reads.len()).collect(),
            dists,
        }
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn groups(&self) -> impl Iterator<Item = &ClusterNode> {
        self.active.iter().map(|&id| &self.nodes[id])
    }

    fn distance(&self, a: usize, b: usize) -> f64 {
        if a > b {
            self.dists[a][b]
        } else {
            self.dists[b][a]
        }
    }

    /// Positions in `active` of the closest pair. Ties go to the pair seen
    /// last in row-major scan order.
    fn closest_pair(&self) -> Option<(usize, usize, f64)> {
        let mut best = None;
        let mut min_dist = f64::INFINITY;
        for i in 0..self.active.len() {
            for j in (i + 1)..self.active.len() {
                let dist = self.distance(self.active[i], self.active[j]);
                if dist <= min_dist {
                    min_dist = dist;
                    best = Some((i, j, dist));
                }
            }
        }
        best
    }

    /// Merges the closest pair; the merged node's distance to any other node
    /// is the mean of its two constituents' distances. Returns the merge
    /// distance, or `None` when fewer than two groups are left.
    pub fn merge_closest(&mut self) -> Option<f64> {
        let (i, j, dist) = self.closest_pair()?;
        let (a, b) = (self.active[i], self.active[j]);

        self.active.remove(j);
        self.active.remove(i);

        let merged_id = self.nodes.len();
        let mut row = vec![f64::NAN; merged_id];
        for &other in &self.active {
            row[other] = (self.distance(a, other) + self.distance(b, other)) / 2.0;
        }
        self.dists.push(row);

        let name = format!("{}:{}", self.nodes[a].name, self.nodes[b].name);
        let members = self.nodes[a]
            .members
            .iter()
            .chain(&self.nodes[b].members)
            .copied()
            .collect();
        log::trace!("Merged {} at distance {:.4}", name, dist);
        self.nodes.push(ClusterNode { name, members });
        self.active.push(merged_id);

        Some(dist)
    }

    /// Distance between the first two live groups.
    pub fn separation(&self) -> Option<f64> {
        match self.active[..] {
            [a, b, ..] => Some(self.distance(a, b)),
            _ => None,
        }
    }
}

/// Outcome of resolving how many alleles share one declared length.
#[derive(Debug, Clone, PartialEq)]
pub struct AlleleCountCall {
    pub num_alleles: usize,
    pub partition: Partition,
    /// Distance between the final two clusters, when clustering ran.
    pub separation: Option<f64>,
}

/// Decides whether the reads labeled with the shared allele length carry one
/// allele or two. The split is a heuristic: calls near `max_distance` are
/// best effort.
pub fn resolve_allele_count(
    reads: &[usize],
    similarities: &DistanceMatrix,
    params: &ConsensusParams,
) -> AlleleCountCall {
    let single = |separation| AlleleCountCall {
        num_alleles: 1,
        partition: Partition::new(reads.to_vec(), Vec::new()),
        separation,
    };

    if reads.len() < 2 {
        return single(None);
    }

    let mut forest = ClusterForest::new(reads, similarities);
    while forest.len() > 2 {
        forest.merge_closest();
    }

    let separation = forest.separation().unwrap_or(0.0);
    if (separation - params.max_distance).abs() < params.max_distance / 10.0 {
        log::debug!(
            "Allele count is approximate: cluster separation {:.4} is close to {}",
            separation,
            params.max_distance
        );
    }

    if separation > params.max_distance {
        let mut groups = forest.groups().map(|group| {
            let mut members = group.members.clone();
            members.sort_unstable();
            members
        });
        let allele1 = groups.next().unwrap_or_default();
        let allele2 = groups.next().unwrap_or_default();
        AlleleCountCall {
            num_alleles: 2,
            partition: Partition::new(allele1, allele2),
            separation: Some(separation),
        }
    } else {
        single(Some(separation))
    }
}
