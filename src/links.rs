//! Neighbor sets and link counts.
//!
//! Two records are **neighbors** when their Jaccard similarity is at least
//! `theta`. The **link** between two records is the number of neighbors they
//! have in common:
//!
//! ```text
//! link(i, j) = |{ k : k ∈ N(i) and k ∈ N(j) }|
//! ```
//!
//! Links capture global information that pairwise similarity alone misses:
//! two baskets with little overlap can still be strongly linked when they sit
//! in the same dense region of the data.
//!
//! # Self-neighborhood
//!
//! Whether a record counts as its own neighbor changes the counts, so it is an
//! explicit [`NeighborMode`]:
//!
//! - [`NeighborMode::IncludeSelf`] (default): `i ∈ N(i)`. This is the published
//!   formulation; two similar records link through each other even when they
//!   share no third neighbor.
//! - [`NeighborMode::ExcludeEndpoints`]: only records `k ≠ i, k ≠ j` count.
//!
//! # Complexity
//!
//! Instead of scanning every `k` for every pair (O(n³)), each record `k` adds
//! one link to every pair inside its own neighbor list. The cost is
//! `O(Σ_k |N(k)|²)`, which is far smaller on sparse transactional data and
//! yields exactly the same counts.

use crate::dataset::Dataset;
use crate::error::{check_theta, Result};
use crate::similarity::{condensed_index, SimilarityMatrix};
use petgraph::graph::UnGraph;

/// Whether a record is counted as its own neighbor when counting links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NeighborMode {
    /// Every record is its own neighbor.
    #[default]
    IncludeSelf,
    /// Only third records `k ∉ {i, j}` contribute to `link(i, j)`.
    ExcludeEndpoints,
}

/// Symmetric matrix of pairwise link counts at a fixed theta.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkMatrix {
    n: usize,
    theta: f64,
    mode: NeighborMode,
    /// Neighbors of each record, excluding itself, ascending.
    neighbors: Vec<Vec<usize>>,
    condensed: Vec<u32>,
}

/// Build the link matrix of `dataset` at `theta` with the default neighbor mode.
pub fn build_links(dataset: &Dataset, theta: f64) -> Result<LinkMatrix> {
    check_theta(theta)?;
    let sim = SimilarityMatrix::compute(dataset);
    LinkMatrix::from_similarity(&sim, theta, NeighborMode::default())
}

impl LinkMatrix {
    /// Derive link counts from precomputed similarities.
    pub fn from_similarity(sim: &SimilarityMatrix, theta: f64, mode: NeighborMode) -> Result<Self> {
        check_theta(theta)?;
        let n = sim.n_items();
        let neighbors: Vec<Vec<usize>> = (0..n).map(|i| sim.neighbors_of(i, theta)).collect();

        let mut condensed = vec![0u32; n * n.saturating_sub(1) / 2];
        let mut scratch: Vec<usize> = Vec::new();
        for (k, nbrs) in neighbors.iter().enumerate() {
            scratch.clear();
            scratch.extend_from_slice(nbrs);
            if mode == NeighborMode::IncludeSelf {
                let at = scratch.partition_point(|&x| x < k);
                scratch.insert(at, k);
            }
            for (a, &p) in scratch.iter().enumerate() {
                for &q in &scratch[a + 1..] {
                    condensed[condensed_index(n, p, q)] += 1;
                }
            }
        }

        let links = Self {
            n,
            theta,
            mode,
            neighbors,
            condensed,
        };
        tracing::debug!(
            n_records = n,
            theta,
            ?mode,
            total_links = links.total_links(),
            "built link matrix"
        );
        Ok(links)
    }

    /// Number of records covered.
    pub fn n_items(&self) -> usize {
        self.n
    }

    /// Threshold the matrix was built with.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Neighbor mode the matrix was built with.
    pub fn mode(&self) -> NeighborMode {
        self.mode
    }

    /// Link count between `i` and `j`. The diagonal and out-of-range pairs are 0.
    pub fn get(&self, i: usize, j: usize) -> u32 {
        if i == j || i >= self.n || j >= self.n {
            return 0;
        }
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        self.condensed[condensed_index(self.n, lo, hi)]
    }

    /// Neighbors of record `i` (never including `i`).
    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.neighbors[i]
    }

    /// Sum of link counts over all unordered pairs.
    pub fn total_links(&self) -> u64 {
        self.condensed.iter().map(|&c| u64::from(c)).sum()
    }

    /// Whether every pair has zero links.
    pub fn is_empty(&self) -> bool {
        self.condensed.iter().all(|&c| c == 0)
    }

    /// Pairs `(i, j, link)` with `i < j` and a positive count, row-major.
    pub fn positive_pairs(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        (0..self.n)
            .flat_map(move |i| ((i + 1)..self.n).map(move |j| (i, j)))
            .zip(self.condensed.iter())
            .filter(|&(_, &c)| c > 0)
            .map(|((i, j), &c)| (i, j, c))
    }

    /// Undirected link graph: one node per record (weight = record index), one
    /// edge per positive pair (weight = link count).
    pub fn to_graph(&self) -> UnGraph<usize, u32> {
        let mut graph = UnGraph::with_capacity(self.n, 0);
        let nodes: Vec<_> = (0..self.n).map(|i| graph.add_node(i)).collect();
        for (i, j, c) in self.positive_pairs() {
            graph.add_edge(nodes[i], nodes[j], c);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_groups() -> Dataset {
        Dataset::from_transactions([
            ("r1", vec!["a", "b"]),
            ("r2", vec!["a", "b", "c"]),
            ("r3", vec!["x", "y"]),
            ("r4", vec!["x", "y", "z"]),
        ])
        .unwrap()
    }

    fn naive(sim: &SimilarityMatrix, theta: f64, mode: NeighborMode, i: usize, j: usize) -> u32 {
        let is_nbr = |a: usize, b: usize| match mode {
            NeighborMode::IncludeSelf if a == b => true,
            _ => sim.get(a, b).is_some_and(|s| s >= theta),
        };
        (0..sim.n_items())
            .filter(|&k| mode == NeighborMode::IncludeSelf || (k != i && k != j))
            .filter(|&k| is_nbr(i, k) && is_nbr(j, k))
            .count() as u32
    }

    #[test]
    fn include_self_links_similar_pairs() {
        let links = build_links(&two_groups(), 0.5).unwrap();
        assert_eq!(links.get(0, 1), 2);
        assert_eq!(links.get(2, 3), 2);
        assert_eq!(links.get(0, 2), 0);
        assert_eq!(links.get(1, 1), 0);
        assert_eq!(links.neighbors(0), &[1]);
    }

    #[test]
    fn exclude_endpoints_needs_third_record() {
        let sim = SimilarityMatrix::compute(&two_groups());
        let links = LinkMatrix::from_similarity(&sim, 0.5, NeighborMode::ExcludeEndpoints).unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn matches_naive_count() {
        let ds = Dataset::from_transactions([
            ("a", vec!["1", "2", "3"]),
            ("b", vec!["1", "2", "4"]),
            ("c", vec!["1", "3", "4"]),
            ("d", vec!["2", "3", "4"]),
            ("e", vec!["1", "2", "3", "4"]),
            ("f", vec!["9"]),
        ])
        .unwrap();
        let sim = SimilarityMatrix::compute(&ds);
        for mode in [NeighborMode::IncludeSelf, NeighborMode::ExcludeEndpoints] {
            for theta in [0.0, 0.3, 0.5, 0.75, 1.0] {
                let links = LinkMatrix::from_similarity(&sim, theta, mode).unwrap();
                for i in 0..ds.len() {
                    for j in (i + 1)..ds.len() {
                        assert_eq!(
                            links.get(i, j),
                            naive(&sim, theta, mode, i, j),
                            "mode={mode:?} theta={theta} pair=({i},{j})"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn theta_one_distinct_records_has_no_links() {
        let links = build_links(&two_groups(), 1.0).unwrap();
        assert!(links.is_empty());
        assert_eq!(links.total_links(), 0);
    }

    #[test]
    fn rejects_bad_theta() {
        assert!(build_links(&two_groups(), 1.2).is_err());
        assert!(build_links(&two_groups(), f64::NAN).is_err());
    }

    #[test]
    fn graph_export() {
        let graph = build_links(&two_groups(), 0.5).unwrap().to_graph();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 2);
    }
}
