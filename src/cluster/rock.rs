//! ROCK: RObust Clustering using linKs.
//!
//! Agglomerative clustering for categorical data (Guha, Rastogi & Shim, 1999).
//! Distance-based linkage on transactions tends to chain unrelated baskets
//! through a few shared items; ROCK merges by **links** (common neighbors)
//! instead, which reflects the neighborhood of a record rather than a single
//! pairwise overlap.
//!
//! # Goodness Measure
//!
//! With `f(θ) = (1 − θ) / (1 + θ)`, a cluster of size `n` is expected to hold
//! roughly `n^(1 + 2f(θ))` links. The merge criterion normalizes the actual
//! cross links by the expected increase:
//!
//! ```text
//! g(Ci, Cj) = link(Ci, Cj) / [ (ni + nj)^(1+2f) − ni^(1+2f) − nj^(1+2f) ]
//! ```
//!
//! Without the normalization, large clusters would swallow everything simply
//! because they accumulate more links.
//!
//! # Algorithm
//!
//! 1. Start with one singleton cluster per record.
//! 2. Pick the pair with the highest goodness among pairs with positive links.
//!    Ties go to the lexicographically smallest `(id, id)` pair.
//! 3. Merge it into a new cluster; its links to every other cluster are the
//!    sum of the parents' links.
//! 4. Stop at `k` clusters, or earlier when no linked pair has a defined
//!    goodness.
//!
//! Stopping early is a normal outcome: at high θ the data may fall apart into
//! more than `k` link-disconnected groups. [`RockFit::termination`] reports it.
//!
//! # Complexity
//!
//! Cross links are kept sparse (only positive pairs), so each step costs
//! O(number of linked cluster pairs). The link matrix itself is built by
//! [`crate::links`].

use super::history::{MergeEvent, MergeHistory};
use super::result::{Cluster, ClusteringResult};
use super::traits::Clustering;
use crate::dataset::Dataset;
use crate::error::{check_theta, Error, Result};
use crate::links::{LinkMatrix, NeighborMode};
use crate::similarity::SimilarityMatrix;
use std::collections::{BTreeMap, BTreeSet};

/// Why an agglomeration stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// The partition reached the requested number of clusters.
    ReachedTarget,
    /// No remaining pair could be merged: none had positive links, or every
    /// linked pair had an undefined goodness. More clusters than requested remain.
    NoMergeCandidate,
}

/// ROCK clusterer.
///
/// `theta` and the target cluster count have no defaults; the caller picks both.
#[derive(Debug, Clone)]
pub struct Rock {
    theta: f64,
    target_clusters: usize,
    mode: NeighborMode,
}

/// Output of a ROCK run.
#[derive(Debug, Clone)]
pub struct RockFit {
    /// Final partition.
    pub result: ClusteringResult,
    /// Every merge, in order.
    pub history: MergeHistory,
    /// Why the run stopped.
    pub termination: Termination,
    /// Threshold used.
    pub theta: f64,
    /// Requested number of clusters.
    pub target_clusters: usize,
}

impl RockFit {
    /// Number of clusters actually reached.
    pub fn n_clusters(&self) -> usize {
        self.result.n_clusters()
    }

    /// Whether the run stopped before reaching the target.
    pub fn stopped_early(&self) -> bool {
        self.termination == Termination::NoMergeCandidate
    }
}

impl Rock {
    /// Create a ROCK clusterer with similarity threshold `theta` and target `k`.
    pub fn new(theta: f64, target_clusters: usize) -> Self {
        Self {
            theta,
            target_clusters,
            mode: NeighborMode::default(),
        }
    }

    /// Set whether records count as their own neighbors.
    pub fn with_neighbor_mode(mut self, mode: NeighborMode) -> Self {
        self.mode = mode;
        self
    }

    /// Similarity threshold.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Requested number of clusters.
    pub fn target_clusters(&self) -> usize {
        self.target_clusters
    }

    /// Neighbor mode used for link counting.
    pub fn neighbor_mode(&self) -> NeighborMode {
        self.mode
    }

    /// Run the full pipeline: similarities, links, agglomeration.
    pub fn fit(&self, dataset: &Dataset) -> Result<RockFit> {
        check_theta(self.theta)?;
        dataset.ensure_non_empty()?;
        check_target(self.target_clusters, dataset.len())?;

        let sim = SimilarityMatrix::compute(dataset);
        let links = LinkMatrix::from_similarity(&sim, self.theta, self.mode)?;
        agglomerate(&links, self.target_clusters)
    }
}

impl Clustering for Rock {
    fn fit_predict(&self, dataset: &Dataset) -> Result<ClusteringResult> {
        self.fit(dataset).map(|fit| fit.result)
    }

    fn n_clusters(&self) -> usize {
        self.target_clusters
    }

    fn name(&self) -> &str {
        "rock"
    }
}

fn check_target(k: usize, n: usize) -> Result<()> {
    if k == 0 || k > n {
        return Err(Error::InvalidClusterCount {
            requested: k,
            n_items: n,
        });
    }
    Ok(())
}

/// `1 + 2f(θ)` with `f(θ) = (1 − θ) / (1 + θ)`.
pub fn normalization_exponent(theta: f64) -> f64 {
    1.0 + 2.0 * ((1.0 - theta) / (1.0 + theta))
}

/// Goodness of merging clusters of sizes `n_i` and `n_j` that share
/// `cross_links` links at threshold `theta`.
///
/// Returns `None` when the denominator is zero or not finite (for example at
/// `theta = 1`, where the exponent is 1 and the denominator vanishes).
pub fn goodness(cross_links: u64, n_i: usize, n_j: usize, theta: f64) -> Option<f64> {
    goodness_with_exponent(cross_links, n_i, n_j, normalization_exponent(theta))
}

fn goodness_with_exponent(cross_links: u64, n_i: usize, n_j: usize, exponent: f64) -> Option<f64> {
    let (ni, nj) = (n_i as f64, n_j as f64);
    let whole = (ni + nj).powf(exponent);
    let denom = whole - ni.powf(exponent) - nj.powf(exponent);
    if !denom.is_finite() || denom <= 0.0 {
        return None;
    }
    Some(cross_links as f64 / denom)
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    left: usize,
    right: usize,
    goodness: f64,
    links: u64,
}

/// Working state of one agglomeration: an arena of immutable clusters, the
/// active ids, and sparse cross links between active clusters.
struct Agglomeration {
    arena: Vec<Option<Cluster>>,
    active: BTreeSet<usize>,
    /// `cross[a][b]` = links between active clusters `a` and `b`, positive only.
    cross: Vec<BTreeMap<usize, u64>>,
    exponent: f64,
}

impl Agglomeration {
    fn new(links: &LinkMatrix) -> Self {
        let n = links.n_items();
        let mut cross = vec![BTreeMap::new(); n];
        for (i, j, c) in links.positive_pairs() {
            cross[i].insert(j, u64::from(c));
            cross[j].insert(i, u64::from(c));
        }
        Self {
            arena: (0..n).map(|i| Some(Cluster::singleton(i))).collect(),
            active: (0..n).collect(),
            cross,
            exponent: normalization_exponent(links.theta()),
        }
    }

    fn size(&self, id: usize) -> usize {
        self.arena[id].as_ref().map_or(0, Cluster::len)
    }

    /// Highest-goodness linked pair; the first maximum in `(left, right)` order wins.
    fn best_pair(&self) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for &left in &self.active {
            for (&right, &links) in self.cross[left].range((left + 1)..) {
                let (n_left, n_right) = (self.size(left), self.size(right));
                let Some(g) = goodness_with_exponent(links, n_left, n_right, self.exponent) else {
                    tracing::trace!(left, right, "goodness undefined; pair skipped");
                    continue;
                };
                if best.is_none_or(|b| g > b.goodness) {
                    best = Some(Candidate {
                        left,
                        right,
                        goodness: g,
                        links,
                    });
                }
            }
        }
        best
    }

    fn merge(&mut self, pair: Candidate) -> MergeEvent {
        let Candidate { left, right, .. } = pair;
        let id = self.arena.len();

        let a = self.arena[left].take();
        let b = self.arena[right].take();
        let merged = match (a, b) {
            (Some(a), Some(b)) => Cluster::merged(id, &a, &b),
            // Both ids come from the active set, whose clusters are always present.
            _ => unreachable!("merging an inactive cluster"),
        };
        let size = merged.len();

        let mut joined = std::mem::take(&mut self.cross[left]);
        for (k, l) in std::mem::take(&mut self.cross[right]) {
            *joined.entry(k).or_insert(0) += l;
        }
        joined.remove(&left);
        joined.remove(&right);
        for (&k, &l) in &joined {
            let row = &mut self.cross[k];
            row.remove(&left);
            row.remove(&right);
            row.insert(id, l);
        }

        self.active.remove(&left);
        self.active.remove(&right);
        self.active.insert(id);
        self.arena.push(Some(merged));
        self.cross.push(joined);

        MergeEvent {
            left,
            right,
            merged: id,
            goodness: pair.goodness,
            links: pair.links,
            size,
        }
    }

    fn into_result(self, n_items: usize) -> ClusteringResult {
        let mut arena = self.arena;
        let clusters = self
            .active
            .iter()
            .filter_map(|&id| arena[id].take())
            .collect();
        ClusteringResult::from_parts(n_items, clusters)
    }
}

/// Agglomerate over a prebuilt link matrix until `target_clusters` remain or no
/// linked pair is left. The exponent uses the matrix's own theta.
pub fn agglomerate(links: &LinkMatrix, target_clusters: usize) -> Result<RockFit> {
    let n = links.n_items();
    if n == 0 {
        return Err(Error::EmptyInput);
    }
    check_target(target_clusters, n)?;

    let mut state = Agglomeration::new(links);
    let mut history = MergeHistory::new(n);

    let termination = loop {
        if state.active.len() <= target_clusters {
            break Termination::ReachedTarget;
        }
        let Some(pair) = state.best_pair() else {
            break Termination::NoMergeCandidate;
        };
        let event = state.merge(pair);
        tracing::trace!(
            left = event.left,
            right = event.right,
            merged = event.merged,
            goodness = event.goodness,
            "merged clusters"
        );
        history.push(event);
    };

    let result = state.into_result(n);
    match termination {
        Termination::ReachedTarget => tracing::debug!(
            theta = links.theta(),
            n_clusters = result.n_clusters(),
            merges = history.len(),
            "rock finished"
        ),
        Termination::NoMergeCandidate => tracing::warn!(
            theta = links.theta(),
            target = target_clusters,
            achieved = result.n_clusters(),
            "no mergeable cluster pair left; stopping above the target cluster count"
        ),
    }

    Ok(RockFit {
        result,
        history,
        termination,
        theta: links.theta(),
        target_clusters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::build_links;

    fn two_groups() -> Dataset {
        Dataset::from_transactions([
            ("r1", vec!["a", "b"]),
            ("r2", vec!["a", "b", "c"]),
            ("r3", vec!["x", "y"]),
            ("r4", vec!["x", "y", "z"]),
        ])
        .unwrap()
    }

    #[test]
    fn separates_two_groups() {
        let ds = two_groups();
        let fit = Rock::new(0.5, 2).fit(&ds).unwrap();
        assert_eq!(fit.termination, Termination::ReachedTarget);
        assert_eq!(
            fit.result.record_ids(&ds).unwrap(),
            vec![vec!["r1", "r2"], vec!["r3", "r4"]]
        );
        assert_eq!(fit.history.len(), 2);
        // Equal goodness for both pairs: the lower ids merge first.
        assert_eq!((fit.history.events()[0].left, fit.history.events()[0].right), (0, 1));
        assert_eq!(fit.history.events()[1].merged, 5);
    }

    #[test]
    fn theta_one_stays_singleton() {
        let ds = two_groups();
        let fit = Rock::new(1.0, 1).fit(&ds).unwrap();
        assert_eq!(fit.termination, Termination::NoMergeCandidate);
        assert!(fit.stopped_early());
        assert_eq!(fit.n_clusters(), ds.len());
        assert!(fit.history.is_empty());
    }

    #[test]
    fn disconnected_groups_stop_early() {
        let fit = Rock::new(0.5, 1).fit(&two_groups()).unwrap();
        assert_eq!(fit.termination, Termination::NoMergeCandidate);
        assert_eq!(fit.n_clusters(), 2);
    }

    #[test]
    fn target_equal_to_size_does_nothing() {
        let fit = Rock::new(0.5, 4).fit(&two_groups()).unwrap();
        assert_eq!(fit.termination, Termination::ReachedTarget);
        assert_eq!(fit.n_clusters(), 4);
    }

    #[test]
    fn rejects_bad_config() {
        let ds = two_groups();
        assert!(matches!(
            Rock::new(0.5, 0).fit(&ds),
            Err(Error::InvalidClusterCount { .. })
        ));
        assert!(matches!(
            Rock::new(0.5, 5).fit(&ds),
            Err(Error::InvalidClusterCount { .. })
        ));
        assert!(matches!(
            Rock::new(-0.1, 2).fit(&ds),
            Err(Error::InvalidParameter { name: "theta", .. })
        ));
        let empty = Dataset::new(Vec::new()).unwrap();
        assert_eq!(Rock::new(0.5, 1).fit(&empty).unwrap_err(), Error::EmptyInput);
    }

    #[test]
    fn goodness_formula() {
        // theta = 0.5: exponent = 1 + 2 * (0.5 / 1.5) = 5/3
        let e = normalization_exponent(0.5);
        assert!((e - 5.0 / 3.0).abs() < 1e-12);
        let g = goodness(2, 1, 1, 0.5).unwrap();
        let expected = 2.0 / (2f64.powf(e) - 2.0);
        assert!((g - expected).abs() < 1e-12);
        // Larger clusters need more links for the same goodness.
        assert!(goodness(2, 2, 2, 0.5).unwrap() < g);
    }

    #[test]
    fn goodness_undefined_at_theta_one() {
        assert_eq!(normalization_exponent(1.0), 1.0);
        assert_eq!(goodness(3, 2, 2, 1.0), None);
    }

    #[test]
    fn identical_records_at_theta_one_do_not_merge() {
        let ds = Dataset::from_transactions([("a", vec!["x"]), ("b", vec!["x"]), ("c", vec!["y"])])
            .unwrap();
        let links = build_links(&ds, 1.0).unwrap();
        assert!(links.get(0, 1) > 0);

        let fit = agglomerate(&links, 1).unwrap();
        assert_eq!(fit.termination, Termination::NoMergeCandidate);
        assert!(fit.history.is_empty());
        assert!(fit.history.goodness_series().iter().all(|g| !g.is_nan()));
        assert_eq!(fit.n_clusters(), 3);
    }

    #[test]
    fn theta_just_below_one_still_merges() {
        let theta = 1.0 - 1e-12;
        let g = goodness(2, 1, 1, theta).unwrap();
        assert!(g.is_finite() && g > 0.0);

        let ds = Dataset::from_transactions([("a", vec!["x"]), ("b", vec!["x"])]).unwrap();
        let fit = Rock::new(theta, 1).fit(&ds).unwrap();
        assert_eq!(fit.termination, Termination::ReachedTarget);
        assert_eq!(fit.n_clusters(), 1);
        assert_eq!(fit.history.events()[0].links, 2);
    }

    #[test]
    fn merged_links_are_summed() {
        // Three mutually similar records plus an outlier.
        let ds = Dataset::from_transactions([
            ("a", vec!["1", "2", "3"]),
            ("b", vec!["1", "2", "4"]),
            ("c", vec!["1", "2", "5"]),
            ("d", vec!["9"]),
        ])
        .unwrap();
        let links = build_links(&ds, 0.4).unwrap();
        let fit = agglomerate(&links, 2).unwrap();
        let first = fit.history.events()[0];
        let second = fit.history.events()[1];
        assert_eq!(second.left, 2);
        assert_eq!(second.right, first.merged);
        assert_eq!(
            second.links,
            u64::from(links.get(0, 2)) + u64::from(links.get(1, 2))
        );
        assert_eq!(fit.result.labels(), vec![0, 0, 0, 1]);
    }

    #[test]
    fn rock_as_clustering_trait() {
        let rock: &dyn Clustering = &Rock::new(0.5, 2);
        let result = rock.fit_predict(&two_groups()).unwrap();
        assert_eq!(result.labels(), vec![0, 0, 1, 1]);
        assert_eq!(rock.n_clusters(), 2);
        assert_eq!(rock.name(), "rock");
    }
}
