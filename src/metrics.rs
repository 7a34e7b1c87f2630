//! Clustering evaluation metrics.
//!
//! # Pairwise Precision / Recall / F1
//!
//! Every unordered pair of records is classified by two questions: does the
//! clustering put them together, and does the ground truth give them the same
//! label?
//!
//! | | same label | different labels |
//! |---|---|---|
//! | same cluster | TP | FP |
//! | different clusters | FN | TN |
//!
//! ```text
//! precision = TP / (TP + FP)
//! recall    = TP / (TP + FN)
//! F1        = 2 · precision · recall / (precision + recall)
//! ```
//!
//! Counts come from the cluster × label contingency table rather than an
//! O(n²) pair scan: the pairs inside cell `(c, l)` are `C(n_cl, 2)`.
//!
//! When a denominator is zero (no pair is together on that side), the value is
//! 1.0 if the other side has no together-pairs either, otherwise 0.0. Two
//! all-singleton partitions therefore agree perfectly.
//!
//! # Goodness Score
//!
//! [`goodness_score`] needs no ground truth. It is the ROCK criterion
//!
//! ```text
//! E = Σᵢ nᵢ · Σ_{p<q ∈ Cᵢ} link(p, q) / nᵢ^(1 + 2f(θ))
//! ```
//!
//! which rewards clusters with many internal links relative to what their size
//! would predict.
//!
//! # Example
//!
//! ```rust
//! use rockc::metrics::evaluate;
//! use rockc::{ClusteringResult, GroundTruth};
//!
//! let pred = ClusteringResult::from_labels(&[0, 0, 1, 1]);
//! let truth = GroundTruth::from_labels(vec![0, 0, 1, 1]);
//! let scores = evaluate(&pred, &truth).unwrap();
//! assert_eq!(scores.f1, 1.0);
//! ```

use crate::cluster::{normalization_exponent, ClusteringResult};
use crate::dataset::GroundTruth;
use crate::error::{Error, Result};
use crate::links::LinkMatrix;
use std::collections::HashMap;

/// Pair counts of a clustering against ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairConfusion {
    /// Together in both.
    pub true_positives: u64,
    /// Together in the clustering only.
    pub false_positives: u64,
    /// Together in the ground truth only.
    pub false_negatives: u64,
    /// Apart in both.
    pub true_negatives: u64,
}

impl PairConfusion {
    /// Pairs the clustering puts together.
    pub fn predicted_together(&self) -> u64 {
        self.true_positives + self.false_positives
    }

    /// Pairs the ground truth puts together.
    pub fn truly_together(&self) -> u64 {
        self.true_positives + self.false_negatives
    }

    /// Pairwise precision in [0, 1].
    pub fn precision(&self) -> f64 {
        vacuous_ratio(self.true_positives, self.predicted_together(), self.truly_together())
    }

    /// Pairwise recall in [0, 1].
    pub fn recall(&self) -> f64 {
        vacuous_ratio(self.true_positives, self.truly_together(), self.predicted_together())
    }
}

fn vacuous_ratio(num: u64, denom: u64, other: u64) -> f64 {
    if denom > 0 {
        num as f64 / denom as f64
    } else if other == 0 {
        1.0
    } else {
        0.0
    }
}

/// Precision, recall and F1 of one clustering.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    /// Pairwise precision.
    pub precision: f64,
    /// Pairwise recall.
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f1: f64,
}

/// Harmonic mean of precision and recall; 0 when both are 0.
pub fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall <= 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

fn comb2(n: u64) -> u64 {
    if n < 2 {
        0
    } else {
        n * (n - 1) / 2
    }
}

/// Count TP / FP / FN / TN pairs of `result` against `truth`.
pub fn pair_confusion(result: &ClusteringResult, truth: &GroundTruth) -> Result<PairConfusion> {
    if result.n_items() != truth.len() {
        return Err(Error::DimensionMismatch {
            expected: result.n_items(),
            found: truth.len(),
        });
    }

    let labels = truth.labels();
    let mut together_pred = 0u64;
    let mut tp = 0u64;
    let mut cell: HashMap<usize, u64> = HashMap::new();
    for cluster in result.clusters() {
        together_pred += comb2(cluster.len() as u64);
        cell.clear();
        for &m in cluster.members() {
            *cell.entry(labels[m]).or_insert(0) += 1;
        }
        tp += cell.values().map(|&c| comb2(c)).sum::<u64>();
    }

    let mut class_sizes: HashMap<usize, u64> = HashMap::new();
    for &l in labels {
        *class_sizes.entry(l).or_insert(0) += 1;
    }
    let together_truth: u64 = class_sizes.values().map(|&c| comb2(c)).sum();

    let fp = together_pred - tp;
    let fn_ = together_truth - tp;
    let all = comb2(result.n_items() as u64);
    Ok(PairConfusion {
        true_positives: tp,
        false_positives: fp,
        false_negatives: fn_,
        true_negatives: all - tp - fp - fn_,
    })
}

/// Pairwise precision, recall and F1 of `result` against `truth`.
///
/// ```rust
/// use rockc::metrics::evaluate;
/// use rockc::{ClusteringResult, GroundTruth};
///
/// // Everything in one cluster: perfect recall, poor precision.
/// let pred = ClusteringResult::from_labels(&[0, 0, 0, 0]);
/// let truth = GroundTruth::from_labels(vec![0, 0, 1, 1]);
/// let e = evaluate(&pred, &truth).unwrap();
/// assert_eq!(e.recall, 1.0);
/// assert!((e.precision - 1.0 / 3.0).abs() < 1e-12);
/// ```
pub fn evaluate(result: &ClusteringResult, truth: &GroundTruth) -> Result<Evaluation> {
    let confusion = pair_confusion(result, truth)?;
    let precision = confusion.precision();
    let recall = confusion.recall();
    Ok(Evaluation {
        precision,
        recall,
        f1: f1_score(precision, recall),
    })
}

/// Per-cluster ROCK criterion contributions, in cluster order.
pub fn cluster_goodness(result: &ClusteringResult, links: &LinkMatrix) -> Result<Vec<f64>> {
    if result.n_items() != links.n_items() {
        return Err(Error::DimensionMismatch {
            expected: result.n_items(),
            found: links.n_items(),
        });
    }
    let exponent = normalization_exponent(links.theta());
    Ok(result
        .clusters()
        .iter()
        .map(|cluster| {
            let members = cluster.members();
            let internal: u64 = members
                .iter()
                .enumerate()
                .flat_map(|(a, &p)| members[a + 1..].iter().map(move |&q| (p, q)))
                .map(|(p, q)| u64::from(links.get(p, q)))
                .sum();
            let n = members.len() as f64;
            n * internal as f64 / n.powf(exponent)
        })
        .collect())
}

/// Unsupervised quality of `result`: the sum of [`cluster_goodness`].
pub fn goodness_score(result: &ClusteringResult, links: &LinkMatrix) -> Result<f64> {
    Ok(cluster_goodness(result, links)?.into_iter().sum())
}
