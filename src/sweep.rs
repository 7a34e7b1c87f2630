//! Theta sweeps and strategy comparison.
//!
//! A sweep runs the full ROCK pipeline (similarities → links → agglomeration →
//! evaluation) once per θ and returns one [`MetricSample`] per input θ, in
//! input order. Iterations share nothing mutable: each builds its own
//! similarity and link matrices, so with the `parallel` feature they run on
//! the rayon pool and are collected back in order.
//!
//! ```rust
//! use rockc::sweep::sweep;
//! use rockc::{Dataset, GroundTruth};
//!
//! let data = Dataset::from_transactions([
//!     ("r1", vec!["a", "b"]),
//!     ("r2", vec!["a", "b", "c"]),
//!     ("r3", vec!["x", "y"]),
//!     ("r4", vec!["x", "y", "z"]),
//! ])
//! .unwrap();
//! let labels = [("r1", "ab"), ("r2", "ab"), ("r3", "xy"), ("r4", "xy")];
//! let truth = GroundTruth::new(&data, labels).unwrap();
//!
//! let samples = sweep(&data, &truth, &[0.2, 0.5, 1.0], 2).unwrap();
//! assert_eq!(samples.len(), 3);
//! assert_eq!(samples[1].f1, 1.0);
//! ```

use crate::cluster::{agglomerate, Clustering, Termination};
use crate::dataset::{Dataset, GroundTruth};
use crate::error::{check_theta, Error, Result};
use crate::links::{LinkMatrix, NeighborMode};
use crate::metrics::{evaluate, goodness_score, Evaluation};
use crate::similarity::SimilarityMatrix;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One point of a theta sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricSample {
    /// Threshold of this run.
    pub theta: f64,
    /// Pairwise recall.
    pub recall: f64,
    /// Pairwise precision.
    pub precision: f64,
    /// Pairwise F1.
    pub f1: f64,
    /// ROCK criterion of the final partition.
    pub goodness: f64,
    /// Clusters actually reached.
    pub n_clusters: usize,
    /// Why the run stopped.
    pub termination: Termination,
}

/// Sweep configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sweep {
    thetas: Vec<f64>,
    target_clusters: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    neighbor_mode: NeighborMode,
}

impl Sweep {
    /// Sweep over `thetas` (in the given order) with `target_clusters` clusters.
    pub fn new(thetas: Vec<f64>, target_clusters: usize) -> Self {
        Self {
            thetas,
            target_clusters,
            neighbor_mode: NeighborMode::default(),
        }
    }

    /// `steps` evenly spaced thetas from `start` to `end`, both inclusive.
    pub fn linspace(start: f64, end: f64, steps: usize, target_clusters: usize) -> Result<Self> {
        check_theta(start)?;
        check_theta(end)?;
        if steps == 0 {
            return Err(Error::InvalidParameter {
                name: "steps",
                message: "must be at least 1",
            });
        }
        let thetas = if steps == 1 {
            vec![start]
        } else {
            let step = (end - start) / (steps - 1) as f64;
            (0..steps)
                .map(|i| if i + 1 == steps { end } else { start + step * i as f64 })
                .collect()
        };
        Ok(Self::new(thetas, target_clusters))
    }

    /// Set the neighbor mode for every iteration.
    pub fn with_neighbor_mode(mut self, mode: NeighborMode) -> Self {
        self.neighbor_mode = mode;
        self
    }

    /// Thetas, in sweep order.
    pub fn thetas(&self) -> &[f64] {
        &self.thetas
    }

    /// Requested number of clusters.
    pub fn target_clusters(&self) -> usize {
        self.target_clusters
    }

    /// Neighbor mode.
    pub fn neighbor_mode(&self) -> NeighborMode {
        self.neighbor_mode
    }

    fn validate(&self, dataset: &Dataset, truth: &GroundTruth) -> Result<()> {
        dataset.ensure_non_empty()?;
        if truth.len() != dataset.len() {
            return Err(Error::DimensionMismatch {
                expected: dataset.len(),
                found: truth.len(),
            });
        }
        if self.target_clusters == 0 || self.target_clusters > dataset.len() {
            return Err(Error::InvalidClusterCount {
                requested: self.target_clusters,
                n_items: dataset.len(),
            });
        }
        self.thetas.iter().try_for_each(|&t| check_theta(t))
    }

    /// Run the sweep. All thetas are validated before any clustering starts.
    pub fn run(&self, dataset: &Dataset, truth: &GroundTruth) -> Result<Vec<MetricSample>> {
        self.validate(dataset, truth)?;
        tracing::debug!(
            n_thetas = self.thetas.len(),
            target = self.target_clusters,
            "starting theta sweep"
        );

        let run_one = |&theta: &f64| {
            sample_at(dataset, truth, theta, self.target_clusters, self.neighbor_mode)
        };

        #[cfg(feature = "parallel")]
        let samples = self.thetas.par_iter().map(run_one).collect::<Result<Vec<_>>>();
        #[cfg(not(feature = "parallel"))]
        let samples = self.thetas.iter().map(run_one).collect::<Result<Vec<_>>>();

        samples
    }
}

/// Run ROCK once per theta and score each result against `truth`.
///
/// Returns exactly one sample per input theta, in input order.
pub fn sweep(
    dataset: &Dataset,
    truth: &GroundTruth,
    thetas: &[f64],
    target_clusters: usize,
) -> Result<Vec<MetricSample>> {
    Sweep::new(thetas.to_vec(), target_clusters).run(dataset, truth)
}

/// One independent pipeline run.
fn sample_at(
    dataset: &Dataset,
    truth: &GroundTruth,
    theta: f64,
    target_clusters: usize,
    mode: NeighborMode,
) -> Result<MetricSample> {
    let _span = tracing::debug_span!("sweep", theta).entered();

    let sim = SimilarityMatrix::compute(dataset);
    let links = LinkMatrix::from_similarity(&sim, theta, mode)?;
    let fit = agglomerate(&links, target_clusters)?;
    let Evaluation {
        precision,
        recall,
        f1,
    } = evaluate(&fit.result, truth)?;
    let goodness = goodness_score(&fit.result, &links)?;

    Ok(MetricSample {
        theta,
        recall,
        precision,
        f1,
        goodness,
        n_clusters: fit.n_clusters(),
        termination: fit.termination,
    })
}

/// Scores of one clustering strategy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrategyReport {
    /// Strategy name.
    pub name: String,
    /// Clusters produced.
    pub n_clusters: usize,
    /// Pairwise scores.
    pub evaluation: Evaluation,
}

/// Run `strategy` on `dataset` and score it against `truth`.
pub fn evaluate_strategy(
    strategy: &dyn Clustering,
    dataset: &Dataset,
    truth: &GroundTruth,
) -> Result<StrategyReport> {
    let result = strategy.fit_predict(dataset)?;
    let evaluation = evaluate(&result, truth)?;
    tracing::debug!(
        strategy = strategy.name(),
        f1 = evaluation.f1,
        "evaluated strategy"
    );
    Ok(StrategyReport {
        name: strategy.name().to_string(),
        n_clusters: result.n_clusters(),
        evaluation,
    })
}

/// Evaluate several strategies on the same data, in the given order.
pub fn compare(
    strategies: &[&dyn Clustering],
    dataset: &Dataset,
    truth: &GroundTruth,
) -> Result<Vec<StrategyReport>> {
    strategies
        .iter()
        .map(|s| evaluate_strategy(*s, dataset, truth))
        .collect()
}
