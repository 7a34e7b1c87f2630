//! # rockc
//!
//! Link-based clustering (ROCK) for categorical and transactional data, plus
//! the evaluation harness used to compare it against distance-based
//! clustering.
//!
//! The pipeline, leaves first:
//!
//! ```text
//! Dataset → SimilarityMatrix (Jaccard) → LinkMatrix (θ) → Rock → ClusteringResult
//!                                                                  ↓
//!                                      GroundTruth → metrics (precision / recall / F1, goodness)
//!                                                                  ↓
//!                                                   sweep over θ → Vec<MetricSample>
//! ```
//!
//! Plotting, notebooks and dataset loading are left to the caller: every output
//! (metric series, merge history, link graph) is a plain value.
//!
//! **Features**: `parallel` runs similarity rows and sweep iterations on rayon;
//! `serde` derives `Serialize`/`Deserialize` for configuration and outputs.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod dataset;
/// Error types used across `rockc`.
pub mod error;
pub mod links;
pub mod metrics;
pub mod similarity;
pub mod sweep;

pub use cluster::{
    Cluster, Clustering, ClusteringResult, Linkage, LinkageBaseline, MergeEvent, MergeHistory,
    Rock, RockFit, Termination,
};
pub use dataset::{Dataset, GroundTruth, Record};
pub use error::{Error, Result};
pub use links::{build_links, LinkMatrix, NeighborMode};
pub use metrics::{evaluate, goodness_score, Evaluation, PairConfusion};
pub use similarity::{jaccard, SimilarityMatrix};
pub use sweep::{compare, evaluate_strategy, sweep, MetricSample, StrategyReport, Sweep};
