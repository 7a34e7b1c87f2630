//! Clustering traits.

use super::result::ClusteringResult;
use crate::dataset::Dataset;
use crate::error::Result;

/// A clustering strategy over categorical records.
///
/// This is the seam between ROCK and the baselines it is compared against:
/// the evaluation harness only ever sees `&dyn Clustering`, so callers can plug
/// in their own distance-based strategies without touching this crate.
pub trait Clustering {
    /// Cluster `dataset` and return the resulting partition.
    fn fit_predict(&self, dataset: &Dataset) -> Result<ClusteringResult>;

    /// The configured number of clusters.
    fn n_clusters(&self) -> usize;

    /// Short name used in reports.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
