//! Merge history of an agglomerative run.
//!
//! The history records every merge in order, so the partition at any
//! intermediate step can be rebuilt without re-running the algorithm. This is
//! what a plotting layer needs to draw a dendrogram or a goodness-per-step curve.

use super::result::ClusteringResult;
use super::util::replay_merges;

/// A single merge.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MergeEvent {
    /// Smaller id of the merged pair.
    pub left: usize,
    /// Larger id of the merged pair.
    pub right: usize,
    /// Id of the resulting cluster (`n_items + step`).
    pub merged: usize,
    /// Goodness of the pair at merge time.
    pub goodness: f64,
    /// Cross links between the pair at merge time.
    pub links: u64,
    /// Size of the resulting cluster.
    pub size: usize,
}

/// Ordered merge events over `n_items` records.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MergeHistory {
    n_items: usize,
    events: Vec<MergeEvent>,
}

impl MergeHistory {
    /// Empty history for `n_items` records.
    pub fn new(n_items: usize) -> Self {
        Self {
            n_items,
            events: Vec::with_capacity(n_items.saturating_sub(1)),
        }
    }

    pub(crate) fn push(&mut self, event: MergeEvent) {
        self.events.push(event);
    }

    /// Number of original records.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of merges.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no merge happened.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Merge events in order.
    pub fn events(&self) -> &[MergeEvent] {
        &self.events
    }

    /// Iterate over merges.
    pub fn iter(&self) -> impl Iterator<Item = &MergeEvent> {
        self.events.iter()
    }

    /// Goodness of each merge, in order.
    pub fn goodness_series(&self) -> Vec<f64> {
        self.events.iter().map(|e| e.goodness).collect()
    }

    /// Partition after the first `steps` merges (clamped to the history length).
    pub fn partition_after(&self, steps: usize) -> ClusteringResult {
        let merges = self.events.iter().take(steps).map(|e| (e.left, e.right));
        ClusteringResult::from_labels(&replay_merges(self.n_items, merges))
    }

    /// Partition with `k` clusters, or the closest reachable one when the run
    /// stopped early.
    pub fn cut_to_k(&self, k: usize) -> ClusteringResult {
        self.partition_after(self.n_items.saturating_sub(k))
    }
}
