//! Clusters and final partitions.

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// A non-empty set of record indices.
///
/// Clusters are values: merging two clusters produces a new one, the parents
/// are never edited.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cluster {
    id: usize,
    /// Record indices, ascending.
    members: Vec<usize>,
}

impl Cluster {
    pub(crate) fn singleton(record: usize) -> Self {
        Self {
            id: record,
            members: vec![record],
        }
    }

    /// Union of `a` and `b` under a new id.
    pub(crate) fn merged(id: usize, a: &Cluster, b: &Cluster) -> Self {
        let mut members = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        while i < a.members.len() && j < b.members.len() {
            if a.members[i] < b.members[j] {
                members.push(a.members[i]);
                i += 1;
            } else {
                members.push(b.members[j]);
                j += 1;
            }
        }
        members.extend_from_slice(&a.members[i..]);
        members.extend_from_slice(&b.members[j..]);
        Self { id, members }
    }

    /// Cluster id. For ROCK, leaves are record indices and the `i`-th merge
    /// creates id `n + i`.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Member record indices, ascending.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false; clusters are non-empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether record `i` belongs to this cluster.
    pub fn contains(&self, i: usize) -> bool {
        self.members.binary_search(&i).is_ok()
    }
}

/// A partition of a dataset into clusters.
///
/// Clusters are ordered by their smallest member, so two results describing
/// the same partition compare equal on [`ClusteringResult::labels`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClusteringResult {
    n_items: usize,
    clusters: Vec<Cluster>,
}

impl ClusteringResult {
    pub(crate) fn from_parts(n_items: usize, mut clusters: Vec<Cluster>) -> Self {
        clusters.sort_by_key(|c| c.members[0]);
        Self { n_items, clusters }
    }

    /// Build from explicit groups of record indices.
    ///
    /// The groups must partition `0..n_items`: no empty group, no index out of
    /// range, every index exactly once.
    pub fn from_clusters(n_items: usize, groups: Vec<Vec<usize>>) -> Result<Self> {
        let mut seen = vec![false; n_items];
        let mut clusters = Vec::with_capacity(groups.len());
        for (id, mut members) in groups.into_iter().enumerate() {
            if members.is_empty() {
                return Err(Error::InvalidParameter {
                    name: "clusters",
                    message: "clusters must be non-empty",
                });
            }
            for &m in &members {
                let Some(slot) = seen.get_mut(m) else {
                    return Err(Error::InvalidParameter {
                        name: "clusters",
                        message: "record index out of range",
                    });
                };
                if *slot {
                    return Err(Error::InvalidParameter {
                        name: "clusters",
                        message: "record assigned to more than one cluster",
                    });
                }
                *slot = true;
            }
            members.sort_unstable();
            clusters.push(Cluster { id, members });
        }
        if seen.iter().any(|&s| !s) {
            return Err(Error::InvalidParameter {
                name: "clusters",
                message: "clusters do not cover every record",
            });
        }
        Ok(Self::from_parts(n_items, clusters))
    }

    /// Build from one label per record. Label values are arbitrary.
    pub fn from_labels(labels: &[usize]) -> Self {
        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (i, &l) in labels.iter().enumerate() {
            groups.entry(l).or_default().push(i);
        }
        let clusters = groups
            .into_values()
            .enumerate()
            .map(|(id, members)| Cluster { id, members })
            .collect();
        Self::from_parts(labels.len(), clusters)
    }

    /// Number of records partitioned.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of clusters.
    pub fn n_clusters(&self) -> usize {
        self.clusters.len()
    }

    /// Clusters, ordered by smallest member.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Cluster position per record (`0..n_clusters`).
    pub fn labels(&self) -> Vec<usize> {
        let mut labels = vec![0; self.n_items];
        for (c, cluster) in self.clusters.iter().enumerate() {
            for &m in &cluster.members {
                labels[m] = c;
            }
        }
        labels
    }

    /// Cluster sizes, in cluster order.
    pub fn sizes(&self) -> Vec<usize> {
        self.clusters.iter().map(Cluster::len).collect()
    }

    /// Record identifiers per cluster.
    pub fn record_ids<'a>(&self, dataset: &'a Dataset) -> Result<Vec<Vec<&'a str>>> {
        if dataset.len() != self.n_items {
            return Err(Error::DimensionMismatch {
                expected: self.n_items,
                found: dataset.len(),
            });
        }
        Ok(self
            .clusters
            .iter()
            .map(|c| {
                c.members
                    .iter()
                    .filter_map(|&m| dataset.record(m).map(|r| r.id()))
                    .collect()
            })
            .collect())
    }
}
