//! Categorical records, datasets, and ground-truth labels.
//!
//! A [`Record`] is a transaction: an identifier plus a set of items
//! ("milk", "bread", or `attr=value` pairs for tabular categorical data).
//! A [`Dataset`] is an ordered collection of records. Everything downstream
//! addresses records by their position in the dataset.
//!
//! Item strings are interned once when the dataset is built, so similarity
//! computations run on sorted `u32` token slices rather than on strings.

use crate::error::{Error, Result};
use std::collections::{BTreeSet, HashMap};

/// A single categorical record (e.g. a market basket).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    id: String,
    items: BTreeSet<String>,
}

impl Record {
    /// Create a record from an identifier and its items. Duplicate items collapse.
    pub fn new<I, S>(id: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Record identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The record's attribute values.
    pub fn items(&self) -> &BTreeSet<String> {
        &self.items
    }

    /// Number of distinct items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the record has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// An ordered set of records with unique identifiers.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    /// Sorted, deduplicated interned items per record.
    tokens: Vec<Vec<u32>>,
    index: HashMap<String, usize>,
    n_attributes: usize,
}

impl Dataset {
    /// Build a dataset, rejecting duplicate identifiers.
    ///
    /// An empty record list is accepted here; algorithms reject it at fit time.
    pub fn new(records: Vec<Record>) -> Result<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (i, r) in records.iter().enumerate() {
            if index.insert(r.id.clone(), i).is_some() {
                return Err(Error::DuplicateRecord(r.id.clone()));
            }
        }

        let (tokens, n_attributes) = {
            let mut vocab: HashMap<&str, u32> = HashMap::new();
            let mut tokens = Vec::with_capacity(records.len());
            for r in &records {
                let mut row: Vec<u32> = r
                    .items
                    .iter()
                    .map(|item| {
                        let next = vocab.len() as u32;
                        *vocab.entry(item.as_str()).or_insert(next)
                    })
                    .collect();
                row.sort_unstable();
                tokens.push(row);
            }
            (tokens, vocab.len())
        };

        Ok(Self {
            records,
            tokens,
            index,
            n_attributes,
        })
    }

    /// Convenience constructor from `(id, items)` pairs.
    pub fn from_transactions<I, S, T>(transactions: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        let records = transactions
            .into_iter()
            .map(|(id, items)| Record::new(id, items))
            .collect();
        Self::new(records)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in dataset order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Record at position `i`.
    pub fn record(&self, i: usize) -> Option<&Record> {
        self.records.get(i)
    }

    /// Position of the record with identifier `id`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Size of the attribute universe shared by all records.
    pub fn n_attributes(&self) -> usize {
        self.n_attributes
    }

    /// Interned, sorted items of record `i`.
    pub(crate) fn tokens(&self, i: usize) -> &[u32] {
        &self.tokens[i]
    }

    pub(crate) fn ensure_non_empty(&self) -> Result<()> {
        if self.is_empty() {
            Err(Error::EmptyInput)
        } else {
            Ok(())
        }
    }
}

/// Ground-truth class labels, one per dataset record.
///
/// Only the evaluation harness reads this; clustering algorithms never see it.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundTruth {
    /// Dense label index per record position.
    labels: Vec<usize>,
    /// Label names, indexed by dense label.
    names: Vec<String>,
}

impl GroundTruth {
    /// Resolve `(record id, label)` pairs against `dataset`.
    ///
    /// Fails on identifiers the dataset does not contain and on dataset records
    /// left without a label. A record listed twice keeps its last label.
    pub fn new<I, S, L>(dataset: &Dataset, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, L)>,
        S: AsRef<str>,
        L: Into<String>,
    {
        let mut by_name: HashMap<String, usize> = HashMap::new();
        let mut names: Vec<String> = Vec::new();
        let mut labels: Vec<Option<usize>> = vec![None; dataset.len()];

        for (id, label) in pairs {
            let id = id.as_ref();
            let pos = dataset
                .position(id)
                .ok_or_else(|| Error::UnknownRecord(id.to_string()))?;
            let label = label.into();
            let dense = match by_name.get(&label) {
                Some(&d) => d,
                None => {
                    let d = names.len();
                    by_name.insert(label.clone(), d);
                    names.push(label);
                    d
                }
            };
            labels[pos] = Some(dense);
        }

        let labels = labels
            .into_iter()
            .enumerate()
            .map(|(i, l)| l.ok_or_else(|| Error::MissingLabel(dataset.records[i].id.clone())))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { labels, names })
    }

    /// Build from labels given directly in dataset order.
    ///
    /// Label values may be arbitrary; they are renumbered densely in ascending
    /// order and the original value becomes the label name.
    pub fn from_labels(labels: Vec<usize>) -> Self {
        let distinct: Vec<usize> = labels
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let labels = labels
            .iter()
            .filter_map(|l| distinct.binary_search(l).ok())
            .collect();
        let names = distinct.iter().map(usize::to_string).collect();
        Self { labels, names }
    }

    /// Dense label per record position.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Name of dense label `label`.
    pub fn label_name(&self, label: usize) -> Option<&str> {
        self.names.get(label).map(String::as_str)
    }

    /// Number of distinct classes.
    pub fn n_classes(&self) -> usize {
        self.names.len()
    }

    /// Number of labelled records.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no record is labelled.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
