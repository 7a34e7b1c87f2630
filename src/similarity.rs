//! Jaccard similarity between categorical records.
//!
//! ```text
//! J(A, B) = |A ∩ B| / |A ∪ B|
//! ```
//!
//! Two empty records have similarity 0 (there is nothing to share).
//!
//! [`SimilarityMatrix`] holds every pairwise value for a dataset in condensed
//! form (upper triangle, row-major, length N-choose-2). Each unordered pair is
//! evaluated exactly once and the diagonal is never computed.

use crate::dataset::{Dataset, Record};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Jaccard similarity between two records.
pub fn jaccard(a: &Record, b: &Record) -> f64 {
    let inter = a.items().intersection(b.items()).count();
    ratio(inter, a.len(), b.len())
}

/// Jaccard similarity between two sorted, deduplicated slices.
pub fn jaccard_sorted<T: Ord>(a: &[T], b: &[T]) -> f64 {
    let (mut i, mut j, mut inter) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                inter += 1;
                i += 1;
                j += 1;
            }
        }
    }
    ratio(inter, a.len(), b.len())
}

#[inline]
fn ratio(inter: usize, len_a: usize, len_b: usize) -> f64 {
    let union = len_a + len_b - inter;
    if union == 0 {
        0.0
    } else {
        inter as f64 / union as f64
    }
}

/// Offset of pair `(i, j)`, `i < j`, in a condensed matrix over `n` items.
#[inline]
pub(crate) fn condensed_index(n: usize, i: usize, j: usize) -> usize {
    debug_assert!(i < j && j < n);
    n * i - i * (i + 1) / 2 + (j - i - 1)
}

/// Pairwise Jaccard similarities for a whole dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    condensed: Vec<f64>,
}

impl SimilarityMatrix {
    /// Compute all pairwise similarities of `dataset`.
    pub fn compute(dataset: &Dataset) -> Self {
        let n = dataset.len();
        let row = |i: usize| -> Vec<f64> {
            ((i + 1)..n)
                .map(|j| jaccard_sorted(dataset.tokens(i), dataset.tokens(j)))
                .collect()
        };

        #[cfg(feature = "parallel")]
        let rows: Vec<Vec<f64>> = (0..n).into_par_iter().map(row).collect();
        #[cfg(not(feature = "parallel"))]
        let rows: Vec<Vec<f64>> = (0..n).map(row).collect();

        let condensed = rows.into_iter().flatten().collect();
        tracing::debug!(n_records = n, "computed similarity matrix");
        Self { n, condensed }
    }

    /// Number of records covered.
    pub fn n_items(&self) -> usize {
        self.n
    }

    /// Similarity of `i` and `j`; `None` on the diagonal or out of range.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i == j || i >= self.n || j >= self.n {
            return None;
        }
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        Some(self.condensed[condensed_index(self.n, lo, hi)])
    }

    /// Records `k != i` with `sim(i, k) >= theta`, ascending.
    pub fn neighbors_of(&self, i: usize, theta: f64) -> Vec<usize> {
        (0..self.n)
            .filter(|&k| self.get(i, k).is_some_and(|s| s >= theta))
            .collect()
    }

    /// Condensed upper triangle, row-major.
    pub fn as_condensed(&self) -> &[f64] {
        &self.condensed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jaccard_basic() {
        let a = Record::new("a", ["x", "y"]);
        let b = Record::new("b", ["x", "y", "z"]);
        assert!((jaccard(&a, &b) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(jaccard(&a, &b), jaccard(&b, &a));
    }

    #[test]
    fn jaccard_empty_is_zero() {
        let a = Record::new("a", Vec::<String>::new());
        let b = Record::new("b", Vec::<String>::new());
        assert_eq!(jaccard(&a, &b), 0.0);
        assert_eq!(jaccard_sorted::<u32>(&[], &[1, 2]), 0.0);
    }

    #[test]
    fn sorted_matches_set_version() {
        let a = Record::new("a", ["p", "q", "r", "s"]);
        let b = Record::new("b", ["q", "s", "t"]);
        let sa: Vec<&String> = a.items().iter().collect();
        let sb: Vec<&String> = b.items().iter().collect();
        assert_eq!(jaccard(&a, &b), jaccard_sorted(&sa, &sb));
    }

    #[test]
    fn condensed_layout() {
        // n = 4: (0,1) (0,2) (0,3) (1,2) (1,3) (2,3)
        assert_eq!(condensed_index(4, 0, 1), 0);
        assert_eq!(condensed_index(4, 0, 3), 2);
        assert_eq!(condensed_index(4, 1, 2), 3);
        assert_eq!(condensed_index(4, 2, 3), 5);
    }

    #[test]
    fn matrix_symmetric_no_diagonal() {
        let ds = Dataset::from_transactions([
            ("r1", vec!["a", "b"]),
            ("r2", vec!["a", "b", "c"]),
            ("r3", vec!["x"]),
        ])
        .unwrap();
        let sim = SimilarityMatrix::compute(&ds);
        assert_eq!(sim.as_condensed().len(), 3);
        assert_eq!(sim.get(0, 0), None);
        assert_eq!(sim.get(0, 1), sim.get(1, 0));
        assert_eq!(sim.get(0, 2), Some(0.0));
        assert_eq!(sim.neighbors_of(0, 0.5), vec![1]);
    }
}
