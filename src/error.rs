use thiserror::Error;

/// Result alias for `rockc`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the clustering and evaluation primitives.
///
/// Every variant is a configuration problem: the pipeline is deterministic, so
/// nothing here is retryable. Degenerate inputs (no links at a given theta) are
/// not errors; see [`crate::cluster::Termination`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Input was empty.
    #[error("empty input provided")]
    EmptyInput,

    /// Two sequences that must align have different lengths.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Found length.
        found: usize,
    },

    /// Invalid number of clusters requested.
    #[error("cannot create {requested} clusters from {n_items} items")]
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of items.
        n_items: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// A record identifier appears more than once in a dataset.
    #[error("duplicate record identifier '{0}'")]
    DuplicateRecord(String),

    /// Ground truth names a record the dataset does not contain.
    #[error("unknown record identifier '{0}'")]
    UnknownRecord(String),

    /// A dataset record has no ground-truth label.
    #[error("record '{0}' has no ground-truth label")]
    MissingLabel(String),
}

/// Check that `theta` is a finite value in `[0, 1]`.
pub(crate) fn check_theta(theta: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&theta) {
        return Err(Error::InvalidParameter {
            name: "theta",
            message: "must be within [0, 1]",
        });
    }
    Ok(())
}
