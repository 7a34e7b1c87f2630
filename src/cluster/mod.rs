//! Clustering algorithms for categorical records.
//!
//! ## Link-Based vs Distance-Based
//!
//! **Distance-based** agglomeration merges the two closest clusters, where
//! closeness comes from pairwise record similarity. On market-basket data this
//! goes wrong in a familiar way: two baskets from different segments that
//! happen to share a popular item look close, and single or centroid linkage
//! chains whole segments together through them.
//!
//! **Link-based** agglomeration (ROCK) first turns similarity into a neighbor
//! relation with a threshold θ, then counts **links**: how many neighbors two
//! records share. Merging is driven by links normalized for cluster size, so a
//! lone shared item no longer bridges segments unless the surrounding
//! neighborhoods agree.
//!
//! ## Algorithms
//!
//! ### ROCK
//!
//! See [`Rock`]. Requires θ and the target cluster count `k`. Stops early (with
//! more than `k` clusters) when the remaining clusters share no links, and
//! records every merge in a [`MergeHistory`].
//!
//! ### Linkage baselines
//!
//! See [`LinkageBaseline`]: classic agglomerative clustering on Jaccard
//! distance, for comparison. Any other strategy can be plugged in through the
//! [`Clustering`] trait.
//!
//! ## Usage
//!
//! ```rust
//! use rockc::cluster::{Clustering, LinkageBaseline, Rock};
//! use rockc::Dataset;
//!
//! let data = Dataset::from_transactions([
//!     ("r1", vec!["a", "b"]),
//!     ("r2", vec!["a", "b", "c"]),
//!     ("r3", vec!["x", "y"]),
//!     ("r4", vec!["x", "y", "z"]),
//! ])
//! .unwrap();
//!
//! let fit = Rock::new(0.5, 2).fit(&data).unwrap();
//! assert_eq!(fit.result.labels(), vec![0, 0, 1, 1]);
//!
//! let baseline = LinkageBaseline::new(2).fit_predict(&data).unwrap();
//! assert_eq!(baseline.n_clusters(), 2);
//! ```

mod baseline;
mod history;
mod result;
mod rock;
mod traits;
mod util;

pub use baseline::{Linkage, LinkageBaseline};
pub use history::{MergeEvent, MergeHistory};
pub use result::{Cluster, ClusteringResult};
pub use rock::{agglomerate, goodness, normalization_exponent, Rock, RockFit, Termination};
pub use traits::Clustering;
