//! Local geometric descriptors of points in a point cloud.
//!
//! A [`PointDescriptor`] captures the shape of the neighborhood of a basis point: the
//! positions of its `k` nearest neighbors relative to it. Two descriptors taken from different
//! frames are compared with a [`Matcher`], which proposes candidate pairings of neighbors, and a
//! [`SimilarityMeasure`], which scores each pairing. The smallest score is the descriptor
//! distance, where `0` means identical local geometry.
//!
//! The [`SubsetMatcher`] compares every subset of `subset_size` neighbors of one descriptor
//! against every such subset of the other, which tolerates `num_neighbors - subset_size`
//! neighbors that only exist in one of the two frames.
//!
//! Neighbors are found with a [`NearestNeighborIndex`] built over the points of one frame.

mod descriptor;
mod knn;
mod matcher;
mod similarity;

pub use descriptor::*;
pub use knn::*;
pub use matcher::*;
pub use similarity::*;

use track_core::PointId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("not enough usable points: {found} neighbors given but {required} required")]
    NoSuitablePoints { required: usize, found: usize },
    #[error("basis point {0} is part of its own neighbors")]
    BasisInNeighbors(PointId),
    #[error("subset size {subset_size} must be between 1 and the number of neighbors {num_neighbors}")]
    InvalidSubset {
        subset_size: usize,
        num_neighbors: usize,
    },
}
