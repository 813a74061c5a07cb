//! # Descriptor Tracker
//!
//! Links points observed on many frames into tracks by comparing the shape of their
//! neighborhoods instead of only their positions. This makes linking robust to motion that is
//! shared by a whole group of points, such as drift of the sample, as long as the points keep
//! their arrangement relative to each other.
//!
//! A run of the [`DescriptorTracker`] goes through these steps:
//!
//! 1. Every point of every frame gets a [`PointDescriptor`](point_descriptor::PointDescriptor)
//!    built from its nearest neighbors ([`DescriptorMapping`]). Frames with too few points are
//!    excluded.
//! 2. All pairs of remaining frames at most `max_interval` apart are listed
//!    ([`generate_frame_pairs`]).
//! 3. For each frame pair, the [`DescriptorCostFunction`] fills a cost matrix and an optimal
//!    assignment links the points of the two frames ([`JaqamanPairLinker`]). Frame pairs are
//!    processed in parallel by the [`LinkingEngine`] and all links end up in a single
//!    [`CorrespondenceGraph`](track_core::CorrespondenceGraph).
//! 4. Optionally, the graph is pruned down to links between consecutive observations of each
//!    track ([`prune`](track_core::prune)).
//!
//! ```
//! use descriptor_tracker::{DescriptorTracker, TrackerSettings};
//! use track_core::PointCloudSequence;
//!
//! let frames = [
//!     [(0.0, 0.0), (1.0, 4.0), (4.0, 0.0), (6.0, 3.0)],
//!     [(0.1, 0.0), (1.0, 3.9), (4.1, 0.0), (6.0, 3.1)],
//!     [(0.1, -0.1), (1.1, 3.9), (4.1, 0.1), (5.9, 3.1)],
//! ];
//! let mut sequence = PointCloudSequence::new();
//! for (frame, points) in frames.iter().enumerate() {
//!     for &(x, y) in points {
//!         sequence.add_2d(frame, x, y, 1.0);
//!     }
//! }
//!
//! let settings = TrackerSettings::new(3, 3, 2, 10.0, 10.0, true);
//! let mut tracker = DescriptorTracker::new(&sequence, settings);
//! tracker.process().unwrap();
//! assert_eq!(tracker.result().tracks().len(), 4);
//! ```

mod cost;
mod descriptors;
mod frame_pairs;
mod linking;
mod settings;
mod tracker;

pub use cost::*;
pub use descriptors::*;
pub use frame_pairs::*;
pub use linking::*;
pub use settings::*;
pub use tracker::*;

pub use jaqaman_lap;
pub use point_descriptor;
pub use track_core;

use track_core::FrameIndex;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("there are no points to track")]
    EmptyInput,
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("linking failed: source frame {source_frame}, target frame {target_frame}")]
    Linking {
        source_frame: FrameIndex,
        target_frame: FrameIndex,
        source: jaqaman_lap::Error,
    },
    #[error("descriptor error: {0}")]
    Descriptor(#[from] point_descriptor::Error),
    #[error("failed to create thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
