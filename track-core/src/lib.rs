//! # Track Core
//!
//! This library provides the common types shared by the crates that link points across
//! frames into trajectories. All of the tracking crates in this workspace depend on it.
//! It pulls in only what is needed to describe the problem:
//!
//! * [`Point`] - an identified location observed at a discrete [`FrameIndex`]
//! * [`PointSource`] - anything that can hand out the points of each frame
//! * [`FramePair`] - an ordered pair of frames eligible for linking
//! * [`CorrespondenceGraph`] - the undirected weighted graph of accepted links
//! * [`prune`] - reduction of a correspondence graph to forward links
//!
//! ## Pruning
//!
//! Linking every eligible frame pair produces a graph in which a point may be connected to
//! several points of the same trajectory further along in time. For example, a point seen on
//! frames `0..=3` with a maximum frame interval of `2` produces this component:
//!
//! ```text
//!   0 ---- 1 ---- 2 ---- 3
//!    \___________/ \
//!           \_______\____/
//! ```
//!
//! [`prune`] walks each connected component in frame order and keeps, for every point, only
//! the links to the earliest frame after its own:
//!
//! ```text
//!   0 ---- 1 ---- 2 ---- 3
//! ```

mod frame;
mod graph;
mod point;
mod prune;
mod source;

pub use frame::*;
pub use graph::*;
pub use nalgebra;
pub use point::*;
pub use prune::*;
pub use source::*;
