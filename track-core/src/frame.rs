use crate::FrameIndex;
use core::fmt;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A pair of frames whose points are compared against each other.
///
/// The source frame always precedes the target frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct FramePair {
    pub source: FrameIndex,
    pub target: FrameIndex,
}

impl FramePair {
    /// Creates a new pair, cannonicalizing the order of the pair.
    pub fn new(a: FrameIndex, b: FrameIndex) -> Self {
        Self {
            source: a.min(b),
            target: a.max(b),
        }
    }

    /// The number of frames the target lies after the source.
    pub fn interval(&self) -> usize {
        self.target - self.source
    }
}

impl fmt::Display for FramePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.source, self.target)
    }
}
