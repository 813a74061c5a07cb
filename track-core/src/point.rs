use derive_more::{Display, From, Into};
use nalgebra::Point3;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The discrete time index a point was observed at.
pub type FrameIndex = usize;

/// Identity of a point, stable for the whole tracking run.
///
/// Descriptors, graph vertices and assignment results all refer to points through this key,
/// so two points are the same vertex exactly when their IDs are equal.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, From, Into,
)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PointId(pub u64);

/// A point observed on a frame.
///
/// Points are always stored in 3d. Planar data is represented with `z = 0`, which leaves
/// every distance unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Point {
    /// Unique identity of the point.
    pub id: PointId,
    /// The frame the point was observed on.
    pub frame: FrameIndex,
    /// The location of the point.
    pub position: Point3<f64>,
    /// The detection quality of the point.
    pub quality: f64,
}

impl Point {
    pub fn new(id: PointId, frame: FrameIndex, position: Point3<f64>, quality: f64) -> Self {
        Self {
            id,
            frame,
            position,
            quality,
        }
    }

    /// Squared euclidean distance between the positions of two points.
    pub fn square_distance_to(&self, other: &Point) -> f64 {
        nalgebra::distance_squared(&self.position, &other.position)
    }

    /// The position as a plain array, which is what spatial indices consume.
    pub fn coords(&self) -> [f64; 3] {
        [self.position.x, self.position.y, self.position.z]
    }
}
