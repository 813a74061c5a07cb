use crate::{FrameIndex, Point, PointId};
use nalgebra::Point3;
use std::collections::BTreeMap;

/// Supplies the points observed on each frame.
///
/// Implementors must be cheap to query repeatedly; the tracker asks for the same frame many
/// times while linking.
pub trait PointSource {
    /// The frames that have data, in ascending order.
    fn frames(&self) -> Vec<FrameIndex>;

    /// The points observed on `frame`. Unknown frames yield an empty slice.
    fn points(&self, frame: FrameIndex) -> &[Point];

    /// The number of points observed on `frame`.
    fn num_points(&self, frame: FrameIndex) -> usize {
        self.points(frame).len()
    }

    /// The number of points over all frames.
    fn num_points_total(&self) -> usize {
        self.frames()
            .into_iter()
            .map(|frame| self.num_points(frame))
            .sum()
    }
}

/// An in-memory sequence of point clouds, one per frame.
///
/// Point IDs are handed out sequentially by [`PointCloudSequence::add`], so they are unique over
/// the whole sequence.
#[derive(Debug, Clone, Default)]
pub struct PointCloudSequence {
    frames: BTreeMap<FrameIndex, Vec<Point>>,
    next_id: u64,
}

impl PointCloudSequence {
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds a point to `frame` and returns its newly assigned ID.
    pub fn add(&mut self, frame: FrameIndex, position: Point3<f64>, quality: f64) -> PointId {
        let id = PointId(self.next_id);
        self.next_id += 1;
        self.frames
            .entry(frame)
            .or_default()
            .push(Point::new(id, frame, position, quality));
        id
    }

    /// Adds a planar point, placed at `z = 0`.
    pub fn add_2d(&mut self, frame: FrameIndex, x: f64, y: f64, quality: f64) -> PointId {
        self.add(frame, Point3::new(x, y, 0.0), quality)
    }

    /// Looks up a point by its ID.
    pub fn point(&self, id: PointId) -> Option<&Point> {
        self.frames.values().flatten().find(|point| point.id == id)
    }

    /// The number of frames that have at least one point.
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl PointSource for PointCloudSequence {
    fn frames(&self) -> Vec<FrameIndex> {
        self.frames.keys().copied().collect()
    }

    fn points(&self, frame: FrameIndex) -> &[Point] {
        self.frames
            .get(&frame)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_ascending() {
        let mut sequence = PointCloudSequence::new();
        sequence.add_2d(5, 0.0, 0.0, 1.0);
        sequence.add_2d(2, 0.0, 0.0, 1.0);
        sequence.add_2d(9, 0.0, 0.0, 1.0);
        sequence.add_2d(2, 1.0, 0.0, 1.0);
        assert_eq!(sequence.frames(), vec![2, 5, 9]);
        assert_eq!(sequence.num_points(2), 2);
        assert_eq!(sequence.num_points_total(), 4);
    }

    #[test]
    fn ids_are_unique_across_frames() {
        let mut sequence = PointCloudSequence::new();
        let a = sequence.add_2d(0, 0.0, 0.0, 1.0);
        let b = sequence.add_2d(1, 0.0, 0.0, 1.0);
        let c = sequence.add_2d(0, 3.0, 0.0, 1.0);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(sequence.point(c).map(|p| p.frame), Some(0));
        assert_eq!(sequence.point(b).map(|p| p.frame), Some(1));
    }

    #[test]
    fn unknown_frame_is_empty() {
        let sequence = PointCloudSequence::new();
        assert!(sequence.is_empty());
        assert!(sequence.points(3).is_empty());
        assert_eq!(sequence.num_points_total(), 0);
    }
}
