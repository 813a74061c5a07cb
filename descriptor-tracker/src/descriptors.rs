use log::*;
use point_descriptor::{NearestNeighborIndex, PointDescriptor, SquareDistance, SubsetMatcher};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use track_core::{FrameIndex, Point, PointId, PointSource};

/// The descriptors of all points that have enough neighbors, keyed by point ID.
#[derive(Debug, Clone, Default)]
pub struct DescriptorMapping {
    descriptors: HashMap<PointId, PointDescriptor>,
    excluded_frames: BTreeSet<FrameIndex>,
}

impl DescriptorMapping {
    /// Builds the descriptors of every frame of `source`.
    ///
    /// A frame with no more points than the matcher needs neighbors is excluded as a whole. A
    /// single point whose descriptor cannot be built is skipped.
    pub fn build<S>(source: &S, matcher: Arc<SubsetMatcher>) -> Self
    where
        S: PointSource + ?Sized,
    {
        let num_neighbors = matcher.num_neighbors();
        let mut mapping = Self {
            descriptors: HashMap::with_capacity(source.num_points_total()),
            excluded_frames: BTreeSet::new(),
        };
        for frame in source.frames() {
            let points = source.points(frame);
            if points.len() <= num_neighbors {
                warn!(
                    "ignoring frame {}: {} points but {} neighbors needed",
                    frame,
                    points.len(),
                    num_neighbors
                );
                mapping.excluded_frames.insert(frame);
                continue;
            }
            mapping.add_frame(points, &matcher);
        }
        debug!(
            "built {} descriptors, excluded {} frames",
            mapping.descriptors.len(),
            mapping.excluded_frames.len()
        );
        mapping
    }

    fn add_frame(&mut self, points: &[Point], matcher: &Arc<SubsetMatcher>) {
        let index = NearestNeighborIndex::new(points);
        let num_neighbors = matcher.num_neighbors();
        for point in points {
            let neighbors: Vec<&Point> = index
                .find_k_nearest(point, num_neighbors + 1)
                .into_iter()
                .filter(|neighbor| neighbor.id != point.id)
                .take(num_neighbors)
                .collect();
            match PointDescriptor::new(point, &neighbors, SquareDistance, matcher.clone()) {
                Ok(descriptor) => {
                    self.descriptors.insert(point.id, descriptor);
                }
                Err(e) => warn!("skipping point {} on frame {}: {}", point.id, point.frame, e),
            }
        }
    }

    pub fn get(&self, id: PointId) -> Option<&PointDescriptor> {
        self.descriptors.get(&id)
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.descriptors.contains_key(&id)
    }

    /// Frames that had too few points to build descriptors.
    pub fn excluded_frames(&self) -> &BTreeSet<FrameIndex> {
        &self.excluded_frames
    }

    pub fn is_excluded(&self, frame: FrameIndex) -> bool {
        self.excluded_frames.contains(&frame)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
