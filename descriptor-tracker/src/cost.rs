use crate::DescriptorMapping;
use log::*;
use track_core::Point;

/// The cost of linking two points: the distance between their descriptors.
///
/// Points further apart than the distance threshold, and points without a descriptor, can not
/// be linked and cost `f64::INFINITY`.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorCostFunction<'a> {
    mapping: &'a DescriptorMapping,
    square_distance_threshold: f64,
}

impl<'a> DescriptorCostFunction<'a> {
    pub fn new(mapping: &'a DescriptorMapping, square_distance_threshold: f64) -> Self {
        Self {
            mapping,
            square_distance_threshold,
        }
    }

    /// A cost function that does not limit the distance between linked points.
    pub fn unconstrained(mapping: &'a DescriptorMapping) -> Self {
        Self::new(mapping, f64::INFINITY)
    }

    pub fn square_distance_threshold(&self) -> f64 {
        self.square_distance_threshold
    }

    pub fn mapping(&self) -> &'a DescriptorMapping {
        self.mapping
    }

    pub fn cost(&self, a: &Point, b: &Point) -> f64 {
        if a.square_distance_to(b) > self.square_distance_threshold {
            return f64::INFINITY;
        }
        match (self.mapping.get(a.id), self.mapping.get(b.id)) {
            (Some(da), Some(db)) => da.descriptor_distance(db),
            _ => {
                trace!("no descriptor for link {} -> {}", a.id, b.id);
                f64::INFINITY
            }
        }
    }
}
