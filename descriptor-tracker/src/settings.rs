use crate::Error;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The settings of a tracking run.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrackerSettings {
    /// The number of neighbors that must agree for two descriptors to match.
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_subset_size"))]
    pub subset_size: usize,
    /// The number of nearest neighbors a descriptor is built from.
    ///
    /// Frames with at most this many points are excluded from linking.
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_num_neighbors"))]
    pub num_neighbors: usize,
    /// The largest frame difference for which points are linked directly.
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_max_interval"))]
    pub max_interval: usize,
    /// Links with a descriptor distance at or above this are never made.
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_cost_threshold"))]
    pub cost_threshold: f64,
    /// Points further apart than the square root of this are never linked.
    #[cfg_attr(
        feature = "serde-serialize",
        serde(default = "default_square_distance_threshold")
    )]
    pub square_distance_threshold: f64,
    /// Reduce the result to links between consecutive observations of a track.
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_prune_graph"))]
    pub prune_graph: bool,
}

impl TrackerSettings {
    pub fn new(
        subset_size: usize,
        num_neighbors: usize,
        max_interval: usize,
        cost_threshold: f64,
        square_distance_threshold: f64,
        prune_graph: bool,
    ) -> Self {
        Self {
            subset_size,
            num_neighbors,
            max_interval,
            cost_threshold,
            square_distance_threshold,
            prune_graph,
        }
    }

    /// Sets the maximum distance between linked points.
    #[must_use]
    pub fn with_max_linking_distance(self, distance: f64) -> Self {
        Self {
            square_distance_threshold: distance * distance,
            ..self
        }
    }

    /// The maximum distance between linked points.
    pub fn max_linking_distance(&self) -> f64 {
        self.square_distance_threshold.sqrt()
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.num_neighbors == 0 {
            return Err(Error::InvalidSettings(
                "at least one neighbor is required".to_owned(),
            ));
        }
        if self.subset_size == 0 || self.subset_size > self.num_neighbors {
            return Err(Error::InvalidSettings(format!(
                "subset size {} must be between 1 and the number of neighbors {}",
                self.subset_size, self.num_neighbors
            )));
        }
        if self.cost_threshold.is_nan() || self.square_distance_threshold.is_nan() {
            return Err(Error::InvalidSettings(
                "thresholds must not be NaN".to_owned(),
            ));
        }
        Ok(())
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            subset_size: default_subset_size(),
            num_neighbors: default_num_neighbors(),
            max_interval: default_max_interval(),
            cost_threshold: default_cost_threshold(),
            square_distance_threshold: default_square_distance_threshold(),
            prune_graph: default_prune_graph(),
        }
    }
}

/// The number of threads used when none is given: the available hardware parallelism.
pub fn default_num_threads() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

fn default_subset_size() -> usize {
    5
}

fn default_num_neighbors() -> usize {
    7
}

fn default_max_interval() -> usize {
    5
}

fn default_cost_threshold() -> f64 {
    100.0
}

fn default_square_distance_threshold() -> f64 {
    100.0
}

fn default_prune_graph() -> bool {
    true
}
