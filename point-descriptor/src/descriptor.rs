use crate::{Error, Matcher, SimilarityMeasure, SquareDistance, SubsetMatcher};
use float_ord::FloatOrd;
use std::sync::Arc;
use track_core::nalgebra::Vector3;
use track_core::{Point, PointId};

/// The local neighborhood of a basis point.
///
/// Neighbor positions are stored relative to the basis point, nearest first, which makes the
/// descriptor invariant to translation. The matcher is shared between all descriptors of a run.
#[derive(Debug, Clone)]
pub struct PointDescriptor<S = SquareDistance, M = SubsetMatcher> {
    basis: Point,
    neighbors: Vec<PointId>,
    relative: Vec<Vector3<f64>>,
    similarity: S,
    matcher: Arc<M>,
}

impl<S, M> PointDescriptor<S, M>
where
    S: SimilarityMeasure,
    M: Matcher,
{
    /// Builds the descriptor of `basis` from its neighbors, ordered nearest first.
    ///
    /// Fails if there are fewer neighbors than the matcher requires, or if the basis point
    /// is listed among its own neighbors.
    pub fn new(
        basis: &Point,
        neighbors: &[&Point],
        similarity: S,
        matcher: Arc<M>,
    ) -> Result<Self, Error> {
        let required = matcher.required_neighbors();
        if neighbors.len() < required {
            return Err(Error::NoSuitablePoints {
                required,
                found: neighbors.len(),
            });
        }
        if neighbors.iter().any(|neighbor| neighbor.id == basis.id) {
            return Err(Error::BasisInNeighbors(basis.id));
        }
        Ok(Self {
            basis: *basis,
            neighbors: neighbors.iter().map(|neighbor| neighbor.id).collect(),
            relative: neighbors
                .iter()
                .map(|neighbor| neighbor.position - basis.position)
                .collect(),
            similarity,
            matcher,
        })
    }

    pub fn basis(&self) -> &Point {
        &self.basis
    }

    /// IDs of the neighbors, nearest first.
    pub fn neighbors(&self) -> &[PointId] {
        &self.neighbors
    }

    /// Positions of the neighbors relative to the basis point, nearest first.
    pub fn relative_positions(&self) -> &[Vector3<f64>] {
        &self.relative
    }

    /// The smallest similarity over all candidate pairings proposed by the matcher.
    ///
    /// Both descriptors must have been built with the same matcher.
    pub fn descriptor_distance(&self, other: &Self) -> f64 {
        self.matcher
            .candidates()
            .map(|(a, b)| {
                self.similarity.similarity(
                    a.iter()
                        .zip(b)
                        .map(|(&i, &j)| (&self.relative[i], &other.relative[j])),
                )
            })
            .min_by_key(|&similarity| FloatOrd(similarity))
            .map_or(f64::INFINITY, |best| {
                best * self.matcher.normalization_factor()
            })
    }
}
