use track_core::nalgebra::Vector3;

/// Scores how well a set of matched neighbor positions agree. Lower is more similar.
pub trait SimilarityMeasure {
    fn similarity<'a>(&self, matches: impl Iterator<Item = (&'a Vector3<f64>, &'a Vector3<f64>)>)
        -> f64;
}

/// Sum of the squared distances between matched positions, divided by the number of
/// spatial dimensions.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct SquareDistance;

impl SimilarityMeasure for SquareDistance {
    fn similarity<'a>(
        &self,
        matches: impl Iterator<Item = (&'a Vector3<f64>, &'a Vector3<f64>)>,
    ) -> f64 {
        matches.map(|(a, b)| (a - b).norm_squared()).sum::<f64>() / 3.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identical_positions_score_zero() {
        let a = [Vector3::new(1.0, 2.0, 0.0), Vector3::new(-3.0, 0.5, 0.0)];
        assert_relative_eq!(SquareDistance.similarity(a.iter().zip(a.iter())), 0.0);
    }

    #[test]
    fn averages_over_dimensions() {
        let a = [Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)];
        let b = [Vector3::new(0.0, 3.0, 0.0), Vector3::new(1.0, 0.0, 0.0)];
        assert_relative_eq!(SquareDistance.similarity(a.iter().zip(b.iter())), 3.0);
    }
}
