use crate::Error;
use itertools::Itertools;

/// Proposes pairings between the neighbors of two descriptors.
///
/// A candidate is a pair of equally long index lists `(a, b)`, meaning neighbor `a[i]` of the
/// first descriptor is paired with neighbor `b[i]` of the second one.
pub trait Matcher {
    /// The number of neighbors a descriptor needs for this matcher.
    fn required_neighbors(&self) -> usize;

    /// All candidate pairings.
    fn candidates(&self) -> Box<dyn Iterator<Item = (&[usize], &[usize])> + '_>;

    /// Factor the best similarity is scaled by.
    fn normalization_factor(&self) -> f64 {
        1.0
    }
}

/// Pairs every `subset_size` subset of the nearest `num_neighbors` neighbors with every such
/// subset of the other descriptor.
///
/// Subsets keep the nearest-first order of the neighbors, so the `i`-th nearest member of one
/// subset is paired with the `i`-th nearest member of the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetMatcher {
    subset_size: usize,
    num_neighbors: usize,
    subsets: Vec<Vec<usize>>,
}

impl SubsetMatcher {
    pub fn new(subset_size: usize, num_neighbors: usize) -> Result<Self, Error> {
        if subset_size == 0 || subset_size > num_neighbors {
            return Err(Error::InvalidSubset {
                subset_size,
                num_neighbors,
            });
        }
        let subsets = (0..num_neighbors).combinations(subset_size).collect();
        Ok(Self {
            subset_size,
            num_neighbors,
            subsets,
        })
    }

    pub fn subset_size(&self) -> usize {
        self.subset_size
    }

    pub fn num_neighbors(&self) -> usize {
        self.num_neighbors
    }

    /// The number of subsets of one descriptor.
    pub fn num_subsets(&self) -> usize {
        self.subsets.len()
    }
}

impl Matcher for SubsetMatcher {
    fn required_neighbors(&self) -> usize {
        self.num_neighbors
    }

    fn candidates(&self) -> Box<dyn Iterator<Item = (&[usize], &[usize])> + '_> {
        Box::new(
            self.subsets
                .iter()
                .cartesian_product(self.subsets.iter())
                .map(|(a, b)| (a.as_slice(), b.as_slice())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerates_all_subset_pairs() {
        let matcher = SubsetMatcher::new(3, 5).unwrap();
        assert_eq!(matcher.num_subsets(), 10);
        assert_eq!(matcher.candidates().count(), 100);
        assert!(matcher
            .candidates()
            .all(|(a, b)| a.len() == 3 && b.len() == 3));
    }

    #[test]
    fn subsets_keep_neighbor_order() {
        let matcher = SubsetMatcher::new(2, 3).unwrap();
        let (first, _) = matcher.candidates().next().unwrap();
        assert_eq!(first, &[0, 1]);
        assert!(matcher.candidates().all(|(a, _)| a[0] < a[1]));
    }

    #[test]
    fn rejects_impossible_subsets() {
        assert_eq!(
            SubsetMatcher::new(4, 3),
            Err(Error::InvalidSubset {
                subset_size: 4,
                num_neighbors: 3
            })
        );
        assert!(SubsetMatcher::new(0, 3).is_err());
    }
}
