use rstar::primitives::PointWithData;
use rstar::RTree;
use track_core::Point;

type IndexedPoint = PointWithData<usize, [f64; 3]>;

/// Nearest-neighbor lookup over the points of one frame.
pub struct NearestNeighborIndex<'a> {
    points: &'a [Point],
    tree: RTree<IndexedPoint>,
}

impl<'a> NearestNeighborIndex<'a> {
    pub fn new(points: &'a [Point]) -> Self {
        let tree = RTree::bulk_load(
            points
                .iter()
                .enumerate()
                .map(|(ix, point)| IndexedPoint::new(ix, point.coords()))
                .collect(),
        );
        Self { points, tree }
    }

    /// Finds up to `k` points nearest to `point`, nearest first.
    ///
    /// When `point` is itself part of the index it comes first at distance `0`.
    pub fn find_k_nearest(&self, point: &Point, k: usize) -> Vec<&'a Point> {
        let points = self.points;
        self.tree
            .nearest_neighbor_iter(&point.coords())
            .take(k)
            .map(|neighbor| &points[neighbor.data])
            .collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
