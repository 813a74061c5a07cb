use crate::{Point, PointId};
use petgraph::algo::dijkstra;
use petgraph::graphmap::UnGraphMap;
use petgraph::visit::Bfs;
use std::collections::{BTreeSet, HashMap, HashSet};

/// An undirected weighted graph of accepted links between points.
///
/// Vertices are keyed by [`PointId`] and the [`Point`] of every vertex is kept alongside, so
/// a vertex is never duplicated. The graph is simple: it has no parallel edges and no
/// self-loops.
#[derive(Debug, Clone, Default)]
pub struct CorrespondenceGraph {
    graph: UnGraphMap<PointId, f64>,
    points: HashMap<PointId, Point>,
}

impl CorrespondenceGraph {
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds `point` as a vertex. Returns `false` if the vertex was already present.
    pub fn add_vertex(&mut self, point: Point) -> bool {
        if self.points.contains_key(&point.id) {
            return false;
        }
        self.points.insert(point.id, point);
        self.graph.add_node(point.id);
        true
    }

    /// Adds an edge with the given weight between two existing vertices.
    ///
    /// Returns `false` and leaves the graph untouched if the edge already exists, if it would
    /// be a self-loop, or if either vertex is missing.
    pub fn add_edge(&mut self, a: PointId, b: PointId, weight: f64) -> bool {
        if a == b
            || !self.graph.contains_node(a)
            || !self.graph.contains_node(b)
            || self.graph.contains_edge(a, b)
        {
            return false;
        }
        self.graph.add_edge(a, b, weight);
        true
    }

    /// Replaces the weight of an existing edge. Returns `false` if there is no such edge.
    pub fn set_edge_weight(&mut self, a: PointId, b: PointId, weight: f64) -> bool {
        match self.graph.edge_weight_mut(a, b) {
            Some(w) => {
                *w = weight;
                true
            }
            None => false,
        }
    }

    pub fn contains_vertex(&self, id: PointId) -> bool {
        self.points.contains_key(&id)
    }

    pub fn contains_edge(&self, a: PointId, b: PointId) -> bool {
        self.graph.contains_edge(a, b)
    }

    pub fn edge_weight(&self, a: PointId, b: PointId) -> Option<f64> {
        self.graph.edge_weight(a, b).copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The point stored for a vertex.
    pub fn point(&self, id: PointId) -> Option<&Point> {
        self.points.get(&id)
    }

    /// All vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &Point> + '_ {
        self.graph.nodes().filter_map(move |id| self.points.get(&id))
    }

    /// All edges as `(a, b, weight)` in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (PointId, PointId, f64)> + '_ {
        self.graph.all_edges().map(|(a, b, &weight)| (a, b, weight))
    }

    /// The set of edges with the lower ID first in every pair.
    ///
    /// Two graphs with equal edge sets connect exactly the same points, regardless of the
    /// order the edges were inserted in.
    pub fn edge_set(&self) -> BTreeSet<(PointId, PointId)> {
        self.graph
            .all_edges()
            .map(|(a, b, _)| (a.min(b), a.max(b)))
            .collect()
    }

    pub fn neighbors(&self, id: PointId) -> impl Iterator<Item = PointId> + '_ {
        self.graph.neighbors(id)
    }

    /// Partitions the vertices into connected components.
    ///
    /// Every component is sorted by frame and then by ID. Components are ordered by their
    /// first member.
    pub fn connected_components(&self) -> Vec<Vec<PointId>> {
        let mut seen = HashSet::with_capacity(self.vertex_count());
        let mut starts: Vec<&Point> = self.points.values().collect();
        starts.sort_by_key(|point| (point.frame, point.id));

        let mut components = vec![];
        for start in starts {
            if seen.contains(&start.id) {
                continue;
            }
            let mut component = vec![];
            let mut bfs = Bfs::new(&self.graph, start.id);
            while let Some(id) = bfs.next(&self.graph) {
                seen.insert(id);
                component.push(id);
            }
            component.sort_by_key(|&id| (self.points[&id].frame, id));
            components.push(component);
        }
        components
    }

    /// The connected components of the graph, which are the track segments it describes.
    pub fn tracks(&self) -> Vec<Vec<Point>> {
        self.connected_components()
            .into_iter()
            .map(|component| component.iter().map(|id| self.points[id]).collect())
            .collect()
    }

    /// The weights of the shortest paths from `source` to every vertex reachable from it.
    ///
    /// Edge weights must be non-negative.
    pub fn shortest_path_weights(&self, source: PointId) -> HashMap<PointId, f64> {
        if !self.graph.contains_node(source) {
            return HashMap::new();
        }
        dijkstra(&self.graph, source, None, |(_, _, &weight)| weight)
    }

    /// The weight of the shortest path between two vertices, if they are connected.
    pub fn shortest_path_weight(&self, source: PointId, target: PointId) -> Option<f64> {
        if !self.graph.contains_node(source) || !self.graph.contains_node(target) {
            return None;
        }
        dijkstra(&self.graph, source, Some(target), |(_, _, &weight)| weight)
            .get(&target)
            .copied()
    }
}
