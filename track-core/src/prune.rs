use crate::{CorrespondenceGraph, FrameIndex};
use log::*;

/// Weight of an edge in a pruned graph whose weight was not recomputed.
pub const UNWEIGHTED: f64 = -1.0;

/// Reduces a correspondence graph to forward links between consecutive observations.
///
/// Each connected component is walked in frame order (ties broken by point ID). Every point is
/// linked to all points of its component on the earliest frame after its own, and to nothing
/// further away. Several successors on that same frame are all kept.
///
/// If `recompute_weights` is set, every new edge is weighted with the shortest path between
/// its endpoints in `graph`, which must then have non-negative weights. Otherwise every edge
/// gets the weight [`UNWEIGHTED`].
///
/// The input is never modified; a new graph is returned.
pub fn prune(graph: &CorrespondenceGraph, recompute_weights: bool) -> CorrespondenceGraph {
    let mut pruned = CorrespondenceGraph::new();

    for track in graph.tracks() {
        for (i, source) in track.iter().enumerate() {
            let mut first_linked_frame: Option<FrameIndex> = None;
            let mut path_weights = None;
            for target in &track[i + 1..] {
                if first_linked_frame.map_or(false, |frame| target.frame > frame) {
                    break;
                }
                if target.frame <= source.frame {
                    continue;
                }
                first_linked_frame = Some(target.frame);
                pruned.add_vertex(*source);
                pruned.add_vertex(*target);
                let weight = if recompute_weights {
                    path_weights
                        .get_or_insert_with(|| graph.shortest_path_weights(source.id))
                        .get(&target.id)
                        .copied()
                        .unwrap_or(f64::INFINITY)
                } else {
                    UNWEIGHTED
                };
                if !pruned.add_edge(source.id, target.id, weight) {
                    error!(
                        "pruning produced edge {} -> {} twice",
                        source.id, target.id
                    );
                }
            }
        }
    }

    debug!(
        "pruned graph from {} to {} edges",
        graph.edge_count(),
        pruned.edge_count()
    );
    pruned
}
