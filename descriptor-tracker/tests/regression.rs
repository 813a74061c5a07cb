use approx::assert_relative_eq;
use descriptor_tracker::{
    DescriptorCostFunction, DescriptorTracker, JaqamanPairLinker, Link, PairLinker, RunState,
    TrackerSettings,
};
use log::*;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use track_core::nalgebra::Point3;
use track_core::{CorrespondenceGraph, FramePair, Point, PointCloudSequence};

/// Four roughly static points with a little jitter on each of five frames.
const FRAMES: [[(f64, f64); 4]; 5] = [
    [(0.0, 0.0), (1.0, 4.0), (4.0, 0.0), (6.0, 3.0)],
    [(0.1, 0.0), (1.0, 3.9), (4.1, 0.0), (6.0, 3.1)],
    [(0.1, -0.1), (1.1, 3.9), (4.1, 0.1), (5.9, 3.1)],
    [(0.0, -0.1), (1.1, 4.0), (4.0, 0.1), (5.9, 3.0)],
    [(-0.1, -0.1), (1.1, 4.1), (3.9, 0.1), (5.9, 2.9)],
];

fn init_logger() {
    let _ = pretty_env_logger::try_init();
}

fn jittered_squares() -> PointCloudSequence {
    let mut sequence = PointCloudSequence::new();
    for (frame, points) in FRAMES.iter().enumerate() {
        for &(x, y) in points {
            sequence.add_2d(frame, x, y, 1.0);
        }
    }
    sequence
}

fn settings() -> TrackerSettings {
    TrackerSettings::new(3, 3, 3, 10.0, 10.0, true)
}

/// A random cloud that drifts a little and is jittered on every frame.
fn drifting_cloud(seed: u8, num_points: usize, num_frames: usize) -> PointCloudSequence {
    let mut rng = Pcg64::from_seed([seed; 32]);
    let base: Vec<(f64, f64, f64)> = (0..num_points)
        .map(|_| {
            (
                rng.gen_range(0.0..40.0),
                rng.gen_range(0.0..40.0),
                rng.gen_range(0.0..10.0),
            )
        })
        .collect();
    let mut sequence = PointCloudSequence::new();
    for frame in 0..num_frames {
        let drift = 0.3 * frame as f64;
        for &(x, y, z) in &base {
            sequence.add(
                frame,
                Point3::new(
                    x + drift + rng.gen_range(-0.1..0.1),
                    y + rng.gen_range(-0.1..0.1),
                    z + rng.gen_range(-0.1..0.1),
                ),
                1.0,
            );
        }
    }
    sequence
}

fn assert_same_graph(a: &CorrespondenceGraph, b: &CorrespondenceGraph) {
    assert_eq!(a.vertex_count(), b.vertex_count());
    assert_eq!(a.edge_set(), b.edge_set());
    for (source, target, weight) in a.edges() {
        assert_relative_eq!(
            b.edge_weight(source, target).unwrap(),
            weight,
            epsilon = 1e-9
        );
    }
}

#[test]
fn jittered_squares_edge_counts() {
    init_logger();
    let sequence = jittered_squares();
    let mut tracker = DescriptorTracker::new(&sequence, settings()).num_threads(1);
    tracker.process().unwrap();

    // This ensures the underlying algorithm does not change
    // by making sure that we get the exact expected number of links.
    assert_eq!(tracker.raw_graph().edge_count(), 36);
    assert_eq!(tracker.result().edge_count(), 16);
    assert_eq!(tracker.state(), RunState::Completed);
    assert!(tracker.error_message().is_none());

    let tracks = tracker.result().tracks();
    assert_eq!(tracks.len(), 4);
    for track in &tracks {
        let frames: Vec<usize> = track.iter().map(|point| point.frame).collect();
        assert_eq!(frames, vec![0, 1, 2, 3, 4]);
        // Every track follows one of the four points.
        let start = track[0].position;
        assert!(track.iter().all(|point| (point.position - start).norm() < 0.5));
    }
}

#[test]
fn raw_links_respect_the_interval() {
    init_logger();
    let sequence = jittered_squares();
    let mut tracker = DescriptorTracker::new(&sequence, settings()).num_threads(2);
    tracker.process().unwrap();
    let graph = tracker.raw_graph();
    for (a, b, weight) in graph.edges() {
        let (a, b) = (graph.point(a).unwrap(), graph.point(b).unwrap());
        assert_ne!(a.frame, b.frame);
        assert!(a.frame.max(b.frame) - a.frame.min(b.frame) <= 3);
        assert!(weight >= 0.0 && weight < 10.0);
    }
}

#[test]
fn unpruned_result_is_the_raw_graph() {
    init_logger();
    let sequence = jittered_squares();
    let settings = TrackerSettings {
        prune_graph: false,
        ..settings()
    };
    let mut tracker = DescriptorTracker::new(&sequence, settings);
    tracker.process().unwrap();
    assert_eq!(tracker.result().edge_count(), 36);
    assert!(tracker.pruned_graph().is_none());
}

#[test]
fn thread_count_does_not_change_the_graph() {
    init_logger();
    for sequence in [jittered_squares(), drifting_cloud(3, 30, 6)] {
        let graphs: Vec<(CorrespondenceGraph, CorrespondenceGraph)> = [1, 2, 8]
            .iter()
            .map(|&threads| {
                let mut tracker =
                    DescriptorTracker::new(&sequence, settings()).num_threads(threads);
                tracker.process().unwrap();
                info!(
                    "{} threads: {} edges in {:?}",
                    threads,
                    tracker.raw_graph().edge_count(),
                    tracker.processing_time()
                );
                (tracker.raw_graph().clone(), tracker.result().clone())
            })
            .collect();
        for (raw, pruned) in &graphs[1..] {
            assert_same_graph(&graphs[0].0, raw);
            assert_same_graph(&graphs[0].1, pruned);
        }
    }
}

#[test]
fn pruned_graph_only_links_consecutive_observations() {
    init_logger();
    let sequence = drifting_cloud(11, 25, 5);
    let mut tracker = DescriptorTracker::new(&sequence, settings());
    tracker.process().unwrap();
    let pruned = tracker.result();
    assert!(pruned.edge_count() <= tracker.raw_graph().edge_count());
    for track in pruned.tracks() {
        for pair in track.windows(2) {
            assert!(pair[0].frame <= pair[1].frame);
        }
    }
    for (a, b, _) in pruned.edges() {
        assert!(tracker.raw_graph().shortest_path_weight(a, b).is_some());
    }
    let again = track_core::prune(pruned, false);
    assert_eq!(again.edge_set(), pruned.edge_set());
}

#[test]
fn excluded_frames_are_never_linked() {
    init_logger();
    let mut sequence = jittered_squares();
    // Frame 5 only has three points, which is not more than the three neighbors needed.
    for &(x, y) in &FRAMES[4][..3] {
        sequence.add_2d(5, x, y, 1.0);
    }
    let mut tracker = DescriptorTracker::new(&sequence, settings());
    tracker.process().unwrap();
    assert!(tracker.excluded_frames().contains(&5));
    assert!(tracker.raw_graph().vertices().all(|point| point.frame != 5));
    assert_eq!(tracker.raw_graph().edge_count(), 36);
}

/// Links like the default linker, but fails on one frame pair.
struct FailOnPair {
    pair: FramePair,
    inner: JaqamanPairLinker,
}

impl PairLinker for FailOnPair {
    fn link(
        &self,
        pair: FramePair,
        sources: &[Point],
        targets: &[Point],
        cost: &DescriptorCostFunction<'_>,
    ) -> Result<Vec<Link>, jaqaman_lap::Error> {
        if pair == self.pair {
            return Err(jaqaman_lap::Error::Infeasible);
        }
        self.inner.link(pair, sources, targets, cost)
    }
}

#[test]
fn failing_pair_aborts_and_keeps_partial_graph() {
    init_logger();
    let sequence = jittered_squares();
    let linker = FailOnPair {
        pair: FramePair::new(1, 3),
        inner: JaqamanPairLinker::new(10.0),
    };
    let mut tracker =
        DescriptorTracker::with_linker(&sequence, settings(), linker).num_threads(1);
    let error = tracker.process().unwrap_err();

    assert_eq!(tracker.state(), RunState::Aborted);
    let message = tracker.error_message().unwrap();
    assert!(message.contains("source frame 1, target frame 3"));
    assert_eq!(message, error.to_string());

    // Pairs (0, 1), (0, 2), (0, 3) and (1, 2) were linked before the failure.
    assert_eq!(tracker.raw_graph().edge_count(), 16);
    assert!(tracker.pruned_graph().is_none());
    assert_eq!(tracker.result().edge_count(), 16);
}
