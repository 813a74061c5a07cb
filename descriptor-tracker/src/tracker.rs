use crate::{
    default_num_threads, generate_frame_pairs, DescriptorCostFunction, DescriptorMapping, Error,
    JaqamanPairLinker, LinkingEngine, PairLinker, TrackerSettings,
};
use log::*;
use point_descriptor::SubsetMatcher;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use track_core::{prune, CorrespondenceGraph, FrameIndex, PointSource};

/// The stage a [`DescriptorTracker`] is in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RunState {
    /// [`DescriptorTracker::process`] has not been called yet.
    Idle,
    Running,
    /// All frame pairs were linked.
    Completed,
    /// Linking a frame pair failed. The graph holds the links found until then.
    Aborted,
}

/// Links the points of a [`PointSource`] into tracks.
///
/// See the crate documentation for the steps of a run.
pub struct DescriptorTracker<'a, S: ?Sized, L = JaqamanPairLinker> {
    source: &'a S,
    settings: TrackerSettings,
    linker: L,
    num_threads: usize,
    state: RunState,
    graph: CorrespondenceGraph,
    pruned_graph: Option<CorrespondenceGraph>,
    excluded_frames: BTreeSet<FrameIndex>,
    error_message: Option<String>,
    processing_time: Duration,
}

impl<'a, S> DescriptorTracker<'a, S>
where
    S: PointSource + Sync + ?Sized,
{
    /// Creates a tracker that links with [`JaqamanPairLinker`] on all available cores.
    pub fn new(source: &'a S, settings: TrackerSettings) -> Self {
        let linker = JaqamanPairLinker::new(settings.cost_threshold);
        Self::with_linker(source, settings, linker)
    }
}

impl<'a, S, L> DescriptorTracker<'a, S, L>
where
    S: PointSource + Sync + ?Sized,
    L: PairLinker,
{
    /// Creates a tracker that links frame pairs with `linker`.
    pub fn with_linker(source: &'a S, settings: TrackerSettings, linker: L) -> Self {
        Self {
            source,
            settings,
            linker,
            num_threads: default_num_threads(),
            state: RunState::Idle,
            graph: CorrespondenceGraph::new(),
            pruned_graph: None,
            excluded_frames: BTreeSet::new(),
            error_message: None,
            processing_time: Duration::ZERO,
        }
    }

    /// Sets the number of worker threads. At least one thread is always used.
    pub fn set_num_threads(&mut self, num_threads: usize) {
        self.num_threads = num_threads.max(1);
    }

    #[must_use]
    pub fn num_threads(mut self, num_threads: usize) -> Self {
        self.set_num_threads(num_threads);
        self
    }

    pub fn threads(&self) -> usize {
        self.num_threads
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    /// Checks that there is something to track and that the settings are usable.
    pub fn check_input(&self) -> Result<(), Error> {
        if self.source.num_points_total() == 0 {
            return Err(Error::EmptyInput);
        }
        self.settings.validate()
    }

    /// Runs the tracker.
    ///
    /// On failure the error is also kept as [`DescriptorTracker::error_message`]. If linking a
    /// frame pair failed, the links found until then remain in [`DescriptorTracker::raw_graph`].
    pub fn process(&mut self) -> Result<(), Error> {
        let start = Instant::now();
        self.graph = CorrespondenceGraph::new();
        self.pruned_graph = None;
        self.excluded_frames.clear();
        self.error_message = None;

        if let Err(e) = self.check_input() {
            self.error_message = Some(e.to_string());
            return Err(e);
        }
        self.state = RunState::Running;

        info!("matching descriptors");
        let matcher =
            match SubsetMatcher::new(self.settings.subset_size, self.settings.num_neighbors) {
                Ok(matcher) => Arc::new(matcher),
                Err(e) => return Err(self.abort(e.into(), start)),
            };
        let mapping = DescriptorMapping::build(self.source, matcher);
        self.excluded_frames = mapping.excluded_frames().clone();
        let cost = DescriptorCostFunction::new(&mapping, self.settings.square_distance_threshold);
        let pairs = generate_frame_pairs(
            &self.source.frames(),
            mapping.excluded_frames(),
            self.settings.max_interval,
        );

        info!("computing links on {} threads", self.num_threads);
        let engine = LinkingEngine::new(self.source, cost, &self.linker, self.num_threads);
        let outcome = engine.run(&pairs);
        self.graph = outcome.graph;
        if let Err(e) = outcome.result {
            return Err(self.abort(e, start));
        }

        if self.settings.prune_graph {
            info!("pruning graph");
            self.pruned_graph = Some(prune(&self.graph, true));
        }

        self.processing_time = start.elapsed();
        self.state = RunState::Completed;
        info!(
            "linked {} frame pairs into {} edges in {:?}",
            pairs.len(),
            self.graph.edge_count(),
            self.processing_time
        );
        Ok(())
    }

    fn abort(&mut self, e: Error, start: Instant) -> Error {
        self.processing_time = start.elapsed();
        self.state = RunState::Aborted;
        self.error_message = Some(e.to_string());
        e
    }

    /// The pruned graph if pruning is enabled, the raw graph otherwise.
    pub fn result(&self) -> &CorrespondenceGraph {
        match (&self.pruned_graph, self.settings.prune_graph) {
            (Some(pruned), true) => pruned,
            _ => &self.graph,
        }
    }

    /// All links found, before pruning.
    pub fn raw_graph(&self) -> &CorrespondenceGraph {
        &self.graph
    }

    pub fn pruned_graph(&self) -> Option<&CorrespondenceGraph> {
        self.pruned_graph.as_ref()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// The message of the error that ended the last run, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// The time the last run took.
    pub fn processing_time(&self) -> Duration {
        self.processing_time
    }

    /// Frames that had too few points to take part in linking.
    pub fn excluded_frames(&self) -> &BTreeSet<FrameIndex> {
        &self.excluded_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use track_core::PointCloudSequence;

    #[test]
    fn empty_input_never_starts() {
        let sequence = PointCloudSequence::new();
        let mut tracker = DescriptorTracker::new(&sequence, TrackerSettings::default());
        assert!(matches!(tracker.process(), Err(Error::EmptyInput)));
        assert_eq!(tracker.state(), RunState::Idle);
        assert!(tracker.error_message().is_some());
        assert!(tracker.result().is_empty());
    }

    #[test]
    fn invalid_settings_are_reported() {
        let mut sequence = PointCloudSequence::new();
        sequence.add_2d(0, 0.0, 0.0, 1.0);
        let settings = TrackerSettings::new(4, 3, 1, 10.0, 10.0, true);
        let mut tracker = DescriptorTracker::new(&sequence, settings);
        assert!(matches!(tracker.process(), Err(Error::InvalidSettings(_))));
    }

    #[test]
    fn too_small_frames_link_nothing() {
        let mut sequence = PointCloudSequence::new();
        for frame in 0..3 {
            sequence.add_2d(frame, 0.0, 0.0, 1.0);
            sequence.add_2d(frame, 1.0, 0.0, 1.0);
        }
        let mut tracker =
            DescriptorTracker::new(&sequence, TrackerSettings::default()).num_threads(2);
        assert!(tracker.process().is_ok());
        assert_eq!(tracker.state(), RunState::Completed);
        assert_eq!(tracker.excluded_frames().len(), 3);
        assert!(tracker.result().is_empty());
        assert_eq!(tracker.threads(), 2);
    }
}
