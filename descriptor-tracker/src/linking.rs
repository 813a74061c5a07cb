use crate::{DescriptorCostFunction, Error};
use jaqaman_lap::{CostMatrixSettings, JaqamanLinker, LinkingCostMatrix};
use log::*;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use track_core::{CorrespondenceGraph, FramePair, Point, PointSource};

/// The no-link cost is this factor times the largest kept linking cost.
pub const ALTERNATIVE_COST_FACTOR: f64 = 2.0;
/// The percentile of kept linking costs the no-link cost is based on.
pub const PERCENTILE: f64 = 1.0;

/// An accepted link between a point of the source frame and a point of the target frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub source: Point,
    pub target: Point,
    pub cost: f64,
}

/// Links the points of two frames.
pub trait PairLinker: Send + Sync {
    fn link(
        &self,
        pair: FramePair,
        sources: &[Point],
        targets: &[Point],
        cost: &DescriptorCostFunction<'_>,
    ) -> Result<Vec<Link>, jaqaman_lap::Error>;
}

/// Links two frames with an optimal assignment over a Jaqaman cost matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JaqamanPairLinker {
    pub cost_threshold: f64,
}

impl JaqamanPairLinker {
    pub fn new(cost_threshold: f64) -> Self {
        Self { cost_threshold }
    }
}

impl PairLinker for JaqamanPairLinker {
    fn link(
        &self,
        _pair: FramePair,
        sources: &[Point],
        targets: &[Point],
        cost: &DescriptorCostFunction<'_>,
    ) -> Result<Vec<Link>, jaqaman_lap::Error> {
        let settings =
            CostMatrixSettings::new(self.cost_threshold, ALTERNATIVE_COST_FACTOR, PERCENTILE);
        let matrix = LinkingCostMatrix::new(sources, targets, |a, b| cost.cost(a, b), &settings)?;
        let mut linker = JaqamanLinker::new(matrix);
        linker.check_input()?;
        linker.process()?;
        Ok(linker
            .into_result()
            .into_iter()
            .map(|assignment| Link {
                source: assignment.source,
                target: assignment.target,
                cost: assignment.cost,
            })
            .collect())
    }
}

/// Links all frame pairs in parallel and gathers the links in one graph.
///
/// Each worker thread claims the next unprocessed frame pair until none are left. When linking a
/// frame pair fails, no further frame pairs are claimed, but pairs that are already being
/// linked are finished. The links found until then stay in the graph.
pub struct LinkingEngine<'a, S: ?Sized, L> {
    source: &'a S,
    cost: DescriptorCostFunction<'a>,
    linker: &'a L,
    num_threads: usize,
}

/// The graph built by a [`LinkingEngine`] and whether all frame pairs were linked.
#[derive(Debug)]
pub struct LinkingOutcome {
    pub graph: CorrespondenceGraph,
    pub result: Result<(), Error>,
}

impl<'a, S, L> LinkingEngine<'a, S, L>
where
    S: PointSource + Sync + ?Sized,
    L: PairLinker,
{
    pub fn new(
        source: &'a S,
        cost: DescriptorCostFunction<'a>,
        linker: &'a L,
        num_threads: usize,
    ) -> Self {
        Self {
            source,
            cost,
            linker,
            num_threads: num_threads.max(1),
        }
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    pub fn run(&self, pairs: &[FramePair]) -> LinkingOutcome {
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_threads)
            .build()
        {
            Ok(pool) => pool,
            Err(e) => {
                return LinkingOutcome {
                    graph: CorrespondenceGraph::new(),
                    result: Err(e.into()),
                }
            }
        };

        let next = AtomicUsize::new(0);
        let ok = AtomicBool::new(true);
        let graph = Mutex::new(CorrespondenceGraph::new());
        let last_error = Mutex::new(None);

        pool.scope(|scope| {
            for _ in 0..self.num_threads {
                scope.spawn(|_| self.work(pairs, &next, &ok, &graph, &last_error));
            }
        });

        LinkingOutcome {
            graph: graph.into_inner(),
            result: last_error.into_inner().map_or(Ok(()), Err),
        }
    }

    fn work(
        &self,
        pairs: &[FramePair],
        next: &AtomicUsize,
        ok: &AtomicBool,
        graph: &Mutex<CorrespondenceGraph>,
        last_error: &Mutex<Option<Error>>,
    ) {
        while ok.load(Ordering::Acquire) {
            let pair = match pairs.get(next.fetch_add(1, Ordering::AcqRel)) {
                Some(&pair) => pair,
                None => break,
            };
            match self.link_pair(pair) {
                Ok(links) => merge(graph, &links),
                Err(e) => {
                    error!("{}", e);
                    ok.store(false, Ordering::Release);
                    *last_error.lock() = Some(e);
                }
            }
        }
    }

    fn link_pair(&self, pair: FramePair) -> Result<Vec<Link>, Error> {
        debug!("linking points in frames {}", pair);
        let mapping = self.cost.mapping();
        let sources: Vec<Point> = self
            .source
            .points(pair.source)
            .iter()
            .filter(|point| mapping.contains(point.id))
            .copied()
            .collect();
        let targets: Vec<Point> = self
            .source
            .points(pair.target)
            .iter()
            .filter(|point| mapping.contains(point.id))
            .copied()
            .collect();
        if sources.is_empty() || targets.is_empty() {
            return Ok(vec![]);
        }
        self.linker
            .link(pair, &sources, &targets, &self.cost)
            .map_err(|source| Error::Linking {
                source_frame: pair.source,
                target_frame: pair.target,
                source,
            })
    }
}

/// Adds the links of one frame pair to the graph in a single critical section.
fn merge(graph: &Mutex<CorrespondenceGraph>, links: &[Link]) {
    let mut graph = graph.lock();
    for link in links {
        debug!(
            "linking points {} -> {} with cost {}",
            link.source.id, link.target.id, link.cost
        );
        graph.add_vertex(link.source);
        graph.add_vertex(link.target);
        if !graph.add_edge(link.source.id, link.target.id, link.cost) {
            error!(
                "edge {} -> {} is already present",
                link.source.id, link.target.id
            );
        }
    }
}
