//! The two-pass edge processor.

use std::time::Instant;

use crate::config::Config;
use crate::cut::{resplit, CutPoints, CutVec};
use crate::edges::{EdgeRepository, Property};
use crate::evaluator::Evaluator;
use crate::geom::{Edge, Point};
use crate::intersect::find_intersections;
use crate::polygon::Polygon;
use crate::progress::{Progress, Reporter};
use crate::sink::EdgeSink;
use crate::sweep::{sweep, SinkPair};
use crate::Error;

/// Pass 1 is repeated on its own output at most this many times.
const MAX_SPLIT_ROUNDS: usize = 8;

/// Collects tagged edges and runs evaluators over them.
///
/// [`EdgeProcessor::process`] first finds all intersections and splits the
/// edges there (pass 1), and then sweeps the split edges (pass 2).
/// [`EdgeProcessor::redo`] runs only the second pass, reusing the split
/// edges of the previous `process`.
///
/// The processor is not reentrant: one operation owns all of its state.
#[derive(Default)]
pub struct EdgeProcessor {
    config: Config,
    repo: EdgeRepository,
    cuts: CutVec<CutPoints>,
    /// Have the edges been split since the last insertion?
    prepared: bool,
    progress: Option<Box<dyn Progress>>,
}

impl std::fmt::Debug for EdgeProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeProcessor")
            .field("config", &self.config)
            .field("edges", &self.repo.len())
            .field("prepared", &self.prepared)
            .finish()
    }
}

impl EdgeProcessor {
    /// Creates an empty processor.
    pub fn new(config: Config) -> Self {
        EdgeProcessor {
            config,
            ..Self::default()
        }
    }

    /// The settings this processor was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Installs a progress collaborator, which may also cancel operations.
    pub fn set_progress(&mut self, progress: impl Progress + 'static) {
        self.progress = Some(Box::new(progress));
    }

    /// Removes the progress collaborator, returning it.
    pub fn take_progress(&mut self) -> Option<Box<dyn Progress>> {
        self.progress.take()
    }

    /// The number of edges held. After `process`, this counts split edges.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.repo.len()
    }

    /// The edges currently held.
    pub fn edges(&self) -> impl Iterator<Item = (Edge, Property)> + '_ {
        self.repo.edges().iter().map(|w| (w.edge, w.prop))
    }

    /// Adds an edge. Zero-length edges are rejected, and this returns false.
    pub fn insert(&mut self, edge: Edge, prop: Property) -> bool {
        self.prepared = false;
        self.repo.insert(edge, prop)
    }

    /// Adds an edge, treating a zero-length edge as an error.
    pub fn try_insert(&mut self, edge: Edge, prop: Property) -> Result<(), Error> {
        if self.insert(edge, prop) {
            Ok(())
        } else {
            Err(Error::DegenerateEdge(edge.p1))
        }
    }

    /// Adds all edges of a polygon, oriented so that the inside is on their right.
    pub fn insert_polygon(&mut self, polygon: &Polygon, prop: Property) {
        self.prepared = false;
        self.repo.insert_polygon(polygon, prop);
    }

    /// Adds a closed ring, keeping its orientation.
    pub fn insert_contour(&mut self, ring: &[Point], prop: Property) {
        self.prepared = false;
        self.repo.insert_contour(ring, prop);
    }

    /// Makes room for `n` more edges.
    pub fn reserve(&mut self, n: usize) {
        self.repo.reserve(n);
    }

    /// Forgets all edges, making the processor as good as new (apart from
    /// its config and progress collaborator).
    pub fn clear(&mut self) {
        self.repo.clear();
        self.cuts.clear();
        self.prepared = false;
    }

    /// Runs both passes, feeding one sink.
    pub fn process(&mut self, sink: &mut dyn EdgeSink, eval: &mut dyn Evaluator) -> Result<(), Error> {
        let mut pairs: [SinkPair<'_>; 1] = [(sink, eval)];
        self.process_many(&mut pairs)
    }

    /// Runs the second pass again on the edges split by the last `process`.
    pub fn redo(&mut self, sink: &mut dyn EdgeSink, eval: &mut dyn Evaluator) -> Result<(), Error> {
        let mut pairs: [SinkPair<'_>; 1] = [(sink, eval)];
        self.redo_many(&mut pairs)
    }

    /// Runs both passes, feeding several sinks from a single sweep.
    pub fn process_many(&mut self, pairs: &mut [SinkPair<'_>]) -> Result<(), Error> {
        self.with_sinks(pairs, true)
    }

    /// Like [`EdgeProcessor::redo`], but for several sinks.
    pub fn redo_many(&mut self, pairs: &mut [SinkPair<'_>]) -> Result<(), Error> {
        if !self.prepared {
            return Err(Error::NotPrepared);
        }
        self.with_sinks(pairs, false)
    }

    fn with_sinks(&mut self, pairs: &mut [SinkPair<'_>], split: bool) -> Result<(), Error> {
        for (sink, _) in pairs.iter_mut() {
            sink.start();
        }
        let ret = self.run(pairs, split);
        for (sink, _) in pairs.iter_mut() {
            sink.flush();
        }
        if let Err(e) = &ret {
            log::debug!("edge processing aborted: {e}");
        }
        ret
    }

    fn run(&mut self, pairs: &mut [SinkPair<'_>], split: bool) -> Result<(), Error> {
        let start_time = Instant::now();
        let mut reporter = Reporter::new(&mut self.progress, self.config.progress_interval);

        if split {
            self.prepared = false;
            // A cancelled earlier run may have left handles into the old arena.
            for e in self.repo.edges_mut() {
                e.cut = None;
            }
            reporter.phase(0.0, 0.4);
            let before = self.repo.len();
            let mut rounds = 0;
            loop {
                self.cuts.clear();
                find_intersections(
                    self.repo.edges_mut(),
                    &mut self.cuts,
                    &self.config,
                    &mut reporter,
                )?;
                rounds += 1;
                if !self.cuts.iter().any(|(_, c)| c.has_cutpoints()) {
                    break;
                }
                // Rounded pieces can pass close to vertices their parents
                // missed, so split again until nothing changes.
                let count = self.repo.len();
                let split_edges = resplit(self.repo.take(), &self.cuts);
                self.repo.replace(split_edges);
                if self.repo.len() == count {
                    // Every cut was a dropped jog.
                    break;
                }
                if rounds == MAX_SPLIT_ROUNDS {
                    log::debug!("splitting still changing after {rounds} rounds");
                    break;
                }
                reporter.phase(0.4, 0.5);
            }
            self.cuts.clear();
            self.prepared = true;
            #[cfg(feature = "debug-svg")]
            if self.config.reports(3) {
                let split: Vec<Edge> = self.repo.edges().iter().map(|w| w.edge).collect();
                let doc = crate::svg::dump_edges([(&split[..], "black")]);
                if let Err(e) = ::svg::save("edgesweep-split.svg", &doc) {
                    log::warn!("failed to save split edges: {e}");
                }
            }
            if self.config.reports(1) {
                log::debug!(
                    "split {} edges into {} in {} rounds, {:?}",
                    before,
                    self.repo.len(),
                    rounds,
                    start_time.elapsed()
                );
            }
            reporter.phase(0.5, 1.0);
        }

        let props = self.repo.property_count();
        for (_, eval) in pairs.iter_mut() {
            eval.reserve(props);
        }
        sweep(self.repo.edges(), pairs, &self.config, &mut reporter)?;
        if self.config.reports(1) {
            log::debug!("processing done in {:?}", start_time.elapsed());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::evaluator::{BooleanKind, BooleanOp, MergeOp};
    use crate::progress::CancelAfter;
    use crate::sink::{CountingSink, EdgeContainer};

    fn two_squares() -> EdgeProcessor {
        let mut ep = EdgeProcessor::default();
        ep.insert_polygon(&Polygon::rect((0, 0), (10, 10)), 0);
        ep.insert_polygon(&Polygon::rect((5, 5), (15, 15)), 1);
        ep
    }

    #[test]
    fn redo_needs_process() {
        let mut ep = two_squares();
        let mut sink = EdgeContainer::new();
        let mut op = BooleanOp::new(BooleanKind::And);
        assert_matches!(ep.redo(&mut sink, &mut op), Err(Error::NotPrepared));
        ep.process(&mut sink, &mut op).unwrap();
        let first = sink.clone();

        sink.clear();
        ep.redo(&mut sink, &mut op).unwrap();
        assert_eq!(sink, first);

        ep.insert(Edge::new((100, 100), (101, 100)), 0);
        assert_matches!(ep.redo(&mut sink, &mut op), Err(Error::NotPrepared));
    }

    #[test]
    fn many_sinks_one_sweep() {
        let mut ep = two_squares();
        let mut and_sink = EdgeContainer::new();
        let mut or_sink = EdgeContainer::new();
        let mut and = BooleanOp::new(BooleanKind::And);
        let mut or = BooleanOp::new(BooleanKind::Or);
        {
            let mut pairs: [SinkPair<'_>; 2] = [(&mut and_sink, &mut and), (&mut or_sink, &mut or)];
            ep.process_many(&mut pairs).unwrap();
        }
        assert_eq!(and_sink.edges().len(), 4);
        assert_eq!(or_sink.edges().len(), 8);
    }

    #[test]
    fn cancellation_flushes() {
        let mut ep = EdgeProcessor::new(Config {
            progress_interval: 1,
            ..Config::default()
        });
        for i in 0..20 {
            ep.insert_polygon(&Polygon::rect((i * 3, i * 3), (i * 3 + 10, i * 3 + 10)), 0);
        }
        ep.set_progress(CancelAfter::new(0.3));
        let mut sink = CountingSink::default();
        let mut op = MergeOp::new(0);
        assert_matches!(ep.process(&mut sink, &mut op), Err(Error::Cancelled));
        assert_eq!(sink.flushes, 1);

        // Running again without clearing starts from scratch.
        ep.take_progress();
        let mut sink = CountingSink::default();
        ep.process(&mut sink, &mut op).unwrap();
        assert!(sink.puts > 0);

        // After clearing, the processor works again.
        ep.clear();
        ep.insert_polygon(&Polygon::rect((0, 0), (1, 1)), 0);
        let mut sink = CountingSink::default();
        ep.process(&mut sink, &mut op).unwrap();
        assert_eq!(sink.puts, 4);
    }

    #[test]
    fn strict_insert() {
        let mut ep = EdgeProcessor::default();
        assert_matches!(
            ep.try_insert(Edge::new((1, 2), (1, 2)), 0),
            Err(Error::DegenerateEdge(p)) if p == Point::new(1, 2)
        );
        assert_eq!(ep.len(), 0);
    }
}
