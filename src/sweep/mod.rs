//! Pass 2: sweeping the split edges and generating events for the evaluators.
//!
//! The sweep visits every height at which some edge starts or ends. On each
//! scanline it walks from west to east through the "positions": places
//! where one or more edges meet the scanline at exactly the same (possibly
//! fractional) `x`. A position where some edge starts or ends is a vertex;
//! the other positions only have edges passing through.
//!
//! The event sequence for one scanline looks like
//!
//! ```text
//! begin_scanline
//!   crossing group    (next_coincident, edges, end_coincident)
//!   next_vertex
//!     south groups    (edges below the scanline, west to east)
//!     north groups    (edges above the scanline, west to east)
//!   end_vertex
//!   ...
//! end_scanline
//! ```
//!
//! and is driven by a small state machine, so that the order is checked in
//! debug builds.

use std::time::Instant;

use crate::config::Config;
use crate::edges::{Property, WorkEdge};
use crate::evaluator::{Evaluator, Tag};
use crate::geom::{Area, Coord, Edge, Point};
use crate::progress::{Cancelled, Reporter};
use crate::sink::EdgeSink;

mod skip;
mod slots;

use skip::{Run, SkipCache};
use slots::{cmp_direction, direction, position_end, ScanlineEdges, Slot, SlotKind};

/// A sink together with the evaluator that feeds it.
pub type SinkPair<'a> = (&'a mut dyn EdgeSink, &'a mut dyn Evaluator);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    BetweenScanlines,
    Scanning,
    InVertex,
    InCoincident { in_vertex: bool },
}

impl State {
    fn can_become(self, next: State) -> bool {
        use State::*;
        matches!(
            (self, next),
            (Idle, BetweenScanlines)
                | (BetweenScanlines, Scanning)
                | (BetweenScanlines, Idle)
                | (Scanning, InVertex)
                | (Scanning, InCoincident { in_vertex: false })
                | (Scanning, BetweenScanlines)
                | (InVertex, InCoincident { in_vertex: true })
                | (InVertex, Scanning)
                | (InCoincident { in_vertex: false }, Scanning)
                | (InCoincident { in_vertex: true }, InVertex)
        )
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SweepStats {
    pub scanlines: usize,
    pub vertices: usize,
    pub cache_hits: usize,
    pub skipped_slots: usize,
}

/// An edge taking part in a coincident group.
#[derive(Clone, Copy, Debug)]
struct Member {
    edge: usize,
    prop: Property,
    enter: bool,
    /// Edges passing through a vertex are notified, but never put.
    passing: bool,
}

/// Per-pair bookkeeping.
struct PairState {
    /// For each edge, the result edge it produced (if any).
    results: Vec<Option<Edge>>,
    /// The start and `compare_ns` of the horizontal result edge being built.
    horizontal: Option<(Coord, i32)>,
}

pub(crate) struct Sweep<'a, 'b> {
    edges: &'a [WorkEdge],
    pairs: &'a mut [SinkPair<'b>],
    pair_state: Vec<PairState>,
    config: &'a Config,
    prefer_touch: bool,
    selecting: bool,
    state: State,
    cache: SkipCache,
    slots: Vec<Slot>,
    stats: SweepStats,
}

impl<'a, 'b> Sweep<'a, 'b> {
    pub fn new(edges: &'a [WorkEdge], pairs: &'a mut [SinkPair<'b>], config: &'a Config) -> Self {
        let prefer_touch = pairs.iter().any(|(_, e)| e.prefer_touch());
        let selecting = pairs.iter().any(|(_, e)| e.selects_edges());
        let pair_state = pairs
            .iter()
            .map(|_| PairState {
                results: vec![None; edges.len()],
                horizontal: None,
            })
            .collect();
        Sweep {
            edges,
            pairs,
            pair_state,
            config,
            prefer_touch,
            selecting,
            state: State::Idle,
            cache: SkipCache::new(config.skip_threshold),
            slots: Vec::new(),
            stats: SweepStats::default(),
        }
    }

    fn goto(&mut self, next: State) {
        debug_assert!(
            self.state.can_become(next),
            "bad sweep transition {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }

    fn all_reset(&self) -> bool {
        self.pairs.iter().all(|(_, e)| e.is_reset())
    }

    /// Runs the whole sweep.
    pub fn run(mut self, reporter: &mut Reporter<'_>) -> Result<SweepStats, Cancelled> {
        let start_time = Instant::now();
        let mut lines = ScanlineEdges::new(self.edges, self.selecting);
        let ys = std::mem::take(&mut lines.ys);

        for (sink, _) in self.pairs.iter_mut() {
            sink.reset_stop();
        }

        self.goto(State::BetweenScanlines);
        for (i, &y) in ys.iter().enumerate() {
            let mut slots = std::mem::take(&mut self.slots);
            lines.fill(self.edges, y, &mut slots);
            self.slots = slots;
            self.scanline(y);
            reporter.tick(i + 1, ys.len())?;

            if !self.pairs.is_empty() && self.pairs.iter().all(|(s, _)| s.can_stop()) {
                if self.config.reports(1) {
                    log::debug!("sweep stopped early at y = {y}");
                }
                break;
            }
        }
        self.goto(State::Idle);

        self.stats.cache_hits = self.cache.hits;
        self.stats.skipped_slots = self.cache.skipped_slots;
        if self.config.reports(1) {
            log::debug!(
                "sweep: {} scanlines, {} vertices, {} cache hits skipping {} slots in {:?}",
                self.stats.scanlines,
                self.stats.vertices,
                self.stats.cache_hits,
                self.stats.skipped_slots,
                start_time.elapsed()
            );
        }
        Ok(self.stats)
    }

    fn scanline(&mut self, y: Coord) {
        self.goto(State::Scanning);
        self.stats.scanlines += 1;
        self.cache.advance();
        for ((sink, eval), st) in self.pairs.iter_mut().zip(&mut self.pair_state) {
            eval.reset();
            sink.begin_scanline(y);
            st.horizontal = None;
        }

        let mut run: Option<Run> = None;
        let mut i = 0;
        while i < self.slots.len() {
            let end = position_end(&self.slots, i);
            let passing_only = self.slots[i..end]
                .iter()
                .all(|s| s.kind == SlotKind::Crossing);

            if !passing_only {
                run = None;
                self.vertex(i, end, y);
                i = end;
                continue;
            }

            if self.all_reset() {
                if let Some(len) = self.try_skip(i) {
                    i += len;
                    continue;
                }
                if run.is_none() && self.cache.enabled() {
                    run = Some(Run::new(i, self.slots[i].edge, self.pairs.len()));
                }
            }

            self.crossing_group(i, end, run.as_mut());

            if run.is_some() && self.all_reset() {
                if let Some(r) = run.take() {
                    let last = self.slots[end - 1].edge;
                    self.cache.store(r, end, last);
                }
            }
            i = end;
        }

        for (sink, _) in self.pairs.iter_mut() {
            sink.end_scanline(y);
        }
        if self.config.reports(3) {
            log::trace!("scanline {y}: {} slots", self.slots.len());
        }
        self.goto(State::BetweenScanlines);
    }

    /// Replays a run from the previous scanline, if there is one starting at
    /// slot `i` that still fits. Returns the number of slots skipped.
    fn try_skip(&mut self, i: usize) -> Option<usize> {
        let entry = self.cache.take(self.slots[i].edge)?;
        let end = i + entry.len;
        if end > self.slots.len()
            || self.slots[end - 1].edge != entry.last
            || self.slots[i..end]
                .iter()
                .any(|s| s.kind != SlotKind::Crossing)
            || (end < self.slots.len() && self.slots[end].x == self.slots[end - 1].x)
        {
            return None;
        }

        for ((sink, _), count) in self.pairs.iter_mut().zip(&entry.counts) {
            sink.skip_n(*count);
        }
        let len = entry.len;
        self.cache.keep(self.slots[i].edge, entry);
        Some(len)
    }

    fn member(&self, slot: &Slot) -> Member {
        let w = &self.edges[slot.edge];
        Member {
            edge: slot.edge,
            prop: w.prop,
            enter: w.edge.is_north(),
            passing: slot.kind == SlotKind::Crossing,
        }
    }

    /// The order in which the members of a coincident group are delivered.
    ///
    /// Opening and closing edges are sorted by property and closing ones are
    /// delivered in reverse, so that the sequence is symmetric. When touching
    /// counts, everything opens before anything closes.
    fn delivery_order(&self, group: &[Member]) -> Vec<Member> {
        let (mut opens, mut closes): (Vec<Member>, Vec<Member>) =
            group.iter().partition(|m| m.enter);
        let ascending = self.prefer_touch;
        let by_prop = |a: &Member, b: &Member| {
            let ord = if ascending {
                a.prop.cmp(&b.prop)
            } else {
                b.prop.cmp(&a.prop)
            };
            ord.then(a.edge.cmp(&b.edge))
        };
        opens.sort_by(by_prop);
        closes.sort_by(by_prop);
        closes.reverse();
        if self.prefer_touch {
            opens.extend(closes);
            opens
        } else {
            closes.extend(opens);
            closes
        }
    }

    /// Delivers the edges passing through a position that is not a vertex.
    fn crossing_group(&mut self, start: usize, end: usize, mut run: Option<&mut Run>) {
        self.goto(State::InCoincident { in_vertex: false });
        let group: Vec<Member> = self.slots[start..end]
            .iter()
            .map(|s| self.member(s))
            .collect();
        let order = self.delivery_order(&group);

        for (k, ((sink, eval), st)) in self
            .pairs
            .iter_mut()
            .zip(&self.pair_state)
            .enumerate()
        {
            eval.next_coincident();
            for m in &order {
                eval.edge(true, m.enter, m.prop);
                eval.edge(false, m.enter, m.prop);
            }
            eval.end_coincident();
            for m in &group {
                if let Some(r) = st.results[m.edge] {
                    sink.crossing_edge(r);
                    if let Some(run) = run.as_deref_mut() {
                        run.counts[k] += 1;
                    }
                }
            }
        }
        self.goto(State::Scanning);
    }

    /// Splits the members on one side of vertex `v` into coincident groups,
    /// from west to east.
    fn side_groups(&self, v: Point, members: Vec<Member>, north: bool) -> Vec<Vec<Member>> {
        let far = |m: &Member| {
            let e = &self.edges[m.edge].edge;
            direction(v, if north { e.upper() } else { e.lower() })
        };
        let mut keyed: Vec<((Area, Area), Member)> =
            members.into_iter().map(|m| (far(&m), m)).collect();
        keyed.sort_by(|(da, a), (db, b)| cmp_direction(*da, *db).then(a.edge.cmp(&b.edge)));

        let mut groups: Vec<Vec<Member>> = Vec::new();
        let mut last_dir = None;
        for (d, m) in keyed {
            match (last_dir, groups.last_mut()) {
                (Some(ld), Some(group)) if cmp_direction(ld, d).is_eq() => group.push(m),
                _ => groups.push(vec![m]),
            }
            last_dir = Some(d);
        }
        groups
    }

    fn vertex(&mut self, start: usize, end: usize, y: Coord) {
        let x = self.slots[start]
            .x
            .as_exact()
            .expect("vertices are on the grid");
        let v = Point::new(x, y);
        self.stats.vertices += 1;

        self.goto(State::InVertex);
        for (_, eval) in self.pairs.iter_mut() {
            eval.next_vertex(x);
        }

        let mut south = Vec::new();
        let mut north = Vec::new();
        let mut horizontals = Vec::new();
        for slot in &self.slots[start..end] {
            let m = self.member(slot);
            match slot.kind {
                SlotKind::South => south.push(m),
                SlotKind::North => north.push(m),
                SlotKind::Crossing => {
                    south.push(m);
                    north.push(m);
                }
                SlotKind::Horizontal => horizontals.push(m),
            }
        }

        for group in self.side_groups(v, south, false) {
            self.vertex_group(&group, false);
        }
        for group in self.side_groups(v, north, true) {
            self.vertex_group(&group, true);
        }

        for (_, eval) in self.pairs.iter_mut() {
            eval.end_vertex();
        }
        self.goto(State::Scanning);

        if !horizontals.is_empty() {
            self.select_horizontals(&horizontals);
        }
        self.horizontal_results(x, y);
    }

    /// Delivers one coincident group at a vertex. North of the scanline,
    /// this is where result edges come from.
    fn vertex_group(&mut self, group: &[Member], north: bool) {
        self.goto(State::InCoincident { in_vertex: true });
        let order = self.delivery_order(group);
        let lead = group.iter().find(|m| !m.passing).copied();

        for ((sink, eval), st) in self.pairs.iter_mut().zip(&mut self.pair_state) {
            eval.next_coincident();
            let mut net = 0;
            for m in &order {
                net += eval.edge(north, m.enter, m.prop);
            }
            eval.end_coincident();

            if !north {
                continue;
            }
            if let Some(lead) = lead {
                if net != 0 {
                    let e = self.edges[lead.edge].edge;
                    let r = if net > 0 {
                        Edge::new(e.lower(), e.upper())
                    } else {
                        Edge::new(e.upper(), e.lower())
                    };
                    sink.put(r);
                    st.results[lead.edge] = Some(r);
                }
                if eval.selects_edges() {
                    for m in group.iter().filter(|m| !m.passing) {
                        let tag: Tag = eval.select_edge(false, m.prop);
                        if tag != 0 {
                            let e = self.edges[m.edge].edge;
                            sink.put_tagged(e, tag);
                            st.results[m.edge].get_or_insert(e);
                        }
                    }
                }
            }
            for m in group.iter().filter(|m| m.passing) {
                if let Some(r) = st.results[m.edge] {
                    sink.crossing_edge(r);
                }
            }
        }
        self.goto(State::InVertex);
    }

    fn select_horizontals(&mut self, horizontals: &[Member]) {
        for (sink, eval) in self.pairs.iter_mut() {
            if !eval.selects_edges() {
                continue;
            }
            for m in horizontals {
                let tag = eval.select_edge(true, m.prop);
                if tag != 0 {
                    sink.put_tagged(self.edges[m.edge].edge, tag);
                }
            }
        }
    }

    /// Starts or ends horizontal result edges wherever the difference
    /// between the north and south side changes.
    fn horizontal_results(&mut self, x: Coord, y: Coord) {
        for ((sink, eval), st) in self.pairs.iter_mut().zip(&mut self.pair_state) {
            let ns = eval.compare_ns();
            match st.horizontal {
                Some((_, open_ns)) if open_ns == ns => {}
                Some((x0, open_ns)) => {
                    // Inside to the north means running west.
                    let r = if open_ns > 0 {
                        Edge::new((x, y), (x0, y))
                    } else {
                        Edge::new((x0, y), (x, y))
                    };
                    sink.put(r);
                    st.horizontal = (ns != 0).then_some((x, ns));
                }
                None => {
                    if ns != 0 {
                        st.horizontal = Some((x, ns));
                    }
                }
            }
        }
    }
}

/// Sweeps the edges, feeding every (sink, evaluator) pair.
pub(crate) fn sweep(
    edges: &[WorkEdge],
    pairs: &mut [SinkPair<'_>],
    config: &Config,
    reporter: &mut Reporter<'_>,
) -> Result<SweepStats, Cancelled> {
    let stats = Sweep::new(edges, pairs, config).run(reporter)?;
    for (_, eval) in pairs.iter_mut() {
        eval.finish();
    }
    Ok(stats)
}
