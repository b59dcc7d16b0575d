//! Pass 1: finding the points at which edges need to be split.
//!
//! Edges are sorted by their lower `y` coordinate and then processed in
//! horizontal bands. A band starts with the edges alive at its bottom and
//! grows upwards, one starting height at a time, until it holds noticeably
//! more edges than it started with. Within a band, edges are sorted by their
//! horizontal extent and every pair with overlapping extents is tested.
//!
//! Every point found is attributed to the band containing its `y`
//! coordinate, and only that band records it. This means that pairs of long
//! edges are tested more than once, but each of their intersections is
//! recorded once.

use std::time::Instant;

use arrayvec::ArrayVec;

use crate::config::Config;
use crate::cut::{CutIdx, CutPoints, CutVec};
use crate::edges::WorkEdge;
use crate::geom::{cross, Coord, Edge, Point};
use crate::num::{round_to_grid, sign};
use crate::progress::{Cancelled, Reporter};

/// The vertical fuzz applied to band boundaries in the general path.
///
/// An edge that misses a band by less than this could still come within
/// half a unit of something inside the band.
const Y_FUZZ: f64 = 0.5;

/// Horizontal slack on the extents of the general path.
const X_MARGIN: f64 = 1.0;

/// Returns the point at which two edges cross properly, if they do.
///
/// A proper crossing has the endpoints of each edge strictly on opposite
/// sides of the other. The position is computed in floating point and
/// rounded to the grid, always from the same one of the two edges and with
/// both in sweep order, so the result does not depend on the order or the
/// direction of the arguments.
pub fn crossing_point(e1: &Edge, e2: &Edge) -> Option<Point> {
    let (a, b) = {
        let (a, b) = (e1.canonical(), e2.canonical());
        if b < a {
            (b, a)
        } else {
            (a, b)
        }
    };

    if sign(a.side_of(b.p1)) * sign(a.side_of(b.p2)) >= 0 {
        return None;
    }
    if sign(b.side_of(a.p1)) * sign(b.side_of(a.p2)) >= 0 {
        return None;
    }

    let den = cross(a.d(), b.d());
    let num = cross(b.p1.diff(&a.p1), b.d());
    let t = num as f64 / den as f64;
    let (dx, dy) = a.d();
    Some(Point::new(
        round_to_grid(f64::from(a.p1.x) + t * dx as f64),
        round_to_grid(f64::from(a.p1.y) + t * dy as f64),
    ))
}

/// Computes the intersection of two edges.
///
/// If they cross properly, this is the (rounded) crossing point. Otherwise
/// it is the set of endpoints that lie exactly on both edges, in sweep
/// order: one point for edges that touch, two for overlapping collinear
/// edges, none at all for disjoint ones.
///
/// The result is the same, bit for bit, when the arguments are swapped or
/// reversed.
pub fn intersect(e1: &Edge, e2: &Edge) -> ArrayVec<Point, 2> {
    let mut ret = ArrayVec::new();
    if let Some(p) = crossing_point(e1, e2) {
        ret.push(p);
        return ret;
    }

    let mut candidates: ArrayVec<Point, 4> = [e1.p1, e1.p2, e2.p1, e2.p2]
        .into_iter()
        .filter(|p| e1.contains_exact(*p) && e2.contains_exact(*p))
        .collect();
    candidates.sort();
    for p in candidates {
        if ret.last() != Some(&p) {
            // Two non-degenerate segments share at most two distinct endpoints.
            ret.push(p);
        }
    }
    ret
}

/// The vertical range of one band.
#[derive(Clone, Copy, Debug)]
struct Band {
    y: Coord,
    yy: Coord,
    /// The last band also owns its top boundary.
    closed: bool,
}

impl Band {
    fn owns(&self, y: Coord) -> bool {
        self.y <= y && (y < self.yy || (self.closed && y == self.yy))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Pass1Stats {
    pub bands: usize,
    pub ortho_bands: usize,
    pub pairs: usize,
}

/// Finds all cut points and attractors for the given edges.
///
/// The edges get reordered, and each edge that might need splitting gets a
/// record in `cuts`.
pub(crate) fn find_intersections(
    edges: &mut [WorkEdge],
    cuts: &mut CutVec<CutPoints>,
    config: &Config,
    reporter: &mut Reporter<'_>,
) -> Result<Pass1Stats, Cancelled> {
    let start_time = Instant::now();
    let mut stats = Pass1Stats::default();
    let n = edges.len();
    if n == 0 {
        return Ok(stats);
    }

    edges.sort_by_key(|e| (e.edge.y_min(), e.edge.x_min(), e.edge, e.prop));
    let y_end = edges.iter().map(|e| e.edge.y_max()).max().unwrap_or(0);
    let growth = config.band_growth.max(1.0);

    // `edges[..current]` are done with, `edges[current..future]` are in the
    // current band, and `edges[future..]` are still sorted by `y_min`.
    let mut current = 0;
    let mut future = 0;
    let mut y = edges[0].edge.y_min();

    loop {
        while future < n && edges[future].edge.y_min() <= y {
            future += 1;
        }
        let alive = (future - current).max(1);
        let target = (alive as f64 * growth).ceil() as usize;
        while future < n && future - current < target {
            let level = edges[future].edge.y_min();
            while future < n && edges[future].edge.y_min() == level {
                future += 1;
            }
        }

        let band = if future < n {
            Band {
                y,
                yy: edges[future].edge.y_min(),
                closed: false,
            }
        } else {
            Band {
                y,
                yy: y_end,
                closed: true,
            }
        };

        let band_edges = &mut edges[current..future];
        if band_edges.iter().all(|e| e.edge.is_ortho()) {
            stats.ortho_bands += 1;
            process_ortho_band(band_edges, cuts, band, &mut stats);
        } else {
            process_general_band(band_edges, cuts, band, &mut stats);
        }
        stats.bands += 1;
        if config.reports(2) {
            log::trace!(
                "band {}..{}: {} edges",
                band.y,
                band.yy,
                band_edges.len()
            );
        }

        if band.closed {
            break;
        }

        for i in current..future {
            if edges[i].edge.y_max() < band.yy {
                edges.swap(i, current);
                current += 1;
            }
        }
        y = band.yy;
        reporter.tick(current, n)?;
    }

    if config.reports(1) {
        log::debug!(
            "intersections: {} edges, {} bands ({} orthogonal), {} pairs, {} cut records in {:?}",
            n,
            stats.bands,
            stats.ortho_bands,
            stats.pairs,
            cuts.len(),
            start_time.elapsed()
        );
    }
    Ok(stats)
}

fn y_overlap(a: &Edge, b: &Edge) -> bool {
    a.y_min() <= b.y_max() && b.y_min() <= a.y_max()
}

fn process_ortho_band(
    edges: &mut [WorkEdge],
    cuts: &mut CutVec<CutPoints>,
    band: Band,
    stats: &mut Pass1Stats,
) {
    let mut order: Vec<(Coord, Coord, usize)> = edges
        .iter()
        .enumerate()
        .map(|(i, e)| (e.edge.x_min(), e.edge.x_max(), i))
        .collect();
    order.sort_unstable();

    for (k, &(_, hi, i)) in order.iter().enumerate() {
        for &(lo, _, j) in &order[(k + 1)..] {
            if lo > hi {
                break;
            }
            if y_overlap(&edges[i].edge, &edges[j].edge) {
                stats.pairs += 1;
                check_ortho_pair(edges, cuts, band, i, j);
            }
        }
    }
}

fn check_ortho_pair(
    edges: &mut [WorkEdge],
    cuts: &mut CutVec<CutPoints>,
    band: Band,
    i: usize,
    j: usize,
) {
    let (a, b) = (edges[i].edge, edges[j].edge);
    if a.is_horizontal() != b.is_horizontal() {
        let (h, v) = if a.is_horizontal() { (a, b) } else { (b, a) };
        let p = Point::new(v.p1.x, h.p1.y);
        if !band.owns(p.y) || !a.contains_exact(p) || !b.contains_exact(p) {
            return;
        }
        for k in [i, j] {
            if edges[k].edge.is_point_on_exact(p) {
                let rec = cuts.record_for(&mut edges[k]);
                cuts.add(rec, p);
            }
        }
    } else {
        // Parallel: only collinear overlaps matter, and they cut each other
        // at their endpoints.
        for (owner, other) in [(i, j), (j, i)] {
            let target = edges[other].edge;
            for p in [edges[owner].edge.p1, edges[owner].edge.p2] {
                if band.owns(p.y) && target.is_point_on_exact(p) {
                    let rec = cuts.record_for(&mut edges[other]);
                    cuts.add(rec, p);
                }
            }
        }
    }
}

/// The horizontal range swept by `e` over the fuzzed band, with slack.
fn fuzzed_x_extent(e: &Edge, band: Band) -> (f64, f64) {
    if e.is_horizontal() {
        return (
            f64::from(e.x_min()) - X_MARGIN,
            f64::from(e.x_max()) + X_MARGIN,
        );
    }
    let lo = (f64::from(band.y) - Y_FUZZ).max(f64::from(e.y_min()));
    let hi = (f64::from(band.yy) + Y_FUZZ).min(f64::from(e.y_max()));
    let (x0, x1) = (e.x_at_y(lo), e.x_at_y(hi));
    (x0.min(x1) - X_MARGIN, x0.max(x1) + X_MARGIN)
}

/// A rounded crossing point, and the records of the edges that got split there.
struct Crossing {
    p: Point,
    edges: [usize; 2],
    records: ArrayVec<CutIdx, 2>,
}

fn process_general_band(
    edges: &mut [WorkEdge],
    cuts: &mut CutVec<CutPoints>,
    band: Band,
    stats: &mut Pass1Stats,
) {
    let mut order: Vec<(f64, f64, usize)> = edges
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let (lo, hi) = fuzzed_x_extent(&e.edge, band);
            (lo, hi, i)
        })
        .collect();
    order.sort_unstable_by(|a, b| a.0.total_cmp(&b.0).then(a.2.cmp(&b.2)));

    let mut crossings = Vec::new();
    for (k, &(_, hi, i)) in order.iter().enumerate() {
        for &(lo, _, j) in &order[(k + 1)..] {
            if lo > hi {
                break;
            }
            if y_overlap(&edges[i].edge, &edges[j].edge) {
                stats.pairs += 1;
                if let Some(c) = check_pair(edges, cuts, band, i, j) {
                    crossings.push(c);
                }
            }
        }
    }

    // A rounded crossing is a new vertex, and it can land next to an edge
    // that neither of the crossing edges came close to.
    for c in crossings {
        let px = f64::from(c.p.x);
        let end = order.partition_point(|&(lo, _, _)| lo <= px);
        for &(_, hi, k) in &order[..end] {
            if hi < px || c.edges.contains(&k) {
                continue;
            }
            let target = edges[k].edge;
            if !target.is_point_on_fuzzy(c.p) {
                continue;
            }
            let rec = cuts.record_for(&mut edges[k]);
            if target.contains_exact(c.p) {
                cuts.add(rec, c.p);
            } else {
                for &owner in &c.records {
                    cuts.add_attractor(rec, c.p, owner);
                }
            }
        }
    }
}

fn check_pair(
    edges: &mut [WorkEdge],
    cuts: &mut CutVec<CutPoints>,
    band: Band,
    i: usize,
    j: usize,
) -> Option<Crossing> {
    let (a, b) = (edges[i].edge, edges[j].edge);

    let mut crossing = None;
    if let Some(p) = crossing_point(&a, &b) {
        if band.owns(p.y) {
            let mut records = ArrayVec::new();
            for k in [i, j] {
                let e = edges[k].edge;
                let t = e.projection(p);
                if 0 < t && t < e.sq_length() {
                    let rec = cuts.record_for(&mut edges[k]);
                    cuts.add(rec, p);
                    records.push(rec);
                }
            }
            crossing = Some(Crossing {
                p,
                edges: [i, j],
                records,
            });
        }
    }

    // Endpoints touching the other edge. This also covers collinear overlaps.
    for (owner, other) in [(i, j), (j, i)] {
        let target = edges[other].edge;
        for p in [edges[owner].edge.p1, edges[owner].edge.p2] {
            if !band.owns(p.y) || !target.is_point_on_fuzzy(p) {
                continue;
            }
            let rec = cuts.record_for(&mut edges[other]);
            if target.contains_exact(p) {
                cuts.add(rec, p);
            } else {
                let owner_rec = cuts.record_for(&mut edges[owner]);
                cuts.add_attractor(rec, p, owner_rec);
            }
        }
    }
    crossing
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::cut::resplit;
    use crate::geom::tests::edge;
    use crate::progress::Progress;

    fn run(edges: &[Edge]) -> Vec<WorkEdge> {
        let mut work: Vec<_> = edges
            .iter()
            .enumerate()
            .map(|(i, e)| WorkEdge::new(*e, i))
            .collect();
        let mut cuts = CutVec::default();
        let mut progress: Option<Box<dyn Progress>> = None;
        let mut reporter = Reporter::new(&mut progress, 1);
        find_intersections(&mut work, &mut cuts, &Config::default(), &mut reporter).unwrap();
        resplit(work, &cuts)
    }

    fn pieces_of(result: &[WorkEdge], prop: usize) -> Vec<Edge> {
        let mut ret: Vec<_> = result
            .iter()
            .filter(|e| e.prop == prop)
            .map(|e| e.edge)
            .collect();
        ret.sort();
        ret
    }

    #[test]
    fn simple_crossing() {
        let a = Edge::new((0, 0), (10, 10));
        let b = Edge::new((0, 10), (10, 0));
        assert_eq!(intersect(&a, &b).as_slice(), &[Point::new(5, 5)]);

        let out = run(&[a, b]);
        assert_eq!(
            pieces_of(&out, 0),
            vec![Edge::new((0, 0), (5, 5)), Edge::new((5, 5), (10, 10))]
        );
        assert_eq!(pieces_of(&out, 1).len(), 2);
    }

    #[test]
    fn rounded_crossing() {
        let a = Edge::new((0, 0), (3, 1));
        let b = Edge::new((0, 1), (3, 0));
        // The exact crossing is (1.5, 0.5), which rounds away from zero.
        assert_eq!(intersect(&a, &b).as_slice(), &[Point::new(2, 1)]);
        assert_eq!(intersect(&b, &a).as_slice(), &[Point::new(2, 1)]);
    }

    #[test]
    fn touching_and_overlapping() {
        let a = Edge::new((0, 0), (10, 0));
        let b = Edge::new((5, 0), (5, 5));
        assert_eq!(intersect(&a, &b).as_slice(), &[Point::new(5, 0)]);

        let c = Edge::new((15, 0), (5, 0));
        assert_eq!(
            intersect(&a, &c).as_slice(),
            &[Point::new(5, 0), Point::new(10, 0)]
        );

        let d = Edge::new((0, 1), (10, 1));
        assert!(intersect(&a, &d).is_empty());
    }

    #[test]
    fn orthogonal_t_junction() {
        let out = run(&[Edge::new((0, 0), (10, 0)), Edge::new((4, 0), (4, 8))]);
        assert_eq!(
            pieces_of(&out, 0),
            vec![Edge::new((0, 0), (4, 0)), Edge::new((4, 0), (10, 0))]
        );
        assert_eq!(pieces_of(&out, 1), vec![Edge::new((4, 0), (4, 8))]);
    }

    #[test]
    fn orthogonal_overlap() {
        let out = run(&[Edge::new((0, 0), (0, 10)), Edge::new((0, 5), (0, 15))]);
        assert_eq!(
            pieces_of(&out, 0),
            vec![Edge::new((0, 0), (0, 5)), Edge::new((0, 5), (0, 10))]
        );
        assert_eq!(
            pieces_of(&out, 1),
            vec![Edge::new((0, 5), (0, 10)), Edge::new((0, 10), (0, 15))]
        );
    }

    #[test]
    fn near_miss_stays_weak() {
        // (3, 2) is within half a unit of the long edge, but not on it.
        let out = run(&[Edge::new((0, 0), (10, 5)), Edge::new((3, 2), (3, 9))]);
        assert_eq!(pieces_of(&out, 0), vec![Edge::new((0, 0), (10, 5))]);
    }

    #[test]
    fn near_miss_promoted_by_crossing() {
        // The third edge crosses the long one, so the near miss becomes a cut.
        let out = run(&[
            Edge::new((0, 0), (10, 5)),
            Edge::new((3, 2), (3, 9)),
            Edge::new((8, 0), (8, 9)),
        ]);
        let long = pieces_of(&out, 0);
        assert_eq!(long.len(), 3);
        assert_eq!(long[0], Edge::new((0, 0), (3, 2)));
    }

    #[test]
    fn crossing_next_to_a_third_edge() {
        // The third edge crosses both of the others close together. One
        // crossing rounds to (-5, 4), which is right next to the first edge,
        // and the other rounds to (-4, 4), right next to the second one.
        let out = run(&[
            Edge::new((32, 15), (-23, -2)),
            Edge::new((-35, -5), (32, 15)),
            Edge::new((0, 0), (-13, 11)),
        ]);
        assert_eq!(
            pieces_of(&out, 0),
            vec![
                Edge::new((-5, 4), (-23, -2)),
                Edge::new((-4, 4), (-5, 4)),
                Edge::new((32, 15), (-4, 4)),
            ]
        );
        // The second edge also snaps to the first one's endpoint.
        assert_eq!(
            pieces_of(&out, 1),
            vec![
                Edge::new((-35, -5), (-23, -2)),
                Edge::new((-23, -2), (-5, 4)),
                Edge::new((-5, 4), (-4, 4)),
                Edge::new((-4, 4), (32, 15)),
            ]
        );
    }

    #[test]
    fn shared_endpoints_need_no_cut() {
        let out = run(&[Edge::new((0, 0), (5, 5)), Edge::new((5, 5), (10, 0))]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn many_bands() {
        // A staircase of short edges, each crossing one long edge.
        let mut edges = vec![Edge::new((0, 0), (0, 100))];
        for y in 0..50 {
            edges.push(Edge::new((-1, 2 * y + 1), (1, 2 * y + 1)));
        }
        let out = run(&edges);
        assert_eq!(pieces_of(&out, 0).len(), 51);
        assert_eq!(pieces_of(&out, 7).len(), 2);
    }

    proptest! {
        #[test]
        fn order_independent(e1 in edge(), e2 in edge()) {
            let forward = intersect(&e1, &e2);
            prop_assert_eq!(&forward, &intersect(&e2, &e1));
            prop_assert_eq!(&forward, &intersect(&e1.reversed(), &e2));
            prop_assert_eq!(&forward, &intersect(&e2, &e1.reversed()));
        }

        #[test]
        fn resplit_preserves_endpoints(edges in proptest::collection::vec(edge(), 1..12)) {
            let out = run(&edges);
            for (i, e) in edges.iter().enumerate() {
                let pieces: Vec<_> = out.iter().filter(|w| w.prop == i).map(|w| w.edge).collect();
                prop_assert!(!pieces.is_empty());
                prop_assert!(pieces.iter().all(|p| !p.is_degenerate()));
                prop_assert!(pieces.iter().any(|p| p.p1 == e.p1));
                prop_assert!(pieces.iter().any(|p| p.p2 == e.p2));
            }
        }
    }
}
