//! Cut points, and splitting edges at them.
//!
//! During intersection detection every edge that might need splitting gets a
//! [`CutPoints`] record in a [`CutVec`] arena. Records refer to each other by
//! [`CutIdx`], because the arena grows while those references are alive.

use crate::edges::WorkEdge;
use crate::geom::{Area, Edge, Point};

/// An index into the cut point arena.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CutIdx(usize);

/// The cut point arena.
#[derive(Clone)]
pub struct CutVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(CutVec, CutIdx, "cut");

/// The points at which a single edge will be split.
#[derive(Clone, Debug, Default)]
pub struct CutPoints {
    /// Points that will split the edge, if `strong` is set.
    ///
    /// Unordered, and possibly containing duplicates.
    pub cut_points: Vec<Point>,
    /// Points near (but not exactly on) the edge, each paired with the record
    /// of the edge whose endpoint it is.
    ///
    /// Once this edge is split anyway, it gets split at these points too, and
    /// the paired records are told about it. Empty once `strong` is set.
    pub attractors: Vec<(Point, CutIdx)>,
    /// Set once the edge is certain to be split.
    pub strong: bool,
}

impl CutPoints {
    pub fn has_cutpoints(&self) -> bool {
        self.strong
    }
}

impl CutVec<CutPoints> {
    /// Returns the record of `edge`, creating an empty one if it has none yet.
    pub fn record_for(&mut self, edge: &mut WorkEdge) -> CutIdx {
        match edge.cut {
            Some(idx) => idx,
            None => {
                let idx = self.push(CutPoints::default());
                edge.cut = Some(idx);
                idx
            }
        }
    }

    /// Adds a point that will definitely split the edge of record `idx`.
    ///
    /// If this is the record's first strong point, all of its attractors are
    /// promoted, and so are theirs, and so on.
    pub fn add(&mut self, idx: CutIdx, p: Point) {
        let mut pending = vec![(idx, p)];
        while let Some((idx, p)) = pending.pop() {
            let rec = &mut self[idx];
            rec.cut_points.push(p);
            if !rec.strong {
                rec.strong = true;
                for (q, other) in std::mem::take(&mut rec.attractors) {
                    rec.cut_points.push(q);
                    pending.push((other, q));
                }
            }
        }
    }

    /// Adds a point that splits the edge of record `idx` only if something
    /// else splits it too.
    ///
    /// `other` is the record of the edge that `p` is an endpoint of. Two
    /// attractors at the same point from different edges mean that `p` is a
    /// junction rather than a near miss, so they promote the record at once.
    pub fn add_attractor(&mut self, idx: CutIdx, p: Point, other: CutIdx) {
        let rec = &mut self[idx];
        if rec.strong {
            rec.cut_points.push(p);
            self.add(other, p);
        } else if rec.attractors.contains(&(p, other)) {
            // Already known.
        } else if rec.attractors.iter().any(|(q, _)| *q == p) {
            rec.attractors.push((p, other));
            self.add(idx, p);
        } else {
            rec.attractors.push((p, other));
        }
    }
}

// Is `a -> b` a one-unit step off an axis that `c` comes straight back to?
fn is_jog(a: Point, b: Point, c: Point) -> bool {
    (a.y == b.y && (b.x - a.x).abs() == 1 && c.x == a.x)
        || (a.x == b.x && (b.y - a.y).abs() == 1 && c.y == a.y)
}

/// Splits `edge` at the given points, in order along the edge.
///
/// Points that don't project strictly inside the edge are ignored. A point
/// that would make the chain jut out by one unit and straight back is
/// dropped, because the resulting unit-sized kink would create new
/// intersections with its neighbors.
pub fn split_edge(edge: &Edge, points: &[Point]) -> Vec<Edge> {
    let len2 = edge.sq_length();
    let mut along: Vec<(Area, Point)> = points
        .iter()
        .map(|p| (edge.projection(*p), *p))
        .filter(|(t, _)| 0 < *t && *t < len2)
        .collect();
    along.sort();
    along.dedup();

    let mut chain = vec![edge.p1];
    for p in along.into_iter().map(|(_, p)| p).chain(std::iter::once(edge.p2)) {
        if chain.last() == Some(&p) {
            continue;
        }
        if let [.., a, b] = chain.as_slice() {
            if is_jog(*a, *b, p) {
                chain.pop();
            }
        }
        chain.push(p);
    }

    chain
        .windows(2)
        .map(|w| Edge::new(w[0], w[1]))
        .filter(|e| !e.is_degenerate())
        .collect()
}

/// Replaces every edge that has strong cut points by its pieces.
///
/// The pieces keep the property of the original, and nobody has cut points
/// afterwards.
pub fn resplit(edges: Vec<WorkEdge>, cuts: &CutVec<CutPoints>) -> Vec<WorkEdge> {
    let mut ret = Vec::with_capacity(edges.len());
    for e in edges {
        match e.cut.map(|idx| &cuts[idx]) {
            Some(rec) if rec.has_cutpoints() => {
                ret.extend(
                    split_edge(&e.edge, &rec.cut_points)
                        .into_iter()
                        .map(|piece| WorkEdge::new(piece, e.prop)),
                );
            }
            _ => ret.push(WorkEdge::new(e.edge, e.prop)),
        }
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn attractor_promotion() {
        let mut cuts: CutVec<CutPoints> = CutVec::default();
        let mut e1 = WorkEdge::new(Edge::new((0, 0), (10, 3)), 0);
        let mut e2 = WorkEdge::new(Edge::new((3, 1), (3, 8)), 1);
        let c1 = cuts.record_for(&mut e1);
        let c2 = cuts.record_for(&mut e2);

        cuts.add_attractor(c1, p(3, 1), c2);
        assert!(!cuts[c1].has_cutpoints());
        assert!(cuts[c1].cut_points.is_empty());

        cuts.add(c1, p(7, 2));
        assert!(cuts[c1].has_cutpoints());
        assert!(cuts[c1].attractors.is_empty());
        assert!(cuts[c1].cut_points.contains(&p(3, 1)));
        // The other edge was told as well.
        assert!(cuts[c2].has_cutpoints());
        assert_eq!(cuts[c2].cut_points, vec![p(3, 1)]);
    }

    #[test]
    fn attractor_on_strong_record() {
        let mut cuts: CutVec<CutPoints> = CutVec::default();
        let mut e1 = WorkEdge::new(Edge::new((0, 0), (10, 3)), 0);
        let mut e2 = WorkEdge::new(Edge::new((3, 1), (3, 8)), 1);
        let c1 = cuts.record_for(&mut e1);
        let c2 = cuts.record_for(&mut e2);
        cuts.add(c1, p(7, 2));
        cuts.add_attractor(c1, p(3, 1), c2);
        assert!(cuts[c1].cut_points.contains(&p(3, 1)));
        assert!(cuts[c2].has_cutpoints());
    }

    #[test]
    fn junction_promotes() {
        let mut cuts: CutVec<CutPoints> = CutVec::default();
        let mut e = WorkEdge::new(Edge::new((0, 0), (10, 3)), 0);
        let mut f = WorkEdge::new(Edge::new((3, 1), (3, 8)), 1);
        let mut g = WorkEdge::new(Edge::new((3, 1), (0, 5)), 1);
        let ce = cuts.record_for(&mut e);
        let cf = cuts.record_for(&mut f);
        let cg = cuts.record_for(&mut g);

        cuts.add_attractor(ce, p(3, 1), cf);
        cuts.add_attractor(ce, p(3, 1), cf);
        assert!(!cuts[ce].has_cutpoints());

        cuts.add_attractor(ce, p(3, 1), cg);
        assert!(cuts[ce].has_cutpoints());
        assert!(cuts[cf].has_cutpoints());
        assert!(cuts[cg].has_cutpoints());
    }

    #[test]
    fn promotion_chains() {
        let mut cuts: CutVec<CutPoints> = CutVec::default();
        let mut edges: Vec<WorkEdge> = (0..4)
            .map(|i| WorkEdge::new(Edge::new((0, i), (10, i + 5)), i as usize))
            .collect();
        let idx: Vec<_> = edges.iter_mut().map(|e| cuts.record_for(e)).collect();
        cuts.add_attractor(idx[0], p(1, 1), idx[1]);
        cuts.add_attractor(idx[1], p(2, 2), idx[2]);
        cuts.add_attractor(idx[2], p(3, 3), idx[3]);
        cuts.add(idx[0], p(5, 3));
        assert!(idx.iter().all(|i| cuts[*i].has_cutpoints()));
    }

    #[test]
    fn split_in_order() {
        let e = Edge::new((10, 0), (0, 0));
        let pieces = split_edge(&e, &[p(3, 0), p(7, 0), p(3, 0), p(12, 0), p(10, 0)]);
        assert_eq!(
            pieces,
            vec![
                Edge::new((10, 0), (7, 0)),
                Edge::new((7, 0), (3, 0)),
                Edge::new((3, 0), (0, 0)),
            ]
        );
    }

    #[test]
    fn split_avoids_zig_zag() {
        // (1, 4) is one unit off (0, 4), and the next point comes back to x = 0.
        let e = Edge::new((0, 0), (1, 10));
        let pieces = split_edge(&e, &[p(0, 4), p(1, 4), p(0, 6)]);
        assert!(pieces.iter().all(|piece| piece.p1 != p(1, 4)));
        assert_eq!(pieces.first().unwrap().p1, p(0, 0));
        assert_eq!(pieces.last().unwrap().p2, p(1, 10));
        for w in pieces.windows(2) {
            assert_eq!(w[0].p2, w[1].p1);
        }
    }
}
