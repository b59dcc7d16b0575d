//! What a single scanline looks like: the edges touching it, in order.

use std::cmp::Ordering;

use crate::edges::WorkEdge;
use crate::geom::{Area, Coord, Point};
use crate::num::ScanX;

/// How an edge relates to the current scanline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SlotKind {
    /// The edge ends here and lies south of the scanline.
    South,
    /// The edge starts here and lies north of the scanline.
    North,
    /// The edge passes through the scanline.
    Crossing,
    /// The edge lies on the scanline; the slot is at its western end.
    Horizontal,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Slot {
    pub x: ScanX,
    pub kind: SlotKind,
    pub edge: usize,
}

/// The edges of a sweep, bucketed by the scanline at which they show up.
pub(crate) struct ScanlineEdges {
    /// The non-horizontal edges, by lower `y`.
    by_start: Vec<usize>,
    /// The horizontal edges (if anyone wants them), by `y`.
    horizontals: Vec<usize>,
    next_start: usize,
    next_horizontal: usize,
    /// The non-horizontal edges touching the current scanline.
    active: Vec<usize>,
    /// The heights of all scanlines.
    pub ys: Vec<Coord>,
}

impl ScanlineEdges {
    pub fn new(edges: &[WorkEdge], with_horizontals: bool) -> Self {
        let mut ys: Vec<Coord> = edges
            .iter()
            .filter(|e| with_horizontals || !e.edge.is_horizontal())
            .flat_map(|e| [e.edge.p1.y, e.edge.p2.y])
            .collect();
        ys.sort_unstable();
        ys.dedup();

        let (mut horizontals, mut by_start): (Vec<usize>, Vec<usize>) =
            (0..edges.len()).partition(|&i| edges[i].edge.is_horizontal());
        by_start.sort_by_key(|&i| (edges[i].edge.y_min(), i));
        if with_horizontals {
            horizontals.sort_by_key(|&i| (edges[i].edge.p1.y, edges[i].edge.x_min(), i));
        } else {
            horizontals.clear();
        }

        ScanlineEdges {
            by_start,
            horizontals,
            next_start: 0,
            next_horizontal: 0,
            active: Vec::new(),
            ys,
        }
    }

    /// Fills `slots` with the edges at height `y`, ordered from west to east.
    ///
    /// Scanlines must be visited in increasing order.
    pub fn fill(&mut self, edges: &[WorkEdge], y: Coord, slots: &mut Vec<Slot>) {
        self.active.retain(|&i| edges[i].edge.y_max() >= y);
        while self.next_start < self.by_start.len()
            && edges[self.by_start[self.next_start]].edge.y_min() <= y
        {
            self.active.push(self.by_start[self.next_start]);
            self.next_start += 1;
        }

        slots.clear();
        for &i in &self.active {
            let e = &edges[i].edge;
            let slot = if e.y_min() == y {
                Slot {
                    x: ScanX::exact(e.lower().x),
                    kind: SlotKind::North,
                    edge: i,
                }
            } else if e.y_max() == y {
                Slot {
                    x: ScanX::exact(e.upper().x),
                    kind: SlotKind::South,
                    edge: i,
                }
            } else {
                Slot {
                    x: ScanX::of_edge_at(e, y),
                    kind: SlotKind::Crossing,
                    edge: i,
                }
            };
            slots.push(slot);
        }

        while self.next_horizontal < self.horizontals.len()
            && edges[self.horizontals[self.next_horizontal]].edge.p1.y <= y
        {
            let i = self.horizontals[self.next_horizontal];
            if edges[i].edge.p1.y == y {
                slots.push(Slot {
                    x: ScanX::exact(edges[i].edge.x_min()),
                    kind: SlotKind::Horizontal,
                    edge: i,
                });
            }
            self.next_horizontal += 1;
        }

        slots.sort_by(|a, b| a.x.cmp(&b.x).then(a.edge.cmp(&b.edge)));
    }
}

/// The end of the position starting at `start`: the first slot with a
/// different `x`.
pub(crate) fn position_end(slots: &[Slot], start: usize) -> usize {
    let x = slots[start].x;
    start
        + slots[start..]
            .iter()
            .take_while(|s| s.x == x)
            .count()
}

/// Orders directions leaving a vertex on the same side of the scanline from
/// west to east.
///
/// Both vectors must point strictly north or strictly south.
pub(crate) fn cmp_direction(a: (Area, Area), b: (Area, Area)) -> Ordering {
    (a.0 * b.1.abs()).cmp(&(b.0 * a.1.abs()))
}

/// The direction from `v` to `far`.
pub(crate) fn direction(v: Point, far: Point) -> (Area, Area) {
    far.diff(&v)
}
