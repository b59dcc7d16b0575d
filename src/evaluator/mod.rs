//! Evaluators decide, from the winding state along a scanline, which edges
//! belong to the result.
//!
//! The sweep walks each scanline from west to east and tells the evaluator
//! about every edge it crosses, separately for the strip just north of the
//! scanline and the strip just south of it. Edges meeting at the same point
//! with the same direction are delivered together as a coincident group.
//! The evaluator answers each north-side notification with the change in
//! its "inside the result" state, and the sweep turns non-zero changes into
//! result edges.

use crate::edges::Property;
use crate::geom::Coord;

mod boolean;
mod interaction;
mod merge;
mod select;

pub use boolean::{BooleanKind, BooleanOp, WindingRule};
pub use interaction::{InteractionDetector, InteractionMode};
pub use merge::MergeOp;
pub use select::{EdgeSelect, SelectMode, SELECT_INSIDE, SELECT_OUTSIDE};

/// A sink-specific marker attached to a selected edge. Zero means "not selected".
pub type Tag = u32;

/// The strategy half of a sweep: winding bookkeeping plus a decision rule.
///
/// All the hooks other than [`Evaluator::edge`] and [`Evaluator::compare_ns`]
/// have do-nothing defaults.
pub trait Evaluator {
    /// Forgets the winding state. Called at the start of every scanline.
    fn reset(&mut self);

    /// Prepares for properties `0..n`.
    fn reserve(&mut self, n: usize);

    /// Crosses an edge from west to east.
    ///
    /// `north` says which side of the scanline is affected, and `enter` is
    /// true for edges that point north. Returns `+1` if the result state on
    /// that side switched on, `-1` if it switched off, and `0` otherwise.
    fn edge(&mut self, north: bool, enter: bool, prop: Property) -> i32;

    /// The result state north of the scanline minus the result state south
    /// of it, at the current position.
    fn compare_ns(&self) -> i32;

    /// Is every winding counter zero?
    fn is_reset(&self) -> bool;

    /// Decides whether the edge just delivered (or, if `horizontal`, the
    /// horizontal edge starting here) is selected.
    fn select_edge(&mut self, _horizontal: bool, _prop: Property) -> Tag {
        0
    }

    /// Should edges that merely touch be treated as overlapping?
    ///
    /// This changes the order of notifications in coincident groups: opening
    /// edges are delivered before closing ones.
    fn prefer_touch(&self) -> bool {
        false
    }

    /// Does this evaluator want [`Evaluator::select_edge`] calls?
    fn selects_edges(&self) -> bool {
        false
    }

    /// A vertex at `x` on the current scanline begins.
    fn next_vertex(&mut self, _x: Coord) {}

    /// The current vertex is done.
    fn end_vertex(&mut self) {}

    /// A coincident group begins.
    fn next_coincident(&mut self) {}

    /// The current coincident group is done.
    fn end_coincident(&mut self) {}

    /// Called once, after the last scanline.
    fn finish(&mut self) {}
}

/// Per-property winding counters on both sides of the scanline.
///
/// The counters are not an evaluator by themselves; evaluators embed them
/// and layer their own notion of "inside" on top.
#[derive(Clone, Debug, Default)]
pub struct WindingCounters {
    north: Vec<i32>,
    south: Vec<i32>,
    nonzero_north: usize,
    nonzero_south: usize,
}

impl WindingCounters {
    /// Makes room for properties `0..n`.
    pub fn reserve(&mut self, n: usize) {
        if self.north.len() < n {
            self.north.resize(n, 0);
            self.south.resize(n, 0);
        }
    }

    /// The number of properties there is room for.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.north.len()
    }

    /// Sets every counter to zero.
    pub fn reset(&mut self) {
        self.north.fill(0);
        self.south.fill(0);
        self.nonzero_north = 0;
        self.nonzero_south = 0;
    }

    /// The winding number of `prop` on one side.
    pub fn get(&self, north: bool, prop: Property) -> i32 {
        let counters = if north { &self.north } else { &self.south };
        assert!(prop < counters.len(), "property {prop} out of range");
        counters[prop]
    }

    /// Adds `delta` to a counter, returning its old and new values.
    pub fn add(&mut self, north: bool, prop: Property, delta: i32) -> (i32, i32) {
        let (counters, nonzero) = if north {
            (&mut self.north, &mut self.nonzero_north)
        } else {
            (&mut self.south, &mut self.nonzero_south)
        };
        assert!(prop < counters.len(), "property {prop} out of range");
        let old = counters[prop];
        let new = old + delta;
        counters[prop] = new;
        if old == 0 && new != 0 {
            *nonzero += 1;
        } else if old != 0 && new == 0 {
            assert!(*nonzero > 0, "non-zero counter count underflow");
            *nonzero -= 1;
        }
        (old, new)
    }

    /// Crosses an edge: north-pointing edges count up, others count down.
    pub fn cross(&mut self, north: bool, enter: bool, prop: Property) -> (i32, i32) {
        self.add(north, prop, if enter { 1 } else { -1 })
    }

    /// Is every counter zero?
    pub fn is_reset(&self) -> bool {
        self.nonzero_north == 0 && self.nonzero_south == 0
    }
}

/// Counts how many properties of some class are "inside", on each side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct InsideCount {
    pub north: usize,
    pub south: usize,
}

impl InsideCount {
    /// The same count on both sides.
    pub fn uniform(n: usize) -> Self {
        InsideCount { north: n, south: n }
    }

    pub fn get(&self, north: bool) -> usize {
        if north {
            self.north
        } else {
            self.south
        }
    }

    /// Accounts for one property changing from `was` to `is` inside.
    pub fn update(&mut self, north: bool, was: bool, is: bool) {
        let count = if north {
            &mut self.north
        } else {
            &mut self.south
        };
        match (was, is) {
            (false, true) => *count += 1,
            (true, false) => {
                assert!(*count > 0, "inside count underflow");
                *count -= 1;
            }
            _ => {}
        }
    }
}
