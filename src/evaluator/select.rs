use super::{Evaluator, InsideCount, Tag, WindingCounters};
use crate::edges::Property;

/// Tag for candidate edges inside the polygons.
pub const SELECT_INSIDE: Tag = 1;
/// Tag for candidate edges outside the polygons.
pub const SELECT_OUTSIDE: Tag = 2;

/// Which candidate edges to select.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SelectMode {
    /// Only edges inside the polygons, tagged [`SELECT_INSIDE`].
    Inside,
    /// Only edges outside the polygons, tagged [`SELECT_OUTSIDE`].
    Outside,
    /// All candidate edges, tagged by where they are.
    Both,
}

/// Selects candidate edges (even properties) by where they lie relative to
/// the polygons (odd properties).
///
/// Candidates don't affect the winding state, so they need not be closed.
/// An edge running along a polygon boundary counts as inside if
/// `include_touching` is set, and as outside otherwise.
#[derive(Clone, Debug)]
pub struct EdgeSelect {
    mode: SelectMode,
    include_touching: bool,
    wc: WindingCounters,
    inside: InsideCount,
    /// Whether the north side was inside the polygons when the current
    /// coincident group started.
    north_before: bool,
}

impl EdgeSelect {
    /// A selector for the given mode.
    pub fn new(mode: SelectMode, include_touching: bool) -> Self {
        EdgeSelect {
            mode,
            include_touching,
            wc: WindingCounters::default(),
            inside: InsideCount::default(),
            north_before: false,
        }
    }

    fn inside(&self, north: bool) -> bool {
        self.inside.get(north) > 0
    }

    fn classify(&self, a: bool, b: bool) -> Tag {
        let inside = if a == b { a } else { self.include_touching };
        match (self.mode, inside) {
            (SelectMode::Inside | SelectMode::Both, true) => SELECT_INSIDE,
            (SelectMode::Outside | SelectMode::Both, false) => SELECT_OUTSIDE,
            _ => 0,
        }
    }
}

impl Evaluator for EdgeSelect {
    fn reset(&mut self) {
        self.wc.reset();
        self.inside = InsideCount::default();
        self.north_before = false;
    }

    fn reserve(&mut self, n: usize) {
        self.wc.reserve(n);
    }

    fn edge(&mut self, north: bool, enter: bool, prop: Property) -> i32 {
        if prop % 2 == 1 {
            let (old, new) = self.wc.cross(north, enter, prop);
            self.inside.update(north, old != 0, new != 0);
        }
        0
    }

    fn compare_ns(&self) -> i32 {
        0
    }

    fn is_reset(&self) -> bool {
        self.wc.is_reset()
    }

    fn next_coincident(&mut self) {
        self.north_before = self.inside(true);
    }

    fn select_edge(&mut self, horizontal: bool, prop: Property) -> Tag {
        if prop % 2 == 1 {
            return 0;
        }
        if horizontal {
            self.classify(self.inside(false), self.inside(true))
        } else {
            self.classify(self.north_before, self.inside(true))
        }
    }

    fn selects_edges(&self) -> bool {
        true
    }
}
