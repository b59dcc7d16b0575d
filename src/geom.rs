//! Geometric primitives: integer points and directed edges.
//!
//! All sign tests (which side of an edge a point lies on, whether two edges
//! are parallel) are done exactly in [`Area`], which is wide enough to hold
//! any product of two coordinate differences, and products of those again.
//! Floating point only shows up when we need to interpolate a position.

/// The coordinate type.
pub type Coord = i32;

/// The type used for cross products, dot products and doubled areas.
pub type Area = i128;

/// A two-dimensional point on the integer grid.
///
/// Points are sorted by `y` and then by `x`, which is the order in which
/// the sweep visits them (it moves in increasing `y`, which we call "north").
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Horizontal coordinate. Larger values are "east".
    pub x: Coord,
    /// Vertical coordinate. Larger values are "north".
    pub y: Coord,
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Point {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Point {
    /// Create a new point.
    pub fn new(x: Coord, y: Coord) -> Self {
        Point { x, y }
    }

    /// The vector from `other` to `self`, in the wide type.
    pub fn diff(&self, other: &Point) -> (Area, Area) {
        (
            Area::from(self.x) - Area::from(other.x),
            Area::from(self.y) - Area::from(other.y),
        )
    }

    /// Converts to a floating-point point.
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(f64::from(self.x), f64::from(self.y))
    }
}

impl From<(Coord, Coord)> for Point {
    fn from((x, y): (Coord, Coord)) -> Self {
        Self { x, y }
    }
}

/// The cross product of two vectors.
#[inline]
pub fn cross(a: (Area, Area), b: (Area, Area)) -> Area {
    a.0 * b.1 - a.1 * b.0
}

/// The dot product of two vectors.
#[inline]
pub fn dot(a: (Area, Area), b: (Area, Area)) -> Area {
    a.0 * b.0 + a.1 * b.1
}

/// A directed edge between two grid points.
///
/// Unlike the points, the orientation of an edge carries meaning: for a
/// polygon boundary, the inside is to the right of each edge.
#[derive(Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Edge {
    /// The start point.
    pub p1: Point,
    /// The end point.
    pub p2: Point,
}

impl std::fmt::Debug for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} -> {:?}", self.p1, self.p2)
    }
}

impl Ord for Edge {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.p1, self.p2).cmp(&(other.p1, other.p2))
    }
}

impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Edge {
    /// An edge from `p1` to `p2`.
    pub fn new(p1: impl Into<Point>, p2: impl Into<Point>) -> Self {
        Edge {
            p1: p1.into(),
            p2: p2.into(),
        }
    }

    /// The direction vector, `p2 - p1`.
    pub fn d(&self) -> (Area, Area) {
        self.p2.diff(&self.p1)
    }

    /// The horizontal extent, with sign.
    pub fn dx(&self) -> Area {
        self.d().0
    }

    /// The vertical extent, with sign.
    pub fn dy(&self) -> Area {
        self.d().1
    }

    /// Returns true if both endpoints coincide.
    pub fn is_degenerate(&self) -> bool {
        self.p1 == self.p2
    }

    /// Returns true if both endpoints have the same `y`.
    pub fn is_horizontal(&self) -> bool {
        self.p1.y == self.p2.y
    }

    /// Returns true if both endpoints have the same `x`.
    pub fn is_vertical(&self) -> bool {
        self.p1.x == self.p2.x
    }

    /// Horizontal or vertical.
    pub fn is_ortho(&self) -> bool {
        self.is_horizontal() || self.is_vertical()
    }

    /// The same edge, pointing the other way.
    pub fn reversed(&self) -> Edge {
        Edge {
            p1: self.p2,
            p2: self.p1,
        }
    }

    /// The endpoint that comes first in sweep order.
    pub fn lower(&self) -> Point {
        self.p1.min(self.p2)
    }

    /// The endpoint that comes last in sweep order.
    pub fn upper(&self) -> Point {
        self.p1.max(self.p2)
    }

    /// This edge, with its endpoints in sweep order.
    pub fn canonical(&self) -> Edge {
        if self.p2 < self.p1 {
            self.reversed()
        } else {
            *self
        }
    }

    /// Does this edge point north (or east, if it is horizontal)?
    pub fn is_north(&self) -> bool {
        self.p1 < self.p2
    }

    /// The smallest `x` coordinate.
    pub fn x_min(&self) -> Coord {
        self.p1.x.min(self.p2.x)
    }

    /// The largest `x` coordinate.
    pub fn x_max(&self) -> Coord {
        self.p1.x.max(self.p2.x)
    }

    /// The smallest `y` coordinate.
    pub fn y_min(&self) -> Coord {
        self.p1.y.min(self.p2.y)
    }

    /// The largest `y` coordinate.
    pub fn y_max(&self) -> Coord {
        self.p1.y.max(self.p2.y)
    }

    /// Is `p` inside the (closed) bounding box of this edge?
    pub fn bbox_contains(&self, p: Point) -> bool {
        (self.x_min()..=self.x_max()).contains(&p.x) && (self.y_min()..=self.y_max()).contains(&p.y)
    }

    /// Twice the signed area of the triangle `p1, p2, p`.
    ///
    /// Positive if `p` is to the left of this edge, negative if it's to the right.
    pub fn side_of(&self, p: Point) -> Area {
        cross(self.d(), p.diff(&self.p1))
    }

    /// The (unnormalized) projection of `p` onto this edge's direction,
    /// measured from `p1`.
    pub fn projection(&self, p: Point) -> Area {
        dot(self.d(), p.diff(&self.p1))
    }

    /// The squared length.
    pub fn sq_length(&self) -> Area {
        let d = self.d();
        dot(d, d)
    }

    /// Are the two edges parallel (or anti-parallel)?
    pub fn parallel(&self, other: &Edge) -> bool {
        cross(self.d(), other.d()) == 0
    }

    /// Does `p` lie exactly on this edge, endpoints included?
    pub fn contains_exact(&self, p: Point) -> bool {
        self.bbox_contains(p) && self.side_of(p) == 0
    }

    /// Does `p` lie exactly on this edge, endpoints excluded?
    pub fn is_point_on_exact(&self, p: Point) -> bool {
        p != self.p1 && p != self.p2 && self.contains_exact(p)
    }

    /// Does this edge pass through the unit square centered on `p`?
    ///
    /// Endpoints are excluded, and `p` must be inside the bounding box. For
    /// axis-aligned edges this agrees with [`Edge::is_point_on_exact`]. For
    /// other edges, the unit square around `p` touches the line if the
    /// distance along the square's diagonal is at most half a unit, which is
    /// `2 |d × (p - p1)| <= |dx| + |dy|`.
    pub fn is_point_on_fuzzy(&self, p: Point) -> bool {
        if p == self.p1 || p == self.p2 || !self.bbox_contains(p) {
            false
        } else if self.is_ortho() {
            true
        } else {
            let (dx, dy) = self.d();
            2 * self.side_of(p).abs() <= dx.abs() + dy.abs()
        }
    }

    /// Our `x` coordinate at the given height.
    ///
    /// Horizontal edges return their largest `x` coordinate.
    pub fn x_at_y(&self, y: f64) -> f64 {
        if self.is_horizontal() {
            return f64::from(self.x_max());
        }
        let lo = self.lower();
        let hi = self.upper();
        let t = (y - f64::from(lo.y)) / f64::from(hi.y - lo.y);
        f64::from(lo.x) + t * f64::from(hi.x - lo.x)
    }

    /// Converts to a floating-point line.
    pub fn to_kurbo(&self) -> kurbo::Line {
        kurbo::Line::new(self.p1.to_kurbo(), self.p2.to_kurbo())
    }
}

/// Builds a [`kurbo::BezPath`] with one open subpath per edge.
pub fn edges_to_bez_path<'a>(edges: impl IntoIterator<Item = &'a Edge>) -> kurbo::BezPath {
    let mut ret = kurbo::BezPath::new();
    for e in edges {
        ret.move_to(e.p1.to_kurbo());
        ret.line_to(e.p2.to_kurbo());
    }
    ret
}
