//! Exact positions along a scanline.

use crate::geom::{Area, Coord, Edge};

/// A horizontal position on a scanline, stored as an exact fraction.
///
/// Edges that pass through a scanline without ending on it usually do so
/// at a non-integer position. We still need to order them exactly against
/// each other and against the integer vertices, so we keep the position as
/// `num / den` with a positive denominator. With 32-bit coordinates the
/// numerator needs about 66 bits and the denominator 33, so comparing by
/// cross-multiplication fits comfortably in an `i128`.
#[derive(Clone, Copy)]
pub struct ScanX {
    num: Area,
    den: Area,
}

impl ScanX {
    /// An integer position.
    pub fn exact(x: Coord) -> Self {
        ScanX {
            num: Area::from(x),
            den: 1,
        }
    }

    /// The position at which a non-horizontal edge crosses the scanline at `y`.
    pub fn of_edge_at(edge: &Edge, y: Coord) -> Self {
        debug_assert!(!edge.is_horizontal());
        let lo = edge.lower();
        let (dx, dy) = edge.upper().diff(&lo);
        ScanX {
            num: Area::from(lo.x) * dy + (Area::from(y) - Area::from(lo.y)) * dx,
            den: dy,
        }
    }

    /// Returns the position if it is an integer.
    pub fn as_exact(&self) -> Option<Coord> {
        (self.num % self.den == 0).then(|| (self.num / self.den) as Coord)
    }
}

impl std::fmt::Debug for ScanX {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_exact() {
            Some(x) => write!(f, "{x}"),
            None => write!(f, "{}/{}", self.num, self.den),
        }
    }
}

impl Ord for ScanX {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.num * other.den).cmp(&(other.num * self.den))
    }
}

impl PartialOrd for ScanX {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScanX {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for ScanX {}

/// Rounds to the nearest grid coordinate, with ties away from zero.
///
/// Values outside the coordinate range saturate.
pub fn round_to_grid(v: f64) -> Coord {
    v.round() as Coord
}

/// The sign of a wide value, as -1, 0 or 1.
pub fn sign(a: Area) -> i32 {
    a.signum() as i32
}
