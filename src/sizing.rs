//! The geometry of growing and shrinking polygons.
//!
//! Sizing by `d` sweeps every boundary edge sideways by `d`: outwards for a
//! positive `d` and inwards for a negative one. The swept strip of each edge
//! is a quadrilateral, and where the strips of two neighbouring edges leave
//! a wedge-shaped gap at a corner, a join patch fills it. The sized polygon
//! is then the union of the original with the strips and patches (when
//! growing), or the original minus them (when shrinking).

use crate::geom::{cross, dot, Area, Coord, Point};
use crate::num::round_to_grid;
use crate::polygon::{cyclic_pairs, Polygon};

/// How to fill the gap at a corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Join {
    /// Extend both offset edges until they meet, falling back to a bevel
    /// when the tip would be more than `2|d|` away from the corner.
    #[default]
    Miter,
    /// Connect the offset edges directly.
    Bevel,
}

/// The miter tip may be at most this many times `|d|` from the corner.
pub const MITER_LIMIT: f64 = 2.0;

fn unit_normal(d: (Area, Area)) -> (f64, f64) {
    // Outwards is to the left of the edge.
    let (dx, dy) = (d.0 as f64, d.1 as f64);
    let len = dx.hypot(dy);
    (-dy / len, dx / len)
}

fn offset(p: Point, n: (f64, f64), d: f64) -> Point {
    Point::new(
        p.x + round_to_grid(n.0 * d),
        p.y + round_to_grid(n.1 * d),
    )
}

fn shift(p: Point, by: (Coord, Coord)) -> Point {
    Point::new(p.x + by.0, p.y + by.1)
}

/// The point where the two offset edges at a corner meet, if it is within
/// the miter limit.
fn miter_point(v: Point, u1: (f64, f64), u2: (f64, f64), d: f64) -> Option<Point> {
    let c = u1.0 * u2.0 + u1.1 * u2.1;
    let denom = 1.0 + c;
    // The tip lies |d| * sqrt(2 / (1 + c)) away from the corner.
    if denom <= 0.0 || 2.0 / denom > MITER_LIMIT * MITER_LIMIT {
        return None;
    }
    Some(Point::new(
        v.x + round_to_grid(d * (u1.0 + u2.0) / denom),
        v.y + round_to_grid(d * (u1.1 + u2.1) / denom),
    ))
}

/// The strips and join patches for sizing one ring by `d`.
///
/// The ring must have the inside on the right of its edges, as the rings of
/// a [`Polygon`] do.
pub fn ring_pieces(ring: &[Point], d: Coord, join: Join) -> Vec<Polygon> {
    let mut pieces = Vec::new();
    if d == 0 || ring.len() < 3 {
        return pieces;
    }
    let df = f64::from(d);

    // One outward unit normal and grid offset per edge.
    let normals: Vec<((f64, f64), (Coord, Coord))> = cyclic_pairs(ring)
        .map(|(p, q)| {
            let u = unit_normal(q.diff(p));
            let o = offset(Point::default(), u, df);
            (u, (o.x, o.y))
        })
        .collect();

    for ((p, q), (_, n)) in cyclic_pairs(ring).zip(&normals) {
        if *n == (0, 0) {
            continue;
        }
        pieces.push(Polygon::new([*p, *q, shift(*q, *n), shift(*p, *n)]));
    }

    // Corner i sits between edge i - 1 and edge i.
    let count = ring.len();
    for i in 0..count {
        let prev = ring[(i + count - 1) % count];
        let v = ring[i];
        let next = ring[(i + 1) % count];
        let (u1, n1) = normals[(i + count - 1) % count];
        let (u2, n2) = normals[i];
        if n1 == n2 {
            continue;
        }

        let turn = cross(v.diff(&prev), next.diff(&v));
        // Growing opens a gap at right turns, shrinking at left turns.
        let opens = if d > 0 { turn < 0 } else { turn > 0 };
        let straight = turn == 0 && dot(v.diff(&prev), next.diff(&v)) > 0;
        if !opens && !straight {
            continue;
        }

        let a = shift(v, n1);
        let b = shift(v, n2);
        let tip = match join {
            Join::Miter if !straight => miter_point(v, u1, u2, df),
            _ => None,
        };
        pieces.push(match tip {
            Some(m) => Polygon::new([v, a, m, b]),
            None => Polygon::new([v, a, b]),
        });
    }
    pieces
}

/// The strips and join patches for sizing a whole polygon by `d`.
pub fn polygon_pieces(polygon: &Polygon, d: Coord, join: Join) -> Vec<Polygon> {
    polygon
        .rings()
        .flat_map(|ring| ring_pieces(ring, d, join))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::rect((0, 0), (10, 10))
    }

    #[test]
    fn square_strips_and_corners() {
        let pieces = polygon_pieces(&square(), 2, Join::Miter);
        // Four strips and four corner squares.
        assert_eq!(pieces.len(), 8);
        let area: Area = pieces.iter().map(Polygon::area2).sum();
        assert_eq!(area, 2 * (4 * 20 + 4 * 4));
        assert!(pieces
            .iter()
            .any(|p| p.hull().contains(&Point::new(-2, -2))));
    }

    #[test]
    fn bevel_corners() {
        let pieces = polygon_pieces(&square(), 2, Join::Bevel);
        let area: Area = pieces.iter().map(Polygon::area2).sum();
        assert_eq!(area, 2 * (4 * 20 + 4 * 2));
    }

    #[test]
    fn shrinking_patches_the_inner_corners() {
        // An L shape has exactly one left turn.
        let l = Polygon::new([(0, 0), (0, 20), (10, 20), (10, 10), (20, 10), (20, 0)]);
        let pieces = polygon_pieces(&l, -2, Join::Miter);
        assert_eq!(pieces.len(), 6 + 1);
        assert!(pieces
            .iter()
            .any(|p| p.hull().contains(&Point::new(8, 8))));
    }

    #[test]
    fn sharp_corners_are_bevelled() {
        let v = Point::new(0, 0);
        // Nearly reversing direction: the tip would be far away.
        let u1 = (0.0, 1.0);
        let u2 = (0.1f64.sin(), -(0.1f64.cos()));
        assert!(miter_point(v, u1, u2, 2.0).is_none());
        // A right angle is fine.
        assert_eq!(
            miter_point(v, (0.0, 1.0), (1.0, 0.0), 2.0),
            Some(Point::new(2, 2))
        );
    }

    #[test]
    fn zero_is_nothing() {
        assert!(polygon_pieces(&square(), 0, Join::Miter).is_empty());
    }
}
