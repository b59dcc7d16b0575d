//! A minimal polygon type, for feeding closed shapes into the processor.
//!
//! Turning result edges back into polygons is not our business; this type
//! only goes one way: from rings of points to oriented edges.

use kurbo::BezPath;

use crate::geom::{cross, Area, Edge, Point};
use crate::num::round_to_grid;

/// A polygon with an outer hull and any number of holes.
///
/// The hull is stored clockwise and the holes counter-clockwise (with `y`
/// pointing north), so that the inside of the polygon is always to the right
/// of its edges.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Polygon {
    hull: Vec<Point>,
    holes: Vec<Vec<Point>>,
}

pub(crate) fn cyclic_pairs<T>(xs: &[T]) -> impl Iterator<Item = (&T, &T)> {
    xs.windows(2)
        .map(|pair| (&pair[0], &pair[1]))
        .chain(xs.last().zip(xs.first()))
}

/// Twice the signed area of a closed ring; positive for counter-clockwise rings.
pub fn ring_area2(ring: &[Point]) -> Area {
    cyclic_pairs(ring)
        .map(|(p, q)| cross(p.diff(&Point::default()), q.diff(&Point::default())))
        .sum()
}

fn normalized_ring<P: Into<Point>>(ps: impl IntoIterator<Item = P>, clockwise: bool) -> Vec<Point> {
    let mut ring: Vec<Point> = ps.into_iter().map(Into::into).collect();
    ring.dedup();
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    let area = ring_area2(&ring);
    if (clockwise && area > 0) || (!clockwise && area < 0) {
        ring.reverse();
    }
    ring
}

impl Polygon {
    /// Creates a polygon from its hull, in either orientation.
    pub fn new<P: Into<Point>>(hull: impl IntoIterator<Item = P>) -> Self {
        Polygon {
            hull: normalized_ring(hull, true),
            holes: Vec::new(),
        }
    }

    /// An axis-aligned rectangle spanned by two corners.
    pub fn rect(p: impl Into<Point>, q: impl Into<Point>) -> Self {
        let (p, q) = (p.into(), q.into());
        Polygon::new([
            Point::new(p.x, p.y),
            Point::new(p.x, q.y),
            Point::new(q.x, q.y),
            Point::new(q.x, p.y),
        ])
    }

    /// Adds a hole, in either orientation.
    pub fn with_hole<P: Into<Point>>(mut self, hole: impl IntoIterator<Item = P>) -> Self {
        self.holes.push(normalized_ring(hole, false));
        self
    }

    /// The outer ring, clockwise.
    pub fn hull(&self) -> &[Point] {
        &self.hull
    }

    /// The holes, counter-clockwise.
    pub fn holes(&self) -> &[Vec<Point>] {
        &self.holes
    }

    /// All the rings: the hull first, then the holes.
    pub fn rings(&self) -> impl Iterator<Item = &[Point]> + '_ {
        std::iter::once(self.hull.as_slice()).chain(self.holes.iter().map(Vec::as_slice))
    }

    /// The boundary edges, oriented with the inside on their right.
    ///
    /// Degenerate edges are skipped.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.rings().flat_map(|ring| {
            cyclic_pairs(ring)
                .map(|(p, q)| Edge::new(*p, *q))
                .filter(|e| !e.is_degenerate())
        })
    }

    /// Twice the enclosed area (hull minus holes).
    pub fn area2(&self) -> Area {
        -ring_area2(&self.hull) - self.holes.iter().map(|h| ring_area2(h)).sum::<Area>()
    }

    /// Moves every point by `(dx, dy)`.
    pub fn translated(&self, dx: i32, dy: i32) -> Polygon {
        let shift = |ring: &Vec<Point>| {
            ring.iter()
                .map(|p| Point::new(p.x + dx, p.y + dy))
                .collect::<Vec<_>>()
        };
        Polygon {
            hull: shift(&self.hull),
            holes: self.holes.iter().map(shift).collect(),
        }
    }
}

/// Flattens the closed subpaths of a [`BezPath`] into rings of grid points.
///
/// The rings keep the orientation of the path, so nested subpaths of
/// opposite orientation come out as holes when they are inserted with
/// [`crate::EdgeProcessor::insert_contour`].
pub fn contours_from_bez_path(path: &BezPath, tolerance: f64) -> Vec<Vec<Point>> {
    let mut ret: Vec<Vec<Point>> = Vec::new();
    let mut current = Vec::new();
    kurbo::flatten(path, tolerance, |el| match el {
        kurbo::PathEl::MoveTo(p) => {
            if current.len() > 2 {
                ret.push(std::mem::take(&mut current));
            }
            current.clear();
            current.push(Point::new(round_to_grid(p.x), round_to_grid(p.y)));
        }
        kurbo::PathEl::LineTo(p) => {
            let p = Point::new(round_to_grid(p.x), round_to_grid(p.y));
            if current.last() != Some(&p) {
                current.push(p);
            }
        }
        kurbo::PathEl::ClosePath => {
            if current.len() > 2 {
                ret.push(std::mem::take(&mut current));
            }
            current.clear();
        }
        // `flatten` only produces lines.
        kurbo::PathEl::QuadTo(..) | kurbo::PathEl::CurveTo(..) => {}
    });
    if current.len() > 2 {
        ret.push(current);
    }
    for ring in &mut ret {
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
    }
    ret.retain(|ring| ring.len() > 2);
    ret
}

#[cfg(test)]
mod tests {
    use kurbo::Shape;

    use super::*;

    #[test]
    fn normalizes_orientation() {
        let ccw = Polygon::new([(0, 0), (10, 0), (10, 10), (0, 10)]);
        let cw = Polygon::new([(0, 0), (0, 10), (10, 10), (10, 0)]);
        assert!(ring_area2(ccw.hull()) < 0);
        assert_eq!(ccw.area2(), 200);
        assert_eq!(cw.area2(), 200);
    }

    #[test]
    fn hole_area() {
        let p = Polygon::rect((0, 0), (10, 10)).with_hole([(2, 2), (2, 4), (4, 4), (4, 2)]);
        assert_eq!(p.area2(), 2 * 96);
        assert_eq!(p.edges().count(), 8);
    }

    #[test]
    fn inside_is_on_the_right() {
        let p = Polygon::rect((0, 0), (10, 10));
        for e in p.edges() {
            // The center is to the right, i.e. negative side.
            assert!(e.side_of(Point::new(5, 5)) < 0);
        }
    }

    #[test]
    fn flatten_bez_path() {
        let path = kurbo::Rect::new(0.0, 0.0, 4.0, 3.0).to_path(0.1);
        let rings = contours_from_bez_path(&path, 0.1);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 4);
    }

    #[test]
    fn flatten_curves() {
        let path = kurbo::Circle::new((0.0, 0.0), 50.0).to_path(0.1);
        let rings = contours_from_bez_path(&path, 0.25);
        assert_eq!(rings.len(), 1);
        assert!(rings[0].len() > 8);
        for p in &rings[0] {
            let r2 = p.x as i64 * p.x as i64 + p.y as i64 * p.y as i64;
            assert!((48 * 48..=51 * 51).contains(&r2), "{p:?} is off the circle");
        }
    }
}
