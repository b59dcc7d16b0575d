//! Utilities for fuzz and/or property testing using `arbitrary`.

use arbitrary::Unstructured;

use crate::{Coord, Edge, Point, Polygon};

/// Generate an arbitrary coordinate in some range.
pub fn coord_in_range(
    start: Coord,
    end: Coord,
    u: &mut Unstructured<'_>,
) -> Result<Coord, arbitrary::Error> {
    u.int_in_range(start..=end)
}

/// Generate a coordinate in some range, but give it a chance to be equal or
/// very close to another coordinate.
fn another_coord_in_range(
    orig: Coord,
    start: Coord,
    end: Coord,
    u: &mut Unstructured<'_>,
) -> Result<Coord, arbitrary::Error> {
    let close: bool = u.arbitrary()?;
    if close {
        let delta: Coord = u.int_in_range(-2..=2)?;
        Ok(orig.saturating_add(delta).clamp(start, end))
    } else {
        coord_in_range(start, end, u)
    }
}

/// Generate an arbitrary point with both coordinates in `-size..=size`.
pub fn point(size: Coord, u: &mut Unstructured<'_>) -> Result<Point, arbitrary::Error> {
    Ok(Point::new(
        coord_in_range(-size, size, u)?,
        coord_in_range(-size, size, u)?,
    ))
}

/// Generate a point that has a good chance of sharing a coordinate with
/// `other`, so that we get plenty of horizontal, vertical and touching
/// edges.
pub fn another_point(
    size: Coord,
    other: Point,
    u: &mut Unstructured<'_>,
) -> Result<Point, arbitrary::Error> {
    Ok(Point::new(
        another_coord_in_range(other.x, -size, size, u)?,
        another_coord_in_range(other.y, -size, size, u)?,
    ))
}

/// Generate an arbitrary non-degenerate edge.
pub fn edge(size: Coord, u: &mut Unstructured<'_>) -> Result<Edge, arbitrary::Error> {
    let p = point(size, u)?;
    let mut q = another_point(size, p, u)?;
    if q == p {
        q = if p.x < size {
            Point::new(p.x + 1, p.y)
        } else {
            Point::new(p.x - 1, p.y)
        };
    }
    Ok(Edge::new(p, q))
}

/// Generate an arbitrary polygon, possibly self-intersecting, with between
/// 3 and `max_points` points.
pub fn polygon(
    size: Coord,
    max_points: usize,
    u: &mut Unstructured<'_>,
) -> Result<Polygon, arbitrary::Error> {
    let len = u.int_in_range(3..=max_points.max(3))?;
    let mut ring = vec![point(size, u)?];
    for _ in 1..len {
        let last = *ring.last().unwrap_or(&Point::default());
        ring.push(another_point(size, last, u)?);
    }
    Ok(Polygon::new(ring))
}

/// Generate a handful of arbitrary polygons.
pub fn polygons(
    size: Coord,
    max_count: usize,
    u: &mut Unstructured<'_>,
) -> Result<Vec<Polygon>, arbitrary::Error> {
    let count = u.int_in_range(0..=max_count)?;
    (0..count).map(|_| polygon(size, 8, u)).collect()
}

/// Generate an axis-aligned rectangle with positive area.
pub fn rect(size: Coord, u: &mut Unstructured<'_>) -> Result<Polygon, arbitrary::Error> {
    let p = point(size, u)?;
    let w = u.int_in_range(1..=size.max(1))?;
    let h = u.int_in_range(1..=size.max(1))?;
    Ok(Polygon::rect(p, (p.x + w, p.y + h)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_never_degenerate() {
        arbtest::arbtest(|u| {
            let e = edge(4, u)?;
            assert!(!e.is_degenerate());
            Ok(())
        });
    }

    #[test]
    fn polygons_are_clockwise() {
        arbtest::arbtest(|u| {
            let p = polygon(100, 6, u)?;
            assert!(crate::polygon::ring_area2(p.hull()) <= 0);
            Ok(())
        });
    }
}
