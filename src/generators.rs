//! Utilities for generating examples, benchmarks, and test cases.

use crate::{Coord, Point, Polygon};

/// Generate a bunch of squares, arranged in a grid.
///
/// The lower-left corner of the first square is at (x0, y0). Each square has
/// size `size x size`, and the distance between squares (both horizontally
/// and vertically) is `offset`.
///
/// If `slant` is non-zero, generates parallelograms instead of squares: the
/// right-hand side of each square gets translated up by `slant`.
fn squares((x0, y0): (Coord, Coord), size: Coord, offset: Coord, slant: Coord, count: usize) -> Vec<Polygon> {
    let mut ret = Vec::new();
    for i in 0..count as Coord {
        let x = x0 + i * offset;
        for j in 0..count as Coord {
            let y = y0 + j * offset;
            ret.push(Polygon::new([
                Point::new(x, y),
                Point::new(x, y + size),
                Point::new(x + size, y + size + slant),
                Point::new(x + size, y + slant),
            ]));
        }
    }

    ret
}

/// Generate an `n` by `n` checkerboard-like pattern with overlapping squares.
/// For `n = 3`, it looks like:
///
/// ```text
/// +----+ +----+ +----+
/// |    | |    | |    |
/// |  +-+-+-++-+-+-+  |
/// +--+-+ +-++-+ +-+--+
/// +--+-+ +-++-+ +-+--+
/// |  +-+-+-++-+-+-+  |
/// |  +-+-+-++-+-+-+  |
/// +--+-+ +-++-+ +-+--+
/// +--+-+ +-++-+ +-+--+
/// |  +-+-+-++-+-+-+  |
/// |    | |    | |    |
/// +----+ +----+ +----+
/// ```
///
/// We return the pattern in two parts: the outer collection of `n x n`
/// non-overlapping squares, and the inner collection of `(n - 1) x (n - 1)`
/// non-overlapping squares.
pub fn checkerboard(n: usize) -> (Vec<Polygon>, Vec<Polygon>) {
    (
        squares((0, 0), 30, 40, 0, n),
        squares((20, 20), 30, 40, 0, n.saturating_sub(1)),
    )
}

/// Like `checkerboard`, but with no exactly-horizontal lines.
///
/// Horizontal edges get special handling in the sweep, so their presence or
/// absence can affect performance.
pub fn slanted_checkerboard(n: usize) -> (Vec<Polygon>, Vec<Polygon>) {
    (
        squares((0, 0), 30, 40, 1, n),
        squares((20, 20), 30, 40, 1, n.saturating_sub(1)),
    )
}

/// The "evens" are a bunch of long, skinny parallelograms going from
/// lower-left to upper-right. The "odds" go from lower-right to upper-left.
///
/// Every even crosses every odd, mostly away from the grid, so this
/// exercises the rounding of intersection points.
pub fn slanties(n: usize) -> (Vec<Polygon>, Vec<Polygon>) {
    let h = 20 * n as Coord;

    let mut even = Vec::new();
    let mut odd = Vec::new();
    for i in 0..n as Coord {
        let x_off = 20 * i;
        even.push(Polygon::new([
            Point::new(x_off, 0),
            Point::new(x_off + h, h),
            Point::new(x_off + h + 10, h),
            Point::new(x_off + 10, 0),
        ]));

        odd.push(Polygon::new([
            Point::new(x_off + h, 0),
            Point::new(x_off, h + 3),
            Point::new(x_off + 10, h + 3),
            Point::new(x_off + h + 10, 0),
        ]));
    }

    (even, odd)
}

/// Tall thin columns crossed by a ladder of small squares off to the side.
///
/// Most scanlines only pass through the columns, which is the situation
/// the skip cache is made for.
pub fn columns(n: usize) -> Vec<Polygon> {
    let n = n as Coord;
    let height = 10 * n;
    let mut ret: Vec<Polygon> = (0..n)
        .map(|i| Polygon::rect((10 * i, 0), (10 * i + 5, height)))
        .collect();
    ret.extend((0..n).map(|j| Polygon::rect((10 * n + 10, 10 * j), (10 * n + 12, 10 * j + 3))));
    ret
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_counts() {
        let (outer, inner) = checkerboard(3);
        assert_eq!(outer.len(), 9);
        assert_eq!(inner.len(), 4);
        assert!(outer.iter().all(|p| p.area2() == 2 * 900));
        assert_eq!(checkerboard(0).1.len(), 0);
    }

    #[test]
    fn slanted_has_no_horizontals() {
        let (outer, inner) = slanted_checkerboard(3);
        assert!(outer
            .iter()
            .chain(&inner)
            .flat_map(Polygon::edges)
            .all(|e| !e.is_horizontal()));
    }
}
