//! Dumping edge sets as SVG, for looking at what went wrong.

use ::svg::node::element::{path::Data, Circle, Path};
use ::svg::Document;

use crate::Edge;

/// Draws a few layers of edges, each in its own color.
///
/// SVG has `y` pointing down, so the picture is flipped to keep north up.
/// Each edge gets a dot at its start point, which shows its direction.
pub fn dump_edges<'a>(layers: impl IntoIterator<Item = (&'a [Edge], &'a str)>) -> Document {
    let layers: Vec<_> = layers.into_iter().collect();
    let all = layers.iter().flat_map(|(edges, _)| edges.iter());
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
    for e in all {
        for p in [e.p1, e.p2] {
            min_x = min_x.min(f64::from(p.x));
            max_x = max_x.max(f64::from(p.x));
            min_y = min_y.min(-f64::from(p.y));
            max_y = max_y.max(-f64::from(p.y));
        }
    }
    if min_x > max_x {
        (min_x, min_y, max_x, max_y) = (0.0, 0.0, 1.0, 1.0);
    }

    let stroke_width = (max_y - min_y).max(max_x - min_x) / 512.0;
    let dot_radius = stroke_width * 1.5;
    let pad = 8.0 * stroke_width;
    let mut document = Document::new().set(
        "viewBox",
        (
            min_x - pad,
            min_y - pad,
            max_x - min_x + 2.0 * pad,
            max_y - min_y + 2.0 * pad,
        ),
    );

    for (edges, color) in layers {
        for e in edges {
            let (x0, y0) = (f64::from(e.p1.x), -f64::from(e.p1.y));
            let (x1, y1) = (f64::from(e.p2.x), -f64::from(e.p2.y));
            let data = Data::new().move_to((x0, y0)).line_to((x1, y1));
            let path = Path::new()
                .set("stroke", color)
                .set("stroke-width", stroke_width)
                .set("stroke-opacity", "0.7")
                .set("d", data);
            document = document.add(path);

            let c = Circle::new()
                .set("r", dot_radius)
                .set("cx", x0)
                .set("cy", y0)
                .set("opacity", 0.5)
                .set("fill", color);
            document = document.add(c);
        }
    }
    document
}
