//! One-call entry points for the common operations.
//!
//! Each of these sets up a fresh [`EdgeProcessor`], feeds it the inputs with
//! suitable properties, and runs a single evaluator. For repeated work on
//! the same input, or to run several evaluators in one sweep, use the
//! processor directly.

use crate::evaluator::{
    BooleanKind, BooleanOp, EdgeSelect, InteractionDetector, InteractionMode, MergeOp, SelectMode,
};
use crate::geom::{cross, Area, Edge, Point};
use crate::processor::EdgeProcessor;
use crate::sink::EdgeContainer;
use crate::sizing::{polygon_pieces, Join};
use crate::{Config, Error, Polygon};

/// Computes a boolean operation between two sets of polygons.
///
/// The result edges have the inside on their right.
pub fn boolean(a: &[Polygon], b: &[Polygon], kind: BooleanKind) -> Result<Vec<Edge>, Error> {
    boolean_with(Config::default(), a, b, kind)
}

/// Like [`boolean`], with a custom configuration.
pub fn boolean_with(
    config: Config,
    a: &[Polygon],
    b: &[Polygon],
    kind: BooleanKind,
) -> Result<Vec<Edge>, Error> {
    let mut ep = EdgeProcessor::new(config);
    for p in a {
        ep.insert_polygon(p, 0);
    }
    for p in b {
        ep.insert_polygon(p, 1);
    }
    let mut out: Vec<Edge> = Vec::new();
    ep.process(&mut out, &mut BooleanOp::new(kind))?;
    Ok(out)
}

/// Merges polygons.
///
/// With `min_wc == 0` this is the union of all of them. Otherwise only the
/// areas covered by more than `min_wc` of the polygons are kept.
pub fn merge(polygons: &[Polygon], min_wc: usize) -> Result<Vec<Edge>, Error> {
    let mut ep = EdgeProcessor::default();
    for (i, p) in polygons.iter().enumerate() {
        ep.insert_polygon(p, if min_wc > 0 { i } else { 0 });
    }
    let mut out: Vec<Edge> = Vec::new();
    ep.process(&mut out, &mut MergeOp::new(min_wc))?;
    Ok(out)
}

/// Grows (for positive `d`) or shrinks (for negative `d`) polygons by `d`
/// units.
///
/// Growing treats overlapping inputs as their union. Shrinking expects the
/// inputs not to overlap.
pub fn size(polygons: &[Polygon], d: i32, join: Join) -> Result<Vec<Edge>, Error> {
    let mut ep = EdgeProcessor::default();
    let mut out: Vec<Edge> = Vec::new();
    if d >= 0 {
        for p in polygons {
            ep.insert_polygon(p, 0);
            for piece in polygon_pieces(p, d, join) {
                ep.insert_polygon(&piece, 0);
            }
        }
        ep.process(&mut out, &mut MergeOp::new(0))?;
    } else {
        for p in polygons {
            ep.insert_polygon(p, 0);
            for piece in polygon_pieces(p, d, join) {
                ep.insert_polygon(&piece, 1);
            }
        }
        ep.process(&mut out, &mut BooleanOp::new(BooleanKind::ANotB))?;
    }
    Ok(out)
}

/// Classifies edges by whether they lie inside or outside the polygons.
///
/// The edges are split where they cross polygon boundaries. Selected pieces
/// come back tagged with [`crate::SELECT_INSIDE`] or
/// [`crate::SELECT_OUTSIDE`].
pub fn select_edges(
    edges: &[Edge],
    polygons: &[Polygon],
    mode: SelectMode,
    include_touching: bool,
) -> Result<EdgeContainer, Error> {
    let mut ep = EdgeProcessor::default();
    ep.reserve(edges.len());
    for e in edges {
        ep.insert(*e, 0);
    }
    for p in polygons {
        ep.insert_polygon(p, 1);
    }
    let mut out = EdgeContainer::new();
    ep.process(&mut out, &mut EdgeSelect::new(mode, include_touching))?;
    Ok(out)
}

/// The result of [`interactions`] and [`overlapping_pairs`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Interactions {
    /// Interacting `(primary, secondary)` index pairs, sorted.
    pub pairs: Vec<(usize, usize)>,
    /// In [`InteractionMode::Outside`] mode, the indices of the secondaries
    /// that don't interact with any primary.
    pub non_interacting: Vec<usize>,
}

/// Finds which secondaries interact with which primaries.
///
/// Indices in the result refer to the input slices.
pub fn interactions(
    primaries: &[Polygon],
    secondaries: &[Polygon],
    mode: InteractionMode,
    include_touching: bool,
) -> Result<Interactions, Error> {
    let boundary = primaries.len();
    if boundary == 0 {
        // Nothing can interact with nothing.
        let non_interacting = match mode {
            InteractionMode::Outside => (0..secondaries.len()).collect(),
            _ => Vec::new(),
        };
        return Ok(Interactions {
            pairs: Vec::new(),
            non_interacting,
        });
    }

    let mut ep = EdgeProcessor::default();
    for (i, p) in primaries.iter().chain(secondaries).enumerate() {
        ep.insert_polygon(p, i);
    }
    let mut det = InteractionDetector::new(mode, include_touching, boundary);
    ep.process(&mut (), &mut det)?;
    Ok(Interactions {
        pairs: det
            .interactions()
            .map(|(p, s)| (p, s - boundary))
            .collect(),
        non_interacting: det.non_interacting().iter().map(|s| s - boundary).collect(),
    })
}

/// Finds all pairs of overlapping polygons within one set.
///
/// Pairs come out as `(smaller index, larger index)`.
pub fn overlapping_pairs(
    polygons: &[Polygon],
    include_touching: bool,
) -> Result<Vec<(usize, usize)>, Error> {
    let mut ep = EdgeProcessor::default();
    for (i, p) in polygons.iter().enumerate() {
        ep.insert_polygon(p, i);
    }
    let mut det = InteractionDetector::new(InteractionMode::Overlapping, include_touching, 0);
    ep.process(&mut (), &mut det)?;
    Ok(det.interactions().collect())
}

/// Twice the area enclosed by a set of edges with the inside on their right.
///
/// The edges need not be connected up, as long as together they form
/// closed loops.
pub fn edge_set_area(edges: &[Edge]) -> Area {
    let origin = Point::default();
    -edges
        .iter()
        .map(|e| cross(e.p1.diff(&origin), e.p2.diff(&origin)))
        .sum::<Area>()
}
