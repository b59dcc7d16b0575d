//! The tagged-edge repository.

use crate::cut::CutIdx;
use crate::geom::{Edge, Point};
use crate::polygon::{cyclic_pairs, Polygon};

/// The source identifier of an edge.
///
/// Evaluators keep one winding counter per property. For two-operand
/// operations, even properties belong to the first operand and odd ones to
/// the second.
pub type Property = usize;

/// An edge, the source it came from, and its cut point record (if any).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkEdge {
    pub edge: Edge,
    pub prop: Property,
    pub cut: Option<CutIdx>,
}

impl WorkEdge {
    pub fn new(edge: Edge, prop: Property) -> Self {
        WorkEdge {
            edge,
            prop,
            cut: None,
        }
    }
}

/// An unordered collection of tagged edges.
///
/// Zero-length edges never make it in.
#[derive(Clone, Debug, Default)]
pub struct EdgeRepository {
    edges: Vec<WorkEdge>,
    property_count: usize,
}

impl EdgeRepository {
    /// The number of edges.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// One more than the largest property ever inserted (or zero).
    pub fn property_count(&self) -> usize {
        self.property_count
    }

    /// Adds an edge, returning false (and doing nothing) if it has zero length.
    pub fn insert(&mut self, edge: Edge, prop: Property) -> bool {
        if edge.is_degenerate() {
            log::trace!("rejecting zero-length edge at {:?}", edge.p1);
            return false;
        }
        self.edges.push(WorkEdge::new(edge, prop));
        self.property_count = self.property_count.max(prop + 1);
        true
    }

    /// Adds the boundary of a polygon.
    pub fn insert_polygon(&mut self, polygon: &Polygon, prop: Property) {
        for e in polygon.edges() {
            self.insert(e, prop);
        }
    }

    /// Adds a closed ring of points, keeping its orientation.
    ///
    /// Unlike [`EdgeRepository::insert_polygon`], nothing is normalized: a
    /// counter-clockwise ring has its inside on the left, so it counts as a
    /// hole (or as negative winding).
    pub fn insert_contour(&mut self, ring: &[Point], prop: Property) {
        for (p, q) in cyclic_pairs(ring) {
            self.insert(Edge::new(*p, *q), prop);
        }
    }

    pub fn reserve(&mut self, n: usize) {
        self.edges.reserve(n);
    }

    /// Forgets all edges and properties.
    pub fn clear(&mut self) {
        self.edges.clear();
        self.property_count = 0;
    }

    pub fn edges(&self) -> &[WorkEdge] {
        &self.edges
    }

    pub(crate) fn edges_mut(&mut self) -> &mut [WorkEdge] {
        &mut self.edges
    }

    /// Takes the edges out, for resplitting.
    pub(crate) fn take(&mut self) -> Vec<WorkEdge> {
        std::mem::take(&mut self.edges)
    }

    /// Puts resplit edges back. Properties are unchanged.
    pub(crate) fn replace(&mut self, edges: Vec<WorkEdge>) {
        self.edges = edges;
    }
}
