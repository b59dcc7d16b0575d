//! Receivers for the edges produced by a sweep.

use crate::evaluator::Tag;
use crate::geom::{Coord, Edge};

/// The consumer half of a sweep.
///
/// Only [`EdgeSink::put`] is required. The sweep calls `start` before doing
/// anything else and always calls `flush` at the end, even if the operation
/// was cancelled.
pub trait EdgeSink {
    /// Called before the first scanline.
    fn start(&mut self) {}

    /// Called after the last scanline, or after an aborted operation.
    fn flush(&mut self) {}

    /// Clears a previous stop request. Called before every sweep.
    fn reset_stop(&mut self) {}

    /// Returns true if this sink has seen enough. The sweep stops early once
    /// all of its sinks say so.
    fn can_stop(&self) -> bool {
        false
    }

    /// The sweep arrived at height `y`.
    fn begin_scanline(&mut self, _y: Coord) {}

    /// The sweep is done with height `y`.
    fn end_scanline(&mut self, _y: Coord) {}

    /// Receives a result edge, with the inside of the result on its right.
    fn put(&mut self, edge: Edge);

    /// Receives a selected edge.
    fn put_tagged(&mut self, edge: Edge, _tag: Tag) {
        self.put(edge);
    }

    /// A result edge put on an earlier scanline passes through this one.
    fn crossing_edge(&mut self, _edge: Edge) {}

    /// A run of crossing edges was skipped on this scanline. It contained
    /// `n` result edges, which would otherwise have been reported through
    /// [`EdgeSink::crossing_edge`].
    fn skip_n(&mut self, _n: usize) {}
}

/// Throws everything away, for evaluators whose result is their own state.
impl EdgeSink for () {
    fn put(&mut self, _edge: Edge) {}
}

impl EdgeSink for Vec<Edge> {
    fn put(&mut self, edge: Edge) {
        self.push(edge);
    }
}

/// Collects result edges, optionally only those with a given tag.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EdgeContainer {
    edges: Vec<Edge>,
    tags: Vec<Tag>,
    tag_filter: Option<Tag>,
}

impl EdgeContainer {
    /// A container that keeps every edge.
    pub fn new() -> Self {
        Self::default()
    }

    /// A container that only keeps edges put with this tag.
    pub fn with_tag(tag: Tag) -> Self {
        EdgeContainer {
            tag_filter: Some(tag),
            ..Self::default()
        }
    }

    /// The edges received so far, in the order they came.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The tag of each edge (zero for untagged ones).
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Gives up the collected edges.
    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }

    /// Forgets all edges, keeping the tag filter.
    pub fn clear(&mut self) {
        self.edges.clear();
        self.tags.clear();
    }
}

impl EdgeSink for EdgeContainer {
    fn put(&mut self, edge: Edge) {
        if self.tag_filter.is_none() {
            self.edges.push(edge);
            self.tags.push(0);
        }
    }

    fn put_tagged(&mut self, edge: Edge, tag: Tag) {
        if self.tag_filter.map_or(true, |t| t == tag) {
            self.edges.push(edge);
            self.tags.push(tag);
        }
    }
}

/// Remembers whether any result edge was produced, and stops the sweep at
/// the end of the first scanline that produced one.
#[derive(Clone, Debug, Default)]
pub struct AnyEdge {
    found: bool,
}

impl AnyEdge {
    /// A sink that hasn't seen anything yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Was there a result edge?
    pub fn found(&self) -> bool {
        self.found
    }
}

impl EdgeSink for AnyEdge {
    fn reset_stop(&mut self) {
        self.found = false;
    }

    fn can_stop(&self) -> bool {
        self.found
    }

    fn put(&mut self, _edge: Edge) {
        self.found = true;
    }
}

/// Counts what it is told, without keeping any edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountingSink {
    /// Result and selected edges.
    pub puts: usize,
    /// Calls to [`EdgeSink::crossing_edge`].
    pub crossings: usize,
    /// Result edges in runs skipped by the cache.
    pub skipped: usize,
    /// Scanlines begun.
    pub scanlines: usize,
    /// Calls to [`EdgeSink::flush`].
    pub flushes: usize,
}

impl EdgeSink for CountingSink {
    fn flush(&mut self) {
        self.flushes += 1;
    }

    fn begin_scanline(&mut self, _y: Coord) {
        self.scanlines += 1;
    }

    fn put(&mut self, _edge: Edge) {
        self.puts += 1;
    }

    fn crossing_edge(&mut self, _edge: Edge) {
        self.crossings += 1;
    }

    fn skip_n(&mut self, n: usize) {
        self.skipped += n;
    }
}
