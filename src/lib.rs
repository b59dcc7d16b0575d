#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod typed_vec;

#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;
mod config;
mod cut;
mod edges;
pub mod evaluator;
mod geom;
pub mod intersect;
mod num;
pub mod ops;
mod polygon;
mod processor;
mod progress;
pub mod sink;
pub mod sizing;
mod sweep;

#[cfg(feature = "generators")]
pub mod generators;

#[cfg(feature = "debug-svg")]
pub mod svg;

pub use config::Config;
pub use edges::Property;
pub use evaluator::{
    BooleanKind, BooleanOp, EdgeSelect, Evaluator, InteractionDetector, InteractionMode, MergeOp,
    SelectMode, Tag, WindingRule, SELECT_INSIDE, SELECT_OUTSIDE,
};
pub use geom::{cross, edges_to_bez_path, Area, Coord, Edge, Point};
pub use polygon::{contours_from_bez_path, ring_area2, Polygon};
pub use processor::EdgeProcessor;
pub use progress::{CancelAfter, Cancelled, Progress};
pub use sink::{AnyEdge, CountingSink, EdgeContainer, EdgeSink};
pub use sweep::SinkPair;

/// Things that can go wrong while processing edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The progress collaborator asked us to stop.
    #[error("operation cancelled")]
    Cancelled,
    /// `redo` needs the split edges of an earlier `process`, and there
    /// weren't any (or edges were inserted since).
    #[error("redo called without a preceding process")]
    NotPrepared,
    /// A zero-length edge was inserted through the strict API.
    #[error("zero-length edge at {0:?}")]
    DegenerateEdge(Point),
}

impl From<Cancelled> for Error {
    fn from(_: Cancelled) -> Self {
        Error::Cancelled
    }
}
