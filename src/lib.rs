//! Turn-aware street network model and routing core.
//!
//! Directed street segments are graph vertices and the turns between them
//! are edges, so turn costs and restrictions fall out of ordinary edge
//! traversal. Query endpoints snap onto streets by splitting their geometry
//! in a per-query [`model::Overlay`]; transit stops are linked into the
//! network once, up front, with [`linker::create_linkage`]. Routing is
//! mode-aware A* over a [`model::GraphView`], forwards from a departure
//! time or backwards from an arrival time.

pub mod error;
pub mod index;
pub mod linker;
pub mod model;
pub mod routing;

pub use error::Error;
pub use index::{Split, StreetIndex, split_streets};
pub use linker::create_linkage;
pub use model::{
    Edge, EdgeKind, Graph, GraphView, Overlay, OverlayDelta, PartialStreet, Permission,
    StreetLocation, StreetVertex, TraverseMode, Vertex, VertexId, VertexKind,
};
pub use routing::{
    GraphPath, ModeSet, SearchState, ShortestPathTree, TraverseOptions, TraverseState,
    shortest_path_tree,
};

/// Seconds since an arbitrary epoch chosen by the caller.
pub type Time = f64;

/// Default walking speed in metres per second.
pub const DEFAULT_WALK_SPEED: f64 = 1.33;

/// Default cycling speed in metres per second.
pub const DEFAULT_BIKE_SPEED: f64 = 5.0;

/// Default limit on how far a query point may snap to a street, in metres.
pub const DEFAULT_SNAP_DISTANCE: f64 = 200.0;

/// Radius in metres within which a split location picks up transit stops.
pub const STOP_LINK_RADIUS: f64 = 25.0;

/// A query point this close to an existing vertex reuses it instead of
/// splitting a street, in metres.
pub const VERTEX_SNAP_EPSILON: f64 = 1.0;

/// Slack subtracted from the straight-line bound in the search heuristic,
/// in metres. Zero-cost connectors around splits and stops would otherwise
/// make the bound overestimate by a few metres.
pub const HEURISTIC_SLACK: f64 = 100.0;
