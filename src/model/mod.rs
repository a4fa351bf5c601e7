//! Street network model: vertices, edges, permissions, geometry helpers and
//! the base-graph/overlay pair.

mod edge;
pub mod geometry;
mod graph;
mod permission;
mod vertex;

pub use edge::{Edge, EdgeKind, PartialStreet};
pub use graph::{Graph, GraphView, Overlay, OverlayDelta};
pub(crate) use graph::SplitPoint;
pub use permission::{Permission, TraverseMode};
pub use vertex::{StreetLocation, StreetVertex, Vertex, VertexId, VertexKind};
