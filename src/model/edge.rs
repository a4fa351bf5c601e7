//! Edge variants connecting street graph vertices.

use geo::LineString;

use crate::model::{Permission, VertexId};

/// Half of a directed street segment, produced by splitting its geometry.
/// Unlike [`EdgeKind::Turn`] and [`EdgeKind::Out`], which charge the street
/// vertex they leave, a partial edge carries its own length.
#[derive(Debug, Clone)]
pub struct PartialStreet {
    pub geometry: LineString<f64>,
    /// Proportional share of the original segment length, in metres.
    pub length: f64,
    pub permission: Permission,
    pub wheelchair_accessible: bool,
    /// Turn cost inherited from the street edge this partial replaces.
    pub turn_cost: f64,
}

#[derive(Debug, Clone)]
pub enum EdgeKind {
    /// Zero-cost connector, always traversable.
    Free,
    /// End of a directed segment into its terminating intersection; charges
    /// the segment's full length.
    Out,
    /// Transition between two directed segments sharing an intersection;
    /// charges the origin segment's full length plus the turn cost.
    Turn { cost: f64, restricted: bool },
    /// Half-segment attached to a split location.
    Partial(PartialStreet),
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn free(from: VertexId, to: VertexId) -> Edge {
        Edge {
            from,
            to,
            kind: EdgeKind::Free,
        }
    }

    pub fn out(from: VertexId, to: VertexId) -> Edge {
        Edge {
            from,
            to,
            kind: EdgeKind::Out,
        }
    }

    pub fn turn(from: VertexId, to: VertexId) -> Edge {
        Edge::turn_with_cost(from, to, 0.0)
    }

    pub fn turn_with_cost(from: VertexId, to: VertexId, cost: f64) -> Edge {
        Edge {
            from,
            to,
            kind: EdgeKind::Turn {
                cost,
                restricted: false,
            },
        }
    }

    pub fn restricted_turn(from: VertexId, to: VertexId) -> Edge {
        Edge {
            from,
            to,
            kind: EdgeKind::Turn {
                cost: 0.0,
                restricted: true,
            },
        }
    }

    pub fn partial(from: VertexId, to: VertexId, partial: PartialStreet) -> Edge {
        Edge {
            from,
            to,
            kind: EdgeKind::Partial(partial),
        }
    }
}
