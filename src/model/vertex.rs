//! Vertex variants of the turn-aware street graph.
//!
//! Directed street segments are graph nodes, not edges: attaching turn
//! semantics to the connections between consecutive segments then needs no
//! per-intersection turn table.

use geo::{LineString, Point};

use crate::Error;
use crate::model::{Permission, geometry};

/// Dense index of a vertex within a [`Graph`](crate::model::Graph) or its
/// query overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub(crate) u32);

impl VertexId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// One direction of travel along a physical street geometry.
#[derive(Debug, Clone)]
pub struct StreetVertex {
    pub geometry: LineString<f64>,
    /// Haversine length in metres, always derived from the geometry.
    pub length: f64,
    pub permission: Permission,
    pub wheelchair_accessible: bool,
    /// True for the reverse-direction twin of a two-way street.
    pub back: bool,
}

impl StreetVertex {
    pub fn new(
        geometry: LineString<f64>,
        permission: Permission,
        back: bool,
    ) -> Result<Self, Error> {
        geometry::validate(&geometry)?;
        let length = geometry::polyline_length(&geometry);
        Ok(StreetVertex {
            geometry,
            length,
            permission,
            wheelchair_accessible: true,
            back,
        })
    }

    #[must_use]
    pub fn with_wheelchair_accessible(mut self, accessible: bool) -> Self {
        self.wheelchair_accessible = accessible;
        self
    }

    /// Where a traveller stands before paying for the segment.
    pub fn start_point(&self) -> Point<f64> {
        self.geometry.0[0].into()
    }

    pub fn end_point(&self) -> Point<f64> {
        self.geometry.0[self.geometry.0.len() - 1].into()
    }
}

/// Synthetic vertex created at an arbitrary point along street geometry.
#[derive(Debug, Clone)]
pub struct StreetLocation {
    pub coordinate: Point<f64>,
    pub wheelchair_accessible: bool,
}

#[derive(Debug, Clone)]
pub enum VertexKind {
    Intersection { coordinate: Point<f64> },
    Street(StreetVertex),
    TransitStop { coordinate: Point<f64>, stop_id: String },
    Location(StreetLocation),
}

#[derive(Debug, Clone)]
pub struct Vertex {
    label: String,
    kind: VertexKind,
}

impl Vertex {
    pub fn intersection(label: impl Into<String>, coordinate: Point<f64>) -> Self {
        Vertex {
            label: label.into(),
            kind: VertexKind::Intersection { coordinate },
        }
    }

    pub fn street(label: impl Into<String>, street: StreetVertex) -> Self {
        Vertex {
            label: label.into(),
            kind: VertexKind::Street(street),
        }
    }

    pub fn transit_stop(
        label: impl Into<String>,
        stop_id: impl Into<String>,
        coordinate: Point<f64>,
    ) -> Self {
        Vertex {
            label: label.into(),
            kind: VertexKind::TransitStop {
                coordinate,
                stop_id: stop_id.into(),
            },
        }
    }

    pub fn location(label: impl Into<String>, location: StreetLocation) -> Self {
        Vertex {
            label: label.into(),
            kind: VertexKind::Location(location),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &VertexKind {
        &self.kind
    }

    pub fn coordinate(&self) -> Point<f64> {
        match &self.kind {
            VertexKind::Intersection { coordinate } => *coordinate,
            VertexKind::Street(street) => street.start_point(),
            VertexKind::TransitStop { coordinate, .. } => *coordinate,
            VertexKind::Location(location) => location.coordinate,
        }
    }

    pub fn as_street(&self) -> Option<&StreetVertex> {
        match &self.kind {
            VertexKind::Street(street) => Some(street),
            _ => None,
        }
    }

    pub fn as_location(&self) -> Option<&StreetLocation> {
        match &self.kind {
            VertexKind::Location(location) => Some(location),
            _ => None,
        }
    }

    pub fn is_transit_stop(&self) -> bool {
        matches!(self.kind, VertexKind::TransitStop { .. })
    }

    pub(crate) fn set_wheelchair_accessible(&mut self, accessible: bool) {
        if let VertexKind::Location(location) = &mut self.kind {
            location.wheelchair_accessible = accessible;
        }
    }
}
