//! Query-time splitting of street geometry.
//!
//! A split never mutates the base graph. It adds overlay vertices and
//! partial edges so a search can enter and leave a street mid-segment: a
//! main location at the snapped point, one side location per travel
//! direction, partial edges covering each half of the split geometry, and
//! free connectors tying the locations together.

use crate::error::Error;
use crate::model::{
    Edge, EdgeKind, Overlay, PartialStreet, SplitPoint, StreetLocation, Vertex, VertexId,
    geometry,
};

/// Locations created by one split.
#[derive(Debug, Clone)]
pub struct Split {
    /// The vertex a query origin or destination attaches to.
    pub location: VertexId,
    /// One location per directed street, in the order the streets were
    /// given. The network linker ties transit stops to these directly.
    pub direction_locations: Vec<VertexId>,
}

/// Splits every street in `directions` at the point of `coordinate`'s
/// projection, wiring the halves into `overlay`. All streets are expected to
/// share the same physical geometry (a segment and its reverse twin).
pub fn split_streets(
    overlay: &mut Overlay<'_>,
    label: &str,
    coordinate: geo::Point<f64>,
    directions: &[VertexId],
) -> Result<Split, Error> {
    if directions.is_empty() {
        return Err(Error::InvalidData(
            "a split needs at least one directed street".to_owned(),
        ));
    }
    let base = overlay.base();

    let first_street = base
        .vertex(directions[0])
        .as_street()
        .expect("split target must be a directed street segment");
    let fraction = geometry::locate_fraction(&first_street.geometry, coordinate)?;
    let point = geometry::interpolate(&first_street.geometry, fraction)?;

    let location = overlay.add_vertex(Vertex::location(
        label,
        StreetLocation {
            coordinate: point,
            wheelchair_accessible: false,
        },
    ));

    let mut direction_locations = Vec::with_capacity(directions.len());
    let mut accessible = false;
    for &street_id in directions {
        let street = base
            .vertex(street_id)
            .as_street()
            .expect("split target must be a directed street segment");
        accessible |= street.wheelchair_accessible;
        let side_fraction = geometry::locate_fraction(&street.geometry, coordinate)?;
        let side = split_direction(overlay, label, street_id, side_fraction)?;
        overlay.add_edge(Edge::free(location, side));
        overlay.add_edge(Edge::free(side, location));
        direction_locations.push(side);
    }
    overlay.vertex_mut(location).set_wheelchair_accessible(accessible);

    Ok(Split {
        location,
        direction_locations,
    })
}

/// Splits a single directed street at `fraction`, reusing an existing split
/// at the same spot if this overlay already made one.
fn split_direction(
    overlay: &mut Overlay<'_>,
    label: &str,
    street_id: VertexId,
    fraction: f64,
) -> Result<VertexId, Error> {
    if let Some(existing) = overlay.split_at(street_id, fraction) {
        return Ok(existing);
    }
    let base = overlay.base();
    let street = base
        .vertex(street_id)
        .as_street()
        .expect("split target must be a directed street segment");
    let street_label = base.vertex(street_id).label().to_owned();
    let geometry = street.geometry.clone();
    let length = street.length;
    let permission = street.permission;
    let wheelchair_accessible = street.wheelchair_accessible;

    let point = geometry::interpolate(&geometry, fraction)?;
    let side = overlay.add_vertex(Vertex::location(
        format!("{label} on {street_label}"),
        StreetLocation {
            coordinate: point,
            wheelchair_accessible,
        },
    ));

    // Entry half: from the street's start up to the split point.
    overlay.add_edge(Edge::partial(
        street_id,
        side,
        PartialStreet {
            geometry: geometry::slice(&geometry, 0.0, fraction)?,
            length: fraction * length,
            permission,
            wheelchair_accessible,
            turn_cost: 0.0,
        },
    ));

    // Exit half: from the split point to wherever the street itself could
    // go, inheriting each turn's cost and restrictions.
    let tail_geometry = geometry::slice(&geometry, fraction, 1.0)?;
    let tail_length = (1.0 - fraction) * length;
    for edge in base.outgoing(street_id) {
        let turn_cost = match &edge.kind {
            EdgeKind::Out => 0.0,
            EdgeKind::Turn { restricted: true, .. } => continue,
            EdgeKind::Turn { cost, .. } => *cost,
            _ => continue,
        };
        overlay.add_edge(Edge::partial(
            side,
            edge.to,
            PartialStreet {
                geometry: tail_geometry.clone(),
                length: tail_length,
                permission,
                wheelchair_accessible,
                turn_cost,
            },
        ));
    }

    // Chain to earlier splits of the same street so travel between two
    // split points stays on this segment.
    let (before, after) = overlay.neighbouring_splits(street_id, fraction);
    if let Some(previous) = before {
        overlay.add_edge(Edge::partial(
            previous.location,
            side,
            PartialStreet {
                geometry: geometry::slice(&geometry, previous.fraction, fraction)?,
                length: (fraction - previous.fraction) * length,
                permission,
                wheelchair_accessible,
                turn_cost: 0.0,
            },
        ));
    }
    if let Some(next) = after {
        overlay.add_edge(Edge::partial(
            side,
            next.location,
            PartialStreet {
                geometry: geometry::slice(&geometry, fraction, next.fraction)?,
                length: (next.fraction - fraction) * length,
                permission,
                wheelchair_accessible,
                turn_cost: 0.0,
            },
        ));
    }
    overlay.record_split(street_id, SplitPoint { fraction, location: side });
    Ok(side)
}
