//! One-time linking of transit stops into the street network.

use geo::Point;
use log::{info, warn};
use rayon::prelude::*;

use crate::error::Error;
use crate::index::{StreetIndex, split_streets};
use crate::model::{Edge, Graph, Overlay, VertexId};
use crate::routing::TraverseOptions;

/// Connects every unlinked transit stop to its nearest walkable street with
/// permanent split locations and free connectors. Returns the number of
/// vertices added. Stops with no street in snapping range are logged and
/// skipped; linking runs again without touching stops already connected.
pub fn create_linkage(graph: &mut Graph) -> Result<usize, Error> {
    let index = StreetIndex::new(graph);
    let options = TraverseOptions::default();

    let unlinked: Vec<(VertexId, Point<f64>)> = graph
        .vertices()
        .filter(|(id, vertex)| {
            vertex.is_transit_stop() && graph.outgoing(*id).next().is_none()
        })
        .map(|(id, vertex)| (id, vertex.coordinate()))
        .collect();
    info!("linking {} transit stops to the street network", unlinked.len());

    // Candidate search is read-only and independent per stop; the overlay
    // mutation below stays serial.
    let shared: &Graph = graph;
    let candidates: Vec<(VertexId, Point<f64>, Option<VertexId>)> = unlinked
        .par_iter()
        .map(|&(stop, point)| {
            (stop, point, index.nearest_street(shared, point, &options))
        })
        .collect();

    let delta = {
        let mut overlay = Overlay::new(graph);
        for (stop, point, street) in candidates {
            let Some(street) = street else {
                warn!(
                    "transit stop {} has no walkable street in range, skipping",
                    graph.vertex(stop).label()
                );
                continue;
            };
            let directions = index.directions_for(street);
            let label = format!("link {}", graph.vertex(stop).label());
            let split = split_streets(&mut overlay, &label, point, &directions)?;
            for &side in &split.direction_locations {
                overlay.add_edge(Edge::free(stop, side));
                overlay.add_edge(Edge::free(side, stop));
            }
        }
        overlay.into_delta()
    };

    let added = delta.vertex_count();
    graph.absorb(delta);
    info!("street linking added {added} vertices");
    Ok(added)
}
