//! Spatial lookup over the network: R-trees of street segments, snap-able
//! vertices and transit stops, plus partner pairing of reverse twins.

mod split;

pub use split::{Split, split_streets};

use geo::{Distance, Haversine, Point};
use hashbrown::HashMap;
use rstar::RTree;
use rstar::primitives::{GeomWithData, Line};

use crate::error::Error;
use crate::model::{Edge, Graph, Overlay, VertexId, VertexKind};
use crate::routing::{TraverseOptions, traversable};
use crate::{STOP_LINK_RADIUS, VERTEX_SNAP_EPSILON};

type SegmentEntry = GeomWithData<Line<[f64; 2]>, VertexId>;
type PointEntry = GeomWithData<[f64; 2], VertexId>;

/// Immutable spatial index over a built graph. Queries borrow it freely;
/// rebuilding after the graph changes is the caller's job.
pub struct StreetIndex {
    segments: RTree<SegmentEntry>,
    vertices: RTree<PointEntry>,
    stops: RTree<PointEntry>,
    /// Reverse twin of each directed street, where one exists.
    partners: HashMap<VertexId, VertexId>,
}

impl StreetIndex {
    pub fn new(graph: &Graph) -> Self {
        let mut segments = Vec::new();
        let mut vertices = Vec::new();
        let mut stops = Vec::new();
        let mut endpoints: HashMap<(i64, i64, i64, i64), Vec<VertexId>> = HashMap::new();

        for (id, vertex) in graph.vertices() {
            match vertex.kind() {
                VertexKind::Street(street) => {
                    for line in street.geometry.lines() {
                        segments.push(GeomWithData::new(
                            Line::new(
                                [line.start.x, line.start.y],
                                [line.end.x, line.end.y],
                            ),
                            id,
                        ));
                    }
                    endpoints
                        .entry(endpoint_key(street.start_point(), street.end_point()))
                        .or_default()
                        .push(id);
                }
                VertexKind::Intersection { coordinate } => {
                    vertices.push(GeomWithData::new([coordinate.x(), coordinate.y()], id));
                }
                VertexKind::TransitStop { coordinate, .. } => {
                    vertices.push(GeomWithData::new([coordinate.x(), coordinate.y()], id));
                    stops.push(GeomWithData::new([coordinate.x(), coordinate.y()], id));
                }
                VertexKind::Location(location) => {
                    vertices.push(GeomWithData::new(
                        [location.coordinate.x(), location.coordinate.y()],
                        id,
                    ));
                }
            }
        }

        // A street's reverse twin runs the same geometry the other way, so
        // its endpoint key is the mirror of ours.
        let mut partners = HashMap::new();
        for (id, vertex) in graph.vertices() {
            let Some(street) = vertex.as_street() else {
                continue;
            };
            let mirrored = endpoint_key(street.end_point(), street.start_point());
            if let Some(candidates) = endpoints.get(&mirrored) {
                if let Some(&partner) = candidates.iter().find(|&&c| c != id) {
                    partners.insert(id, partner);
                }
            }
        }

        StreetIndex {
            segments: RTree::bulk_load(segments),
            vertices: RTree::bulk_load(vertices),
            stops: RTree::bulk_load(stops),
            partners,
        }
    }

    /// Snaps a coordinate onto the network for one query.
    ///
    /// An existing vertex within [`VERTEX_SNAP_EPSILON`] is returned as-is.
    /// Otherwise the nearest street usable under `options` is split in the
    /// overlay, transit stops within [`STOP_LINK_RADIUS`] of the split are
    /// wired up, and the split's main location is returned. `None` means
    /// nothing usable lies within `options.max_snap_distance`.
    pub fn nearest_vertex(
        &self,
        overlay: &mut Overlay<'_>,
        coordinate: Point<f64>,
        options: &TraverseOptions,
    ) -> Result<Option<VertexId>, Error> {
        if let Some(entry) = self.vertices.nearest_neighbor(&[coordinate.x(), coordinate.y()]) {
            let point = Point::new(entry.geom()[0], entry.geom()[1]);
            if Haversine.distance(coordinate, point) <= VERTEX_SNAP_EPSILON {
                return Ok(Some(entry.data));
            }
        }

        let Some(street_id) = self.nearest_street(overlay.base(), coordinate, options) else {
            return Ok(None);
        };
        let directions = self.directions_for(street_id);
        let label = format!("split {}", overlay.vertex_count());
        let split = split_streets(overlay, &label, coordinate, &directions)?;

        let point = overlay.view().vertex(split.location).coordinate();
        for stop in self.nearby_stops(point, STOP_LINK_RADIUS) {
            overlay.add_edge(Edge::free(split.location, stop));
            overlay.add_edge(Edge::free(stop, split.location));
        }
        Ok(Some(split.location))
    }

    /// The closest street segment usable under `options`, if one lies within
    /// the snap distance. Ties resolve to the lowest vertex id.
    pub(crate) fn nearest_street(
        &self,
        graph: &Graph,
        coordinate: Point<f64>,
        options: &TraverseOptions,
    ) -> Option<VertexId> {
        let query = [coordinate.x(), coordinate.y()];
        let degree_radius = degree_radius(coordinate.y(), options.max_snap_distance);
        self.segments
            .locate_within_distance(query, degree_radius * degree_radius)
            .filter(|entry| {
                let street = graph
                    .vertex(entry.data)
                    .as_street()
                    .expect("segment index entries point at street vertices");
                traversable(street.permission, street.wheelchair_accessible, options)
            })
            .filter_map(|entry| {
                let nearest = entry.geom().nearest_point(&query);
                let metres =
                    Haversine.distance(coordinate, Point::new(nearest[0], nearest[1]));
                (metres <= options.max_snap_distance).then_some((metres, entry.data))
            })
            .min_by(|(a, av), (b, bv)| a.total_cmp(b).then_with(|| av.cmp(bv)))
            .map(|(_, id)| id)
    }

    /// A street together with its reverse twin, when it has one.
    pub(crate) fn directions_for(&self, street: VertexId) -> Vec<VertexId> {
        let mut directions = vec![street];
        if let Some(&partner) = self.partners.get(&street) {
            directions.push(partner);
        }
        directions
    }

    /// Transit stops within `radius` metres, closest first; ties resolve to
    /// the lowest vertex id.
    pub fn nearby_stops(&self, coordinate: Point<f64>, radius: f64) -> Vec<VertexId> {
        let query = [coordinate.x(), coordinate.y()];
        let degree_radius = degree_radius(coordinate.y(), radius);
        let mut found: Vec<(f64, VertexId)> = self
            .stops
            .locate_within_distance(query, degree_radius * degree_radius)
            .filter_map(|entry| {
                let point = Point::new(entry.geom()[0], entry.geom()[1]);
                let metres = Haversine.distance(coordinate, point);
                (metres <= radius).then_some((metres, entry.data))
            })
            .collect();
        found.sort_by(|(a, av), (b, bv)| a.total_cmp(b).then_with(|| av.cmp(bv)));
        found.into_iter().map(|(_, id)| id).collect()
    }
}

/// A conservative window in coordinate degrees covering `metres` around a
/// latitude. One degree of longitude shrinks with cos(lat), so dividing by
/// the smaller metre-per-degree figure never under-covers.
fn degree_radius(latitude: f64, metres: f64) -> f64 {
    let metres_per_degree = f64::min(110_540.0, 111_320.0 * latitude.to_radians().cos());
    metres / metres_per_degree
}

fn endpoint_key(start: Point<f64>, end: Point<f64>) -> (i64, i64, i64, i64) {
    const SCALE: f64 = 1e7;
    (
        (start.x() * SCALE).round() as i64,
        (start.y() * SCALE).round() as i64,
        (end.x() * SCALE).round() as i64,
        (end.y() * SCALE).round() as i64,
    )
}
