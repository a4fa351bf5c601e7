//! Shared fixture: a city block of four double-direction streets with
//! explicit turn edges, in/out intersection vertices per corner, and
//! optional transit stops.

use geo::{LineString, Point, line_string};
use strada::{Edge, Graph, Permission, StreetVertex, Vertex, VertexId};

#[derive(Debug, Clone, Copy)]
pub struct BlockPermissions {
    pub top: Permission,
    pub bottom: Permission,
    pub left: Permission,
    pub right: Permission,
}

impl Default for BlockPermissions {
    fn default() -> Self {
        BlockPermissions {
            top: Permission::ALL,
            bottom: Permission::ALL,
            left: Permission::ALL,
            right: Permission::ALL,
        }
    }
}

pub struct BlockSpec {
    pub tl: Point<f64>,
    pub tr: Point<f64>,
    pub bl: Point<f64>,
    pub br: Point<f64>,
    /// Extra points threaded into the left side, bottom to top.
    pub left_via: Vec<Point<f64>>,
    pub permissions: BlockPermissions,
    pub stations: bool,
}

#[allow(dead_code)]
pub struct StreetBlock {
    pub graph: Graph,
    pub top: VertexId,
    pub top_back: VertexId,
    pub bottom: VertexId,
    pub bottom_back: VertexId,
    pub left: VertexId,
    pub left_back: VertexId,
    pub right: VertexId,
    pub right_back: VertexId,
    pub tl_in: VertexId,
    pub tl_out: VertexId,
    pub tr_in: VertexId,
    pub tr_out: VertexId,
    pub bl_in: VertexId,
    pub bl_out: VertexId,
    pub br_in: VertexId,
    pub br_out: VertexId,
    pub station1: Option<VertexId>,
    pub station2: Option<VertexId>,
}

/// The standard square block: roughly 852 m wide and 1112 m tall.
#[allow(dead_code)]
pub fn square_block(permissions: BlockPermissions, stations: bool) -> StreetBlock {
    build_block(BlockSpec {
        tl: Point::new(-74.01, 40.01),
        tr: Point::new(-74.0, 40.01),
        bl: Point::new(-74.01, 40.0),
        br: Point::new(-74.0, 40.0),
        left_via: Vec::new(),
        permissions,
        stations,
    })
}

/// A wide, short block whose left side bulges west: going around the left
/// is far longer than cutting across the right.
#[allow(dead_code)]
pub fn wide_block(permissions: BlockPermissions) -> StreetBlock {
    build_block(BlockSpec {
        tl: Point::new(-74.02, 40.001),
        tr: Point::new(-74.0, 40.001),
        bl: Point::new(-74.02, 40.0),
        br: Point::new(-74.0, 40.0),
        left_via: vec![Point::new(-74.03, 40.0003), Point::new(-74.03, 40.0007)],
        permissions,
        stations: false,
    })
}

pub fn build_block(spec: BlockSpec) -> StreetBlock {
    let mut graph = Graph::new();

    let corner = |graph: &mut Graph, name: &str, point: Point<f64>| {
        (
            graph.add_vertex(Vertex::intersection(format!("{name} in"), point)),
            graph.add_vertex(Vertex::intersection(format!("{name} out"), point)),
        )
    };
    let (tl_in, tl_out) = corner(&mut graph, "tl", spec.tl);
    let (tr_in, tr_out) = corner(&mut graph, "tr", spec.tr);
    let (bl_in, bl_out) = corner(&mut graph, "bl", spec.bl);
    let (br_in, br_out) = corner(&mut graph, "br", spec.br);

    let street = |graph: &mut Graph, name: &str, line: LineString<f64>, p: Permission| {
        let forward = StreetVertex::new(line.clone(), p, false).unwrap();
        let mut reversed = line;
        reversed.0.reverse();
        let back = StreetVertex::new(reversed, p, true).unwrap();
        (
            graph.add_vertex(Vertex::street(name, forward)),
            graph.add_vertex(Vertex::street(format!("{name} back"), back)),
        )
    };

    let top_line = line_string![(x: spec.tl.x(), y: spec.tl.y()), (x: spec.tr.x(), y: spec.tr.y())];
    let bottom_line =
        line_string![(x: spec.bl.x(), y: spec.bl.y()), (x: spec.br.x(), y: spec.br.y())];
    let right_line =
        line_string![(x: spec.br.x(), y: spec.br.y()), (x: spec.tr.x(), y: spec.tr.y())];
    let mut left_points: Vec<Point<f64>> = vec![spec.bl.into()];
    left_points.extend(spec.left_via.iter().map(|p| -> Point<f64> { (*p).into() }));
    left_points.push(spec.tl.into());
    let left_line = LineString::from(left_points);

    let (top, top_back) = street(&mut graph, "top", top_line, spec.permissions.top);
    let (bottom, bottom_back) = street(&mut graph, "bottom", bottom_line, spec.permissions.bottom);
    let (left, left_back) = street(&mut graph, "left", left_line, spec.permissions.left);
    let (right, right_back) = street(&mut graph, "right", right_line, spec.permissions.right);

    // Entering the network at a corner.
    for (out, streets) in [
        (tl_out, [top, left_back]),
        (tr_out, [top_back, right_back]),
        (bl_out, [bottom, left]),
        (br_out, [bottom_back, right]),
    ] {
        for street in streets {
            graph.add_edge(Edge::free(out, street));
        }
    }

    // Leaving the network where each street ends.
    for (street, corner) in [
        (top, tr_in),
        (top_back, tl_in),
        (bottom, br_in),
        (bottom_back, bl_in),
        (left, tl_in),
        (left_back, bl_in),
        (right, tr_in),
        (right_back, br_in),
    ] {
        graph.add_edge(Edge::out(street, corner));
    }

    // Turns around the block, no U-turns.
    for (from, to) in [
        (top, right_back),
        (right_back, bottom_back),
        (bottom_back, left),
        (left, top),
        (top_back, left_back),
        (left_back, bottom),
        (bottom, right),
        (right, top_back),
    ] {
        graph.add_edge(Edge::turn(from, to));
    }

    let (station1, station2) = if spec.stations {
        let mid_x = (spec.tl.x() + spec.tr.x()) / 2.0;
        let mid_y = (spec.bl.y() + spec.tl.y()) / 2.0;
        (
            Some(graph.add_vertex(Vertex::transit_stop(
                "station 1",
                "S1",
                Point::new(mid_x, spec.tl.y() - 0.0000001),
            ))),
            Some(graph.add_vertex(Vertex::transit_stop(
                "station 2",
                "S2",
                Point::new(spec.br.x() - 0.0000001, mid_y),
            ))),
        )
    } else {
        (None, None)
    };

    StreetBlock {
        graph,
        top,
        top_back,
        bottom,
        bottom_back,
        left,
        left_back,
        right,
        right_back,
        tl_in,
        tl_out,
        tr_in,
        tr_out,
        bl_in,
        bl_out,
        br_in,
        br_out,
        station1,
        station2,
    }
}
