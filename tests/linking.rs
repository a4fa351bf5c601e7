mod common;

use geo::Point;
use strada::{EdgeKind, StreetIndex, create_linkage};

use common::{BlockPermissions, square_block};

#[test]
fn linking_adds_three_vertices_per_stop() {
    let mut block = square_block(BlockPermissions::default(), true);
    let before = block.graph.vertex_count();

    let added = create_linkage(&mut block.graph).unwrap();

    // Two stops, each with a main location and one side per direction.
    assert_eq!(added, 6);
    assert_eq!(block.graph.vertex_count(), before + 6);
}

#[test]
fn linked_stops_connect_to_both_directions() {
    let mut block = square_block(BlockPermissions::default(), true);
    create_linkage(&mut block.graph).unwrap();

    for station in [block.station1.unwrap(), block.station2.unwrap()] {
        let outgoing: Vec<_> = block.graph.outgoing(station).collect();
        assert_eq!(outgoing.len(), 2);
        for edge in &outgoing {
            assert!(matches!(edge.kind, EdgeKind::Free));
            assert!(block.graph.vertex(edge.to).as_location().is_some());
        }
        assert_eq!(block.graph.incoming(station).count(), 2);
    }

    // Station 1 hangs off the top street: its side locations sit on it.
    let station1 = block.station1.unwrap();
    for edge in block.graph.outgoing(station1) {
        let location = block.graph.vertex(edge.to).as_location().unwrap();
        assert!((location.coordinate.y() - 40.01).abs() < 1e-9);
    }
}

#[test]
fn linking_is_idempotent() {
    let mut block = square_block(BlockPermissions::default(), true);
    assert_eq!(create_linkage(&mut block.graph).unwrap(), 6);
    assert_eq!(create_linkage(&mut block.graph).unwrap(), 0);
}

#[test]
fn stop_radius_queries_come_back_closest_first() {
    let mut block = square_block(BlockPermissions::default(), true);
    create_linkage(&mut block.graph).unwrap();
    let index = StreetIndex::new(&block.graph);

    let near_top = Point::new(-74.005, 40.0099);
    let stops = index.nearby_stops(near_top, 100.0);
    assert_eq!(stops, vec![block.station1.unwrap()]);

    assert!(index.nearby_stops(Point::new(-74.005, 40.005), 50.0).is_empty());
    let both = index.nearby_stops(Point::new(-74.004, 40.009), 2000.0);
    assert_eq!(both.len(), 2);
    assert_eq!(both[0], block.station1.unwrap());
}
