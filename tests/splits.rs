mod common;

use geo::{Point, line_string};
use strada::{
    DEFAULT_WALK_SPEED, EdgeKind, Error, Overlay, Permission, StreetIndex, StreetVertex,
    TraverseOptions, shortest_path_tree, split_streets,
};

use common::{BlockPermissions, square_block};

#[test]
fn split_halves_cover_the_whole_street() {
    let block = square_block(BlockPermissions::default(), false);
    let mut overlay = Overlay::new(&block.graph);

    let split = split_streets(
        &mut overlay,
        "probe",
        Point::new(-74.0, 40.006),
        &[block.right, block.right_back],
    )
    .unwrap();
    assert_eq!(split.direction_locations.len(), 2);

    let length = block.graph.vertex(block.right).as_street().unwrap().length;
    for (&side, street) in split
        .direction_locations
        .iter()
        .zip([block.right, block.right_back])
    {
        let heads: Vec<f64> = overlay
            .edges()
            .iter()
            .filter(|e| e.from == street && e.to == side)
            .map(|e| match &e.kind {
                EdgeKind::Partial(p) => p.length,
                _ => panic!("street-to-side edge should be partial"),
            })
            .collect();
        assert_eq!(heads.len(), 1);
        let tails: Vec<f64> = overlay
            .edges()
            .iter()
            .filter(|e| e.from == side)
            .filter_map(|e| match &e.kind {
                EdgeKind::Partial(p) => Some(p.length),
                _ => None,
            })
            .collect();
        assert!(!tails.is_empty());
        for &tail in &tails {
            assert!(
                (heads[0] + tail - length).abs() < 1e-6,
                "head {} + tail {tail} should cover {length}",
                heads[0]
            );
        }
    }
}

#[test]
fn identical_split_reuses_side_locations() {
    let block = square_block(BlockPermissions::default(), false);
    let mut overlay = Overlay::new(&block.graph);
    let point = Point::new(-74.0, 40.004);
    let directions = [block.right, block.right_back];

    let first = split_streets(&mut overlay, "a", point, &directions).unwrap();
    let before = overlay.extra_vertex_count();
    let second = split_streets(&mut overlay, "b", point, &directions).unwrap();

    // Only the new main location is added; both sides are shared.
    assert_eq!(overlay.extra_vertex_count(), before + 1);
    assert_eq!(first.direction_locations, second.direction_locations);

    let mut pairs: Vec<_> = overlay.edges().iter().map(|e| (e.from, e.to)).collect();
    pairs.sort();
    let total = pairs.len();
    pairs.dedup();
    assert_eq!(pairs.len(), total, "duplicate edge pair in overlay");
}

#[test]
fn neighbouring_splits_are_chained_along_the_street() {
    let block = square_block(BlockPermissions::default(), false);
    let mut overlay = Overlay::new(&block.graph);
    let directions = [block.right, block.right_back];

    let lower = split_streets(&mut overlay, "lower", Point::new(-74.0, 40.004), &directions)
        .unwrap();
    let upper = split_streets(&mut overlay, "upper", Point::new(-74.0, 40.008), &directions)
        .unwrap();

    let options = TraverseOptions::default();
    let spt = shortest_path_tree(overlay.view(), lower.location, upper.location, 0.0, &options);
    let best = spt.best_state(upper.location).expect("reachable along the street");

    let length = block.graph.vertex(block.right).as_street().unwrap().length;
    let expected = 0.4 * length / DEFAULT_WALK_SPEED;
    assert!(
        (best.weight - expected).abs() < 1e-6 * expected,
        "weight {} should be the stretch between the splits ({expected})",
        best.weight
    );

    let path = spt.get_path(upper.location, true).unwrap();
    for street in [
        block.top,
        block.top_back,
        block.bottom,
        block.bottom_back,
        block.left,
        block.left_back,
    ] {
        assert!(!path.contains_vertex(street));
    }
}

#[test]
fn splitting_without_directions_is_invalid_data() {
    let block = square_block(BlockPermissions::default(), false);
    let mut overlay = Overlay::new(&block.graph);
    let result = split_streets(&mut overlay, "probe", Point::new(-74.0, 40.006), &[]);
    assert!(matches!(result, Err(Error::InvalidData(_))));
    assert_eq!(overlay.extra_vertex_count(), 0);
}

#[test]
fn coincident_geometry_is_rejected() {
    let line = line_string![(x: -74.0, y: 40.0), (x: -74.0, y: 40.0)];
    assert!(matches!(
        StreetVertex::new(line, Permission::ALL, false),
        Err(Error::DegenerateGeometry)
    ));
}

#[test]
fn snapping_skips_streets_the_mode_cannot_use() {
    let block = square_block(
        BlockPermissions {
            right: Permission::CAR,
            ..BlockPermissions::default()
        },
        false,
    );
    let index = StreetIndex::new(&block.graph);
    let query = Point::new(-74.0001, 40.004);

    // The only street in walking snap range is for cars.
    let mut overlay = Overlay::new(&block.graph);
    let options = TraverseOptions::default();
    assert!(index.nearest_vertex(&mut overlay, query, &options).unwrap().is_none());
    assert_eq!(overlay.extra_vertex_count(), 0);

    // A wider snap radius reaches the walkable bottom street instead.
    let far = TraverseOptions {
        max_snap_distance: 2000.0,
        ..TraverseOptions::default()
    };
    let location = index
        .nearest_vertex(&mut overlay, query, &far)
        .unwrap()
        .expect("bottom street in range");
    let point = overlay.view().vertex(location).coordinate();
    assert!((point.y() - 40.0).abs() < 1e-9);
    assert!((point.x() - query.x()).abs() < 1e-9);
}

#[test]
fn snapping_near_a_stop_wires_it_to_the_split() {
    let block = square_block(BlockPermissions::default(), true);
    let station = block.station1.unwrap();
    let index = StreetIndex::new(&block.graph);

    let mut overlay = Overlay::new(&block.graph);
    let options = TraverseOptions::default();
    let location = index
        .nearest_vertex(&mut overlay, Point::new(-74.00495, 40.00999), &options)
        .unwrap()
        .expect("top street in range");

    let connects = |from, to| {
        overlay
            .edges()
            .iter()
            .any(|e| e.from == from && e.to == to && matches!(e.kind, EdgeKind::Free))
    };
    assert!(connects(location, station));
    assert!(connects(station, location));
}
