//! End-to-end tests of the route service over a small hand-built network.

use geo::{Distance, Haversine, Point};

use autovia_core::Error;
use autovia_core::loading::{RawEdge, RawNode, build_road_network};
use autovia_core::model::RoadNetwork;
use autovia_core::routing::{route, route_one_to_many};
use autovia_core::weights::SpeedDefaults;

fn node(id: i64, lon: f64, lat: f64) -> RawNode {
    RawNode { id, lon, lat }
}

/// Diamond network around central London: A(1) -> D(4) via B(2) or C(3).
/// The C arm is shorter and equally fast per edge, so A-C-D wins on time.
fn diamond() -> RoadNetwork {
    let nodes = vec![
        node(1, -0.1180, 51.5090),
        node(2, -0.1170, 51.5095),
        node(3, -0.1185, 51.5098),
        node(4, -0.1175, 51.5105),
    ];
    let edges = vec![
        RawEdge::new(1, 2, 100.0).with_speed(36.0),
        RawEdge::new(2, 4, 200.0).with_speed(36.0),
        RawEdge::new(1, 3, 50.0).with_speed(18.0),
        RawEdge::new(3, 4, 50.0).with_speed(18.0),
    ];
    build_road_network(nodes, edges, &SpeedDefaults::default()).unwrap()
}

#[test]
fn fastest_route_with_metrics_and_geometry() {
    let network = diamond();
    let start = Point::new(-0.1181, 51.5089);
    let end = Point::new(-0.1174, 51.5106);

    let result = route(&network, start, end).unwrap();

    assert_eq!(result.nodes, vec![1, 3, 4]);
    assert!((result.distance - 100.0).abs() < 1e-9);
    assert!((result.duration - 20.0).abs() < 1e-9);
    assert_eq!(result.geometry.0.len(), 3);
}

#[test]
fn route_snaps_endpoints_to_nearest_nodes() {
    let network = diamond();
    // Offset inputs that are clearly nearest to nodes 1 and 4
    let start = Point::new(-0.11803, 51.50898);
    let end = Point::new(-0.11748, 51.51052);

    let result = route(&network, start, end).unwrap();

    let first = Point::from(result.geometry.0[0]);
    let last = Point::from(*result.geometry.0.last().unwrap());
    let node_a = network.node(1).unwrap().geometry;
    let node_d = network.node(4).unwrap().geometry;

    // Endpoints are the snapped node coordinates, not the raw inputs
    assert!(Haversine.distance(first, node_a) < 1.0);
    assert!(Haversine.distance(last, node_d) < 1.0);
    assert!(Haversine.distance(first, start) > 1.0);
}

#[test]
fn route_is_deterministic() {
    let network = diamond();
    let start = Point::new(-0.1181, 51.5089);
    let end = Point::new(-0.1174, 51.5106);

    let a = route(&network, start, end).unwrap();
    let b = route(&network, start, end).unwrap();

    assert_eq!(a.nodes, b.nodes);
    assert_eq!(a.distance, b.distance);
    assert_eq!(a.duration, b.duration);
    assert_eq!(a.geometry, b.geometry);
}

#[test]
fn same_snap_node_yields_degenerate_route() {
    let network = diamond();
    // Both inputs sit on top of node 1
    let start = Point::new(-0.11800, 51.50900);
    let end = Point::new(-0.11801, 51.50901);

    let result = route(&network, start, end).unwrap();

    assert_eq!(result.nodes, vec![1]);
    assert_eq!(result.distance, 0.0);
    assert_eq!(result.duration, 0.0);
    assert_eq!(result.geometry.0.len(), 1);
}

#[test]
fn disconnected_clusters_fail_with_no_path() {
    let nodes = vec![
        node(1, -0.1180, 51.5090),
        node(2, -0.1170, 51.5095),
        node(3, -0.1000, 51.5200),
        node(4, -0.0990, 51.5205),
    ];
    let edges = vec![RawEdge::new(1, 2, 100.0), RawEdge::new(3, 4, 100.0)];
    let network = build_road_network(nodes, edges, &SpeedDefaults::default()).unwrap();

    let err = route(
        &network,
        Point::new(-0.1180, 51.5090),
        Point::new(-0.0990, 51.5205),
    )
    .unwrap_err();

    assert!(matches!(err, Error::NoPath { .. }));
    assert_eq!(err.kind(), "no_path");
}

#[test]
fn coordinates_far_from_coverage_are_rejected() {
    let network = diamond();

    let err = route(
        &network,
        Point::new(2.3522, 48.8566), // Paris, far outside a London block
        Point::new(-0.1174, 51.5106),
    )
    .unwrap_err();

    assert!(matches!(err, Error::OutOfRegion(_, _)));
    assert_eq!(err.kind(), "out_of_region");
}

#[test]
fn longer_edge_never_shortens_a_route() {
    let build = |bc_length: f64| {
        let nodes = vec![
            node(1, -0.1180, 51.5090),
            node(2, -0.1170, 51.5095),
            node(3, -0.1160, 51.5100),
        ];
        let edges = vec![
            RawEdge::new(1, 2, 100.0).with_speed(36.0),
            RawEdge::new(2, 3, bc_length).with_speed(36.0),
        ];
        build_road_network(nodes, edges, &SpeedDefaults::default()).unwrap()
    };

    let start = Point::new(-0.1180, 51.5090);
    let end = Point::new(-0.1160, 51.5100);

    let short = route(&build(200.0), start, end).unwrap();
    let long = route(&build(250.0), start, end).unwrap();

    assert!(long.duration > short.duration);
    assert!(long.distance > short.distance);
}

#[test]
fn geojson_feature_carries_rounded_metrics() {
    let network = diamond();
    let result = route(
        &network,
        Point::new(-0.1181, 51.5089),
        Point::new(-0.1174, 51.5106),
    )
    .unwrap();

    let feature = result.to_geojson();
    let properties = feature.properties.unwrap();
    assert_eq!(properties["distance_m"], 100.0);
    assert_eq!(properties["duration_s"], 20.0);
    assert_eq!(properties["name"], "fastest_route");
    assert!(feature.geometry.is_some());
}

#[test]
fn one_to_many_matches_individual_routes() {
    let network = diamond();
    let start = Point::new(-0.1181, 51.5089);
    let ends = vec![
        Point::new(-0.1174, 51.5106),
        Point::new(-0.1170, 51.5095),
        Point::new(2.3522, 48.8566), // out of region
    ];

    let results = route_one_to_many(&network, start, &ends);
    assert_eq!(results.len(), 3);

    let single = route(&network, start, ends[0]).unwrap();
    let many = results[0].as_ref().unwrap();
    assert_eq!(many.nodes, single.nodes);
    assert_eq!(many.duration, single.duration);

    assert!(results[1].is_ok());
    assert_eq!(results[2].as_ref().unwrap_err().kind(), "out_of_region");
}
