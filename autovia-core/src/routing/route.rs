//! Route service: orchestration of a single fastest-route request.

use std::sync::atomic::AtomicBool;

use geo::{Coord, LineString, Point};
use geojson::{Feature, Geometry};
use rayon::prelude::*;
use serde_json::{Map, json};

use super::dijkstra::shortest_path;
use super::metrics::path_metrics;
use crate::model::RoadNetwork;
use crate::{Error, NodeId};

/// Result of a single routing request.
///
/// Owned by the request that computed it; nothing here is shared with the
/// network or with other requests.
#[derive(Debug, Clone)]
pub struct RouteResult {
    /// Path through the network, external node ids in travel order
    pub nodes: Vec<NodeId>,
    /// Total distance in meters
    pub distance: f64,
    /// Total duration in seconds
    pub duration: f64,
    /// Path geometry as geographic (lon/lat) coordinates, one per node
    pub geometry: LineString<f64>,
}

impl RouteResult {
    /// Converts the route to a `GeoJSON` Feature with distance and
    /// duration properties, rounded to one decimal.
    pub fn to_geojson(&self) -> Feature {
        let mut properties = Map::new();
        properties.insert("name".to_string(), json!("fastest_route"));
        properties.insert("distance_m".to_string(), json!(round1(self.distance)));
        properties.insert("duration_s".to_string(), json!(round1(self.duration)));

        Feature {
            bbox: None,
            geometry: Some(Geometry::new((&self.geometry).into())),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Computes the fastest driving route between two geographic coordinates.
///
/// Both coordinates are snapped to their nearest network node; the
/// returned geometry therefore starts and ends on the network, not at the
/// raw inputs. When both coordinates snap to the same node the result is
/// a degenerate single-coordinate route with zero distance and duration.
///
/// Routing over the immutable graph is deterministic, so failures are
/// never retried here.
///
/// # Errors
///
/// Returns [`Error::OutOfRegion`] for coordinates outside the network
/// coverage area, [`Error::NoPath`] when the snapped endpoints lie in
/// disconnected components, or any error from snapping and path
/// reconstruction.
pub fn route(network: &RoadNetwork, start: Point<f64>, end: Point<f64>) -> Result<RouteResult, Error> {
    route_with_cancel(network, start, end, None)
}

/// Same as [`route`], but checks a cancellation flag during the search so
/// a request-timeout layer can abort long-running queries.
pub fn route_with_cancel(
    network: &RoadNetwork,
    start: Point<f64>,
    end: Point<f64>,
    cancel: Option<&AtomicBool>,
) -> Result<RouteResult, Error> {
    for point in [&start, &end] {
        if !network.projection().in_region(point) {
            return Err(Error::OutOfRegion(point.x(), point.y()));
        }
    }

    let (_, start_index) = network.nearest_node(&start)?;
    let (_, end_index) = network.nearest_node(&end)?;

    if start_index == end_index {
        let node = network.node_weight(start_index);
        return Ok(RouteResult {
            nodes: vec![node.id],
            distance: 0.0,
            duration: 0.0,
            geometry: LineString::from(vec![node.geometry]),
        });
    }

    let path = shortest_path(network, start_index, end_index, cancel)?;
    let (distance, duration) = path_metrics(network, &path)?;

    let projection = network.projection();
    let geometry: LineString<f64> = path
        .iter()
        .map(|&index| {
            let node = network.node_weight(index);
            Coord::from(projection.to_geographic(node.projected))
        })
        .collect();

    Ok(RouteResult {
        nodes: path
            .iter()
            .map(|&index| network.node_weight(index).id)
            .collect(),
        distance,
        duration,
        geometry,
    })
}

/// Routes from one start to many ends in parallel.
///
/// Each query runs independently over the shared immutable network; the
/// result order matches `ends`.
pub fn route_one_to_many(
    network: &RoadNetwork,
    start: Point<f64>,
    ends: &[Point<f64>],
) -> Vec<Result<RouteResult, Error>> {
    ends.par_iter()
        .map(|end| route(network, start, *end))
        .collect()
}
