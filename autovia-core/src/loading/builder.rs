use geo::Point;
use hashbrown::HashMap;
use itertools::Itertools;
use log::{info, warn};
use petgraph::algo::connected_components;
use petgraph::graph::DiGraph;
use rstar::RTree;

use super::config::RoadModelConfig;
use super::de::deserialize_csv_file;
use super::raw_types::{RawEdge, RawNode};
use crate::model::{IndexedPoint, RoadEdge, RoadNetwork, RoadNode};
use crate::projection::LocalProjection;
use crate::weights::{SpeedDefaults, derive_travel_time};
use crate::Error;

/// Creates a road network model based on the provided configuration.
///
/// # Errors
///
/// Returns an error if there are problems reading or validating the data.
pub fn create_road_network(config: &RoadModelConfig) -> Result<RoadNetwork, Error> {
    validate_config(config)?;

    info!("Loading road nodes: {}", config.nodes_path.display());
    let nodes: Vec<RawNode> = deserialize_csv_file(&config.nodes_path)?;

    info!("Loading road edges: {}", config.edges_path.display());
    let edges: Vec<RawEdge> = deserialize_csv_file(&config.edges_path)?;

    let network = build_road_network(nodes, edges, &config.speeds)?;

    info!(
        "Road network ready: {} nodes, {} edges",
        network.node_count(),
        network.edge_count()
    );
    // CSV deserialization allocates large intermediate buffers that are
    // not always released back to the system. This call will release all
    // free memory from the tail of the heap back to the system.
    //
    // # Safety
    //
    // This call is safe to use on linux with glibc implementation
    // which is checked by the cfg attribute in compile time.
    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    unsafe {
        if libc::malloc_trim(0) == 0 {
            log::warn!("Memory trimming failed - continuing anyway");
        } else {
            log::debug!("Successfully trimmed unused heap memory");
        }
    }
    Ok(network)
}

/// Builds the routable graph from raw node and edge records.
///
/// Validates every record: duplicate or out-of-range nodes, edges whose
/// endpoints are unknown, and non-positive lengths or negative speeds are
/// rejected with [`Error::MalformedInput`] rather than coerced. Travel
/// times are derived once here and cached on the edges.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] on invalid records,
/// [`Error::InvalidWeight`] if a derived travel time is not positive, or
/// a projection error if no valid projection can be fixed over the nodes.
pub fn build_road_network(
    nodes: Vec<RawNode>,
    edges: Vec<RawEdge>,
    speeds: &SpeedDefaults,
) -> Result<RoadNetwork, Error> {
    validate_nodes(&nodes)?;

    let geometries: Vec<Point<f64>> = nodes
        .iter()
        .map(|node| Point::new(node.lon, node.lat))
        .collect();
    let projection = LocalProjection::from_points(&geometries)?;

    let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());
    let mut node_ids = HashMap::with_capacity(nodes.len());

    for (node, geometry) in nodes.iter().zip(geometries) {
        let projected = projection.to_planar(&geometry)?;
        let index = graph.add_node(RoadNode {
            id: node.id,
            geometry,
            projected,
        });
        node_ids.insert(node.id, index);
    }

    for edge in &edges {
        let from = *node_ids
            .get(&edge.from)
            .ok_or_else(|| Error::MalformedInput(format!("edge references unknown node {}", edge.from)))?;
        let to = *node_ids
            .get(&edge.to)
            .ok_or_else(|| Error::MalformedInput(format!("edge references unknown node {}", edge.to)))?;

        validate_edge(edge)?;

        let class = (!edge.class.is_empty()).then_some(edge.class.as_str());
        let speed = speeds.effective_speed(edge.speed, class);
        let travel_time = derive_travel_time(edge.length, speed)?;

        graph.add_edge(
            from,
            to,
            RoadEdge {
                length: edge.length,
                speed,
                travel_time,
            },
        );
    }

    report_disconnected_components(&graph);

    let indexed: Vec<IndexedPoint> = graph
        .node_indices()
        .map(|index| {
            let node = &graph[index];
            IndexedPoint::new([node.projected.x, node.projected.y], (node.id, index))
        })
        .collect();
    let rtree = RTree::bulk_load(indexed);

    Ok(RoadNetwork::new(graph, node_ids, rtree, projection))
}

fn validate_config(config: &RoadModelConfig) -> Result<(), Error> {
    for path in [&config.nodes_path, &config.edges_path] {
        if !path.exists() {
            return Err(Error::MalformedInput(format!(
                "input file not found: {}",
                path.display()
            )));
        }
    }
    Ok(())
}

fn validate_nodes(nodes: &[RawNode]) -> Result<(), Error> {
    if let Some(id) = nodes.iter().map(|node| node.id).duplicates().next() {
        return Err(Error::MalformedInput(format!("duplicate node id {id}")));
    }

    for node in nodes {
        let (lon, lat) = (node.lon, node.lat);
        if !lon.is_finite() || !lat.is_finite() || lon.abs() > 180.0 || lat.abs() > 90.0 {
            return Err(Error::MalformedInput(format!(
                "node {} has invalid coordinates ({lon}, {lat})",
                node.id
            )));
        }
    }
    Ok(())
}

fn validate_edge(edge: &RawEdge) -> Result<(), Error> {
    if !edge.length.is_finite() || edge.length <= 0.0 {
        return Err(Error::MalformedInput(format!(
            "edge {} -> {} has invalid length {}",
            edge.from, edge.to, edge.length
        )));
    }
    if let Some(speed) = edge.speed {
        if !speed.is_finite() || speed < 0.0 {
            return Err(Error::MalformedInput(format!(
                "edge {} -> {} has invalid speed {speed}",
                edge.from, edge.to
            )));
        }
    }
    Ok(())
}

/// Disconnected clusters are kept in the graph - routing between them
/// surfaces as a no-path error instead of a silently shrunken network.
fn report_disconnected_components(graph: &DiGraph<RoadNode, RoadEdge>) {
    if graph.node_count() == 0 {
        warn!("Road network has no nodes - every snap query will fail");
        return;
    }

    let components = connected_components(graph);
    if components > 1 {
        warn!(
            "Road network has {components} disconnected components; routes \
            between them will fail with a no-path error"
        );
    }
}
