use petgraph::graph::NodeIndex;

use crate::Error;
use crate::model::RoadNetwork;

/// Sums length and travel time along consecutive node pairs of a path.
///
/// Returns `(distance_m, duration_s)`. A single-node path sums to zero.
///
/// # Errors
///
/// Returns [`Error::DisconnectedPath`] if any consecutive pair has no
/// connecting edge - a guard against a path that did not come from the
/// routing engine, or a graph that changed underneath it.
pub fn path_metrics(network: &RoadNetwork, path: &[NodeIndex]) -> Result<(f64, f64), Error> {
    let mut distance = 0.0;
    let mut duration = 0.0;

    for pair in path.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let edge = network.edge_between(from, to).ok_or_else(|| {
            Error::DisconnectedPath(network.node_weight(from).id, network.node_weight(to).id)
        })?;
        distance += edge.length;
        duration += edge.travel_time;
    }

    Ok((distance, duration))
}
