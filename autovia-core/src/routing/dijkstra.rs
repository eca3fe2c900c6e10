use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::{cmp::Ordering, collections::BinaryHeap};

use hashbrown::HashMap;
use petgraph::{graph::NodeIndex, visit::EdgeRef};

use crate::Error;
use crate::model::RoadNetwork;

#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    dist: f64,
    node: NodeIndex,
}

impl Eq for State {}

// Implement Ord for State to use in BinaryHeap
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by travel time, then distance, then node index
        // (reversed from standard Rust BinaryHeap)
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.dist.total_cmp(&self.dist))
            .then_with(|| other.node.index().cmp(&self.node.index()))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Label assigned to a reached node: travel time and distance from start.
#[derive(Copy, Clone)]
struct Label {
    cost: f64,
    dist: f64,
}

/// Dijkstra's algorithm over travel-time edge weights.
///
/// Weights are non-negative by construction, so a plain label-setting
/// search suffices. Equal-cost paths resolve deterministically: lower
/// total distance wins, then the lexicographically smaller node-id
/// sequence (realized as preferring the predecessor with the lower
/// external id).
///
/// The search stops as soon as the target is settled. A caller running
/// under a request timeout may pass a cancellation flag; it is checked
/// once per settled node.
///
/// # Errors
///
/// Returns [`Error::NoPath`] when the target is unreachable from the
/// start, or [`Error::Cancelled`] when the flag was raised mid-search.
pub fn shortest_path(
    network: &RoadNetwork,
    start: NodeIndex,
    target: NodeIndex,
    cancel: Option<&AtomicBool>,
) -> Result<Vec<NodeIndex>, Error> {
    if start == target {
        return Ok(vec![start]);
    }

    // Estimate capacity based on graph size (adjust as needed)
    let estimated_nodes = network.node_count().min(1000);
    let mut labels: HashMap<NodeIndex, Label> = HashMap::with_capacity(estimated_nodes);
    let mut predecessors: HashMap<NodeIndex, NodeIndex> = HashMap::with_capacity(estimated_nodes);
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);

    // Start node has distance 0
    heap.push(State {
        cost: 0.0,
        dist: 0.0,
        node: start,
    });
    labels.insert(start, Label { cost: 0.0, dist: 0.0 });

    while let Some(State { cost, dist, node }) = heap.pop() {
        if let Some(flag) = cancel {
            if flag.load(AtomicOrdering::Relaxed) {
                return Err(Error::Cancelled);
            }
        }

        // Check if we've reached the target
        if node == target {
            break;
        }

        // Skip if we've found a better path
        if let Some(label) = labels.get(&node) {
            if cost > label.cost || (cost == label.cost && dist > label.dist) {
                continue;
            }
        }

        // Examine neighbors
        for edge in network.edges(node) {
            let next = edge.target();
            let weight = edge.weight();
            let next_cost = cost + weight.travel_time;
            let next_dist = dist + weight.length;

            let improves = match labels.get(&next) {
                None => true,
                Some(best) => {
                    next_cost < best.cost
                        || (next_cost == best.cost
                            && (next_dist < best.dist
                                || (next_dist == best.dist
                                    && prefers_predecessor(network, &predecessors, next, node))))
                }
            };

            if improves {
                labels.insert(
                    next,
                    Label {
                        cost: next_cost,
                        dist: next_dist,
                    },
                );
                predecessors.insert(next, node);
                heap.push(State {
                    cost: next_cost,
                    dist: next_dist,
                    node: next,
                });
            }
        }
    }

    if !labels.contains_key(&target) {
        return Err(no_path(network, start, target));
    }

    // Follow predecessors backward from target to start
    let mut path = vec![target];
    let mut current = target;
    while current != start {
        match predecessors.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => return Err(no_path(network, start, target)),
        }
    }
    path.reverse();

    Ok(path)
}

/// On a full (time, distance) tie, the candidate predecessor wins only if
/// its external id is lower than the recorded one.
fn prefers_predecessor(
    network: &RoadNetwork,
    predecessors: &HashMap<NodeIndex, NodeIndex>,
    next: NodeIndex,
    candidate: NodeIndex,
) -> bool {
    match predecessors.get(&next) {
        Some(&current) => network.node_weight(candidate).id < network.node_weight(current).id,
        None => true,
    }
}

fn no_path(network: &RoadNetwork, start: NodeIndex, target: NodeIndex) -> Error {
    Error::NoPath {
        from: network.node_weight(start).id,
        to: network.node_weight(target).id,
    }
}
