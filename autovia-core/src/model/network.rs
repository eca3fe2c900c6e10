//! The routable road network: graph, id map, and spatial index.

use geo::Point;
use hashbrown::HashMap;
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};
use petgraph::visit::EdgeRef;
use rstar::RTree;
use rstar::primitives::GeomWithData;

use crate::projection::LocalProjection;
use crate::{Error, NodeId};

use super::components::{RoadEdge, RoadNode};

/// Projected node coordinate stored in the spatial index, tagged with the
/// external node id and the graph index.
pub type IndexedPoint = GeomWithData<[f64; 2], (NodeId, NodeIndex)>;

/// Immutable road network shared by all routing requests.
///
/// Built once by the loading layer; no mutation is exposed afterwards,
/// so concurrent reads need no synchronization.
#[derive(Debug)]
pub struct RoadNetwork {
    pub(crate) graph: DiGraph<RoadNode, RoadEdge>,
    node_ids: HashMap<NodeId, NodeIndex>,
    rtree: RTree<IndexedPoint>,
    projection: LocalProjection,
}

impl RoadNetwork {
    pub(crate) fn new(
        graph: DiGraph<RoadNode, RoadEdge>,
        node_ids: HashMap<NodeId, NodeIndex>,
        rtree: RTree<IndexedPoint>,
        projection: LocalProjection,
    ) -> Self {
        Self {
            graph,
            node_ids,
            rtree,
            projection,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn projection(&self) -> &LocalProjection {
        &self.projection
    }

    /// Looks up a node by its external id.
    pub fn node(&self, id: NodeId) -> Option<&RoadNode> {
        self.node_ids.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Resolves an external id to the graph index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNode`] for ids absent from the graph.
    pub fn node_index(&self, id: NodeId) -> Result<NodeIndex, Error> {
        self.node_ids.get(&id).copied().ok_or(Error::InvalidNode(id))
    }

    pub(crate) fn node_weight(&self, index: NodeIndex) -> &RoadNode {
        &self.graph[index]
    }

    /// Outgoing edges of a node.
    pub fn edges(&self, node: NodeIndex) -> impl Iterator<Item = EdgeReference<'_, RoadEdge>> {
        self.graph.edges(node)
    }

    /// The best directed edge between two adjacent nodes: minimal travel
    /// time, then minimal length among parallel edges, matching the
    /// relaxation order of the routing engine.
    pub(crate) fn edge_between(&self, from: NodeIndex, to: NodeIndex) -> Option<&RoadEdge> {
        self.graph
            .edges_connecting(from, to)
            .map(|edge| edge.weight())
            .min_by(|a, b| {
                a.travel_time
                    .total_cmp(&b.travel_time)
                    .then_with(|| a.length.total_cmp(&b.length))
            })
    }

    /// Snaps a geographic coordinate to the nearest network node.
    ///
    /// Returns the exact nearest node over projected coordinates; when
    /// several nodes are equidistant the one with the lowest external id
    /// wins, so snapping is deterministic.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyIndex`] on a network with no nodes, or a
    /// projection error for coordinates outside the valid region.
    pub fn nearest_node(&self, point: &Point<f64>) -> Result<(NodeId, NodeIndex), Error> {
        let planar = self.projection.to_planar(point)?;
        let query = [planar.x, planar.y];

        let mut candidates = self.rtree.nearest_neighbor_iter_with_distance_2(&query);
        let (first, best_distance) = candidates.next().ok_or(Error::EmptyIndex)?;

        // The iterator yields by increasing distance; scan the head of it
        // for exact ties and keep the lowest id.
        let mut best = first.data;
        for (entry, distance) in candidates {
            if distance > best_distance {
                break;
            }
            if entry.data.0 < best.0 {
                best = entry.data;
            }
        }

        Ok(best)
    }
}
