//! Road network components - nodes and edges

use geo::{Coord, Point};

use crate::NodeId;

/// Road graph node
#[derive(Debug, Clone)]
pub struct RoadNode {
    /// External id of the node from the map data source
    pub id: NodeId,
    /// Geographic coordinates (lon/lat, WGS84)
    pub geometry: Point<f64>,
    /// Projected planar coordinates in meters, cached at build time
    pub projected: Coord<f64>,
}

/// Road graph edge (directed street segment)
#[derive(Debug, Clone)]
pub struct RoadEdge {
    /// Segment length in meters
    pub length: f64,
    /// Effective free-flow speed in km/h
    pub speed: f64,
    /// Travel time in seconds, derived from length and speed at build
    /// time and used as the routing weight
    pub travel_time: f64,
}
