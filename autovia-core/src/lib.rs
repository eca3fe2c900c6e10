//! Core routing engine for the autovia driving router.
//!
//! Builds an in-memory road graph from node/edge tables, derives
//! travel-time weights from segment length and free-flow speed, snaps
//! geographic coordinates to the nearest graph node through a spatial
//! index over locally projected coordinates, and answers fastest-route
//! queries with Dijkstra's algorithm.
//!
//! The graph is built once at startup and is immutable afterwards, so a
//! single [`RoadNetwork`] can be shared by any number of concurrent
//! request handlers without locking.

pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod projection;
pub mod routing;
pub mod weights;

pub use error::Error;
pub use loading::{RoadModelConfig, create_road_network};
pub use model::RoadNetwork;
pub use routing::{RouteResult, route};

/// External identifier of a road node, as assigned by the map data source.
pub type NodeId = i64;
