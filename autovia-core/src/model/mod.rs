//! Road network model
//!
//! Contains the in-memory graph representation used for routing: nodes
//! with geographic and projected coordinates, directed edges with derived
//! travel-time weights, and the spatial index for nearest-node snapping.

pub mod components;
pub mod network;

pub use components::{RoadEdge, RoadNode};
pub use network::{IndexedPoint, RoadNetwork};
