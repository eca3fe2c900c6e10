//! This module is responsible for loading road-network data from node and
//! edge tables and building the routable model.

mod builder;
mod config;
mod de;
mod raw_types;

pub use builder::{build_road_network, create_road_network};
pub use config::RoadModelConfig;
pub use raw_types::{RawEdge, RawNode};
