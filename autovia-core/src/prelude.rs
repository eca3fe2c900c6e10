// Re-export key components
pub use crate::error::Error;
pub use crate::loading::{RawEdge, RawNode, RoadModelConfig, build_road_network, create_road_network};
pub use crate::model::{RoadEdge, RoadNetwork, RoadNode};
pub use crate::projection::LocalProjection;
pub use crate::routing::{RouteResult, route, route_one_to_many, route_with_cancel};
pub use crate::weights::{DEFAULT_SPEED_KPH, SpeedDefaults};

// Core identifier type for the road network
pub use crate::NodeId;
