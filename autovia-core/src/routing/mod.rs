//! Fastest-route search over the weighted road graph.

pub mod dijkstra;
pub mod metrics;
pub mod route;

pub use dijkstra::shortest_path;
pub use metrics::path_metrics;
pub use route::{RouteResult, route, route_one_to_many, route_with_cancel};
