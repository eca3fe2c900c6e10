use std::sync::Arc;

use autovia_core::RoadNetwork;

/// Shared handler state: the immutable road network, built once before
/// the listener starts. Handlers only read it, so no locking is needed.
#[derive(Clone)]
pub struct AppState {
    pub network: Arc<RoadNetwork>,
}
