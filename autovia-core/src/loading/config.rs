use std::path::PathBuf;

use crate::weights::SpeedDefaults;

/// Configuration for building a road network model.
#[derive(Debug, Clone)]
pub struct RoadModelConfig {
    /// CSV table of nodes: `id,lon,lat`
    pub nodes_path: PathBuf,
    /// CSV table of directed edges: `from,to,length,speed,class`
    pub edges_path: PathBuf,
    /// Fallback speeds for edges without a usable speed value
    pub speeds: SpeedDefaults,
}

impl RoadModelConfig {
    pub fn new(nodes_path: impl Into<PathBuf>, edges_path: impl Into<PathBuf>) -> Self {
        Self {
            nodes_path: nodes_path.into(),
            edges_path: edges_path.into(),
            speeds: SpeedDefaults::default(),
        }
    }
}
