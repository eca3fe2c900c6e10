use serde::Deserialize;

use crate::NodeId;

/// A node record as it appears in the input table.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNode {
    pub id: NodeId,
    pub lon: f64,
    pub lat: f64,
}

/// A directed edge record as it appears in the input table.
///
/// One-way streets are represented by the absence of the reverse record;
/// a two-way street contributes two records with independent attributes.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEdge {
    pub from: NodeId,
    pub to: NodeId,
    /// Segment length in meters
    pub length: f64,
    /// Free-flow speed in km/h; empty or zero means unknown
    #[serde(default)]
    pub speed: Option<f64>,
    /// Road classification (OSM highway taxonomy); empty means unknown
    #[serde(default)]
    pub class: String,
}

impl RawEdge {
    pub fn new(from: NodeId, to: NodeId, length: f64) -> Self {
        Self {
            from,
            to,
            length,
            speed: None,
            class: String::new(),
        }
    }

    #[must_use]
    pub fn with_speed(mut self, speed_kph: f64) -> Self {
        self.speed = Some(speed_kph);
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.class = class.to_string();
        self
    }
}
