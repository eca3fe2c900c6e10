use thiserror::Error;

use crate::NodeId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed input data: {0}")]
    MalformedInput(String),
    #[error("Derived edge weight is not positive: {0}")]
    InvalidWeight(String),
    #[error("Projection error: {0}")]
    Projection(String),
    #[error("Coordinate ({0:.5}, {1:.5}) is outside the network coverage area")]
    OutOfRegion(f64, f64),
    #[error("Spatial index is empty")]
    EmptyIndex,
    #[error("Unknown node id {0}")]
    InvalidNode(NodeId),
    #[error("No drivable path from node {from} to node {to}")]
    NoPath { from: NodeId, to: NodeId },
    #[error("Path has no edge between consecutive nodes {0} and {1}")]
    DisconnectedPath(NodeId, NodeId),
    #[error("Routing was cancelled")]
    Cancelled,
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl Error {
    /// Stable machine-readable tag for the failure, used by transport
    /// layers to map errors onto status codes.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MalformedInput(_) => "malformed_input",
            Error::InvalidWeight(_) => "invalid_weight",
            Error::Projection(_) => "projection",
            Error::OutOfRegion(_, _) => "out_of_region",
            Error::EmptyIndex => "empty_index",
            Error::InvalidNode(_) => "invalid_node",
            Error::NoPath { .. } => "no_path",
            Error::DisconnectedPath(_, _) => "disconnected_path",
            Error::Cancelled => "cancelled",
            Error::IoError(_) => "io",
            Error::CsvError(_) => "csv",
        }
    }
}
