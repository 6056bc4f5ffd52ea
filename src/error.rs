//! Error type shared by the visualizer core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisualizerError {
    /// The recommendation payload is missing fields the projector relies on
    #[error("malformed recommendation payload: {0}")]
    MalformedPayload(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The network request for recommendations did not produce a body
    #[error("failed to fetch recommendations: {0}")]
    Fetch(String),

    #[error("invalid cutoff {0:?}: expected a non-negative whole number or \"all\"")]
    InvalidCutoff(String),

    #[error("garment {garment} is not part of basic {basic}")]
    UnknownGarment { basic: String, garment: String },

    #[error("unreadable history entry: {0}")]
    History(String),
}

pub type Result<T> = std::result::Result<T, VisualizerError>;
