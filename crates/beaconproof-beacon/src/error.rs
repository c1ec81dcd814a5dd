//! Error types for beaconproof-beacon

use thiserror::Error;

/// Errors that can occur in beacon block operations
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(String),

    /// API error
    #[error("API error: {0}")]
    Api(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wire value that cannot be converted to its binary form
    #[error("wire format error: {0}")]
    Wire(String),

    /// Merkleization or proof error
    #[error("Merkleization error: {0}")]
    Merkle(#[from] beaconproof_merkle::Error),
}

/// Result type for beacon block operations
pub type Result<T> = std::result::Result<T, Error>;
