//! Error types for beaconproof-types

use thiserror::Error;

/// Errors that can occur in beaconproof-types
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid encoding (hex, length, etc.)
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),
}

/// Result type for beaconproof-types operations
pub type Result<T> = std::result::Result<T, Error>;
