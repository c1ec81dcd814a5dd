//! Error types for beaconproof-merkle

use thiserror::Error;

/// Errors that can occur in Merkleization and proof operations
#[derive(Error, Debug)]
pub enum Error {
    /// A fixed-size field's byte length disagrees with the schema
    #[error("incorrect byte length for {field}: expected {expected}, got {actual}")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// A bounded list exceeds its declared maximum element count
    #[error("list {field} exceeds limit {limit}: got {actual} elements")]
    ListTooLong {
        field: String,
        limit: u64,
        actual: u64,
    },

    /// More chunks than the tree capacity reserved for them
    #[error("invalid chunk count: {actual} chunks exceed capacity {capacity}")]
    InvalidChunkCount { capacity: u64, actual: u64 },

    /// A generalized index that does not address a node of the tree
    #[error("generalized index {index} out of range for tree with {size} nodes")]
    IndexOutOfRange { index: u64, size: u64 },

    /// A proof whose hash count disagrees with the target index depth
    #[error("proof length mismatch: expected {expected} hashes, got {actual}")]
    ProofLengthMismatch { expected: usize, actual: usize },

    /// Stacked proofs that do not chain to a common node
    #[error("root mismatch: inner proof resolves to {computed}, outer leaf is {expected}")]
    RootMismatch { expected: String, computed: String },

    /// A bitlist without the trailing delimiter bit
    #[error("malformed bitlist: missing delimiter bit")]
    MalformedBitlist,
}

/// Result type for Merkleization operations
pub type Result<T> = std::result::Result<T, Error>;
