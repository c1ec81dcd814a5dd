//! Type-safe encoding wrappers
//!
//! This module provides the 32-byte tree node value and helpers for the
//! `0x`-prefixed hex strings the beacon API wire format uses.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Size of a tree node value in bytes
pub const ROOT_SIZE: usize = 32;

/// A 32-byte hash tree node (leaf chunk, intermediate node, or root)
///
/// This type represents a node of an SSZ-style Merkle tree with
/// compile-time size guarantees. It can be constructed from hex strings
/// and converted back; `Display` renders the `0x`-prefixed form used on
/// the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Root([u8; ROOT_SIZE]);

impl Root {
    /// The all-zero node used to pad incomplete trees
    pub const ZERO: Root = Root([0u8; ROOT_SIZE]);

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; ROOT_SIZE]) -> Self {
        Root(bytes)
    }

    /// Try to create from a byte slice
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ROOT_SIZE {
            return Err(Error::InvalidEncoding(format!(
                "root must be {} bytes, got {}",
                ROOT_SIZE,
                bytes.len()
            )));
        }
        let mut arr = [0u8; ROOT_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Root(arr))
    }

    /// Parse from a hex-encoded string, with or without a `0x` prefix
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = decode_hex(s)?;
        Self::try_from_slice(&bytes)
    }

    /// Encode as a bare hex string (lowercase, no prefix)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; ROOT_SIZE] {
        &self.0
    }

    /// Get as a byte slice
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Root {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ROOT_SIZE]> for Root {
    fn from(bytes: [u8; ROOT_SIZE]) -> Self {
        Root(bytes)
    }
}

impl TryFrom<String> for Root {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Root::from_hex(&s)
    }
}

impl From<Root> for String {
    fn from(root: Root) -> Self {
        root.to_string()
    }
}

impl std::fmt::Display for Root {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

/// Decode a hex string, tolerating a `0x` prefix and an odd digit count
///
/// The beacon API emits quantities like `0x1` with the leading zero
/// dropped; a `0` is prepended before decoding so they round-trip.
pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    let owned;
    let digits = if s.len() % 2 == 1 {
        owned = format!("0{}", s);
        &owned
    } else {
        s
    };
    hex::decode(digits).map_err(|e| Error::InvalidEncoding(format!("invalid hex: {}", e)))
}
