//! Core types for beaconproof
//!
//! This crate provides the fundamental data structures shared by the
//! Merkle tree engine and the beacon chain client: the 32-byte node
//! value and hex wire-encoding helpers.

pub mod encoding;
pub mod error;

pub use encoding::{decode_hex, Root, ROOT_SIZE};
pub use error::{Error, Result};
