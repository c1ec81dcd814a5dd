//! SSZ-style Merkleization for beacon block records
//!
//! This crate implements the hash tree root computation over structured
//! records, the mapping from field positions to generalized indices, and
//! generation/verification of Merkle inclusion proofs against those
//! indices. All operations are pure functions over immutable inputs;
//! identical inputs always produce identical roots.

pub mod encode;
pub mod error;
pub mod gindex;
pub mod hash;
pub mod proof;
pub mod tree;

pub use encode::{
    checked_bitlist, checked_byte_list, checked_list, checked_uint64_list, checked_vector,
    pack_bytes, uint64_chunk, Merkleize, Value,
};
pub use error::{Error, Result};
pub use gindex::{compose, depth, leaf_gindex, parent, sibling};
pub use hash::{hash_pair, zero_subtree_root, ZERO_CHUNK};
pub use proof::{generate_proof, join_proofs, verify_proof, Proof};
pub use tree::{merkleize, mix_in_length, Tree};

pub use beaconproof_types::{Root, ROOT_SIZE};
