//! Record-level trees and the execution payload proofs
//!
//! Mirrors of the two records as fully materialized trees: the body tree
//! over its ten field roots and the payload tree over its fourteen,
//! both reserving sixteen leaves. Proofs for the payload within the body
//! and for the block hash within the payload come straight off these
//! trees; chained together they prove the block hash against the body
//! root.

use crate::block::{BeaconBlockBody, ExecutionPayload};
use crate::error::Result;
use beaconproof_merkle::{join_proofs, leaf_gindex, Proof, Root, Tree};

/// Leaves reserved for the block body's fields
pub const BODY_TREE_CAPACITY: u64 = 16;
/// Leaves reserved for the execution payload's fields
pub const PAYLOAD_TREE_CAPACITY: u64 = 16;
/// Field position of the execution payload within the body
pub const EXECUTION_PAYLOAD_INDEX: u64 = 9;
/// Field position of the block hash within the payload
pub const BLOCK_HASH_INDEX: u64 = 12;

/// Generalized index of the payload's block hash within the body tree
pub const BLOCK_HASH_BODY_GINDEX: u64 =
    (BODY_TREE_CAPACITY + EXECUTION_PAYLOAD_INDEX) * PAYLOAD_TREE_CAPACITY + BLOCK_HASH_INDEX;

/// The block body's field roots as an addressable tree
pub struct BeaconBlockBodyTree {
    tree: Tree,
}

impl BeaconBlockBodyTree {
    /// Encode the body's fields and build the sixteen-leaf tree
    pub fn new(body: &BeaconBlockBody) -> Result<Self> {
        let chunks = body.field_roots()?;
        Ok(Self {
            tree: Tree::from_chunks(&chunks, BODY_TREE_CAPACITY)?,
        })
    }

    /// The body's hash tree root
    pub fn root(&self) -> Root {
        self.tree.root()
    }

    /// Prove the field at `position` against the body root
    pub fn field_proof(&self, position: u64) -> Result<Proof> {
        let index = leaf_gindex(BODY_TREE_CAPACITY, position)?;
        Ok(self.tree.prove(index)?)
    }

    /// Prove the execution payload's root against the body root
    pub fn execution_payload_proof(&self) -> Result<Proof> {
        self.field_proof(EXECUTION_PAYLOAD_INDEX)
    }
}

/// The execution payload's field roots as an addressable tree
pub struct ExecutionPayloadTree {
    tree: Tree,
}

impl ExecutionPayloadTree {
    /// Encode the payload's fields and build the sixteen-leaf tree
    pub fn new(payload: &ExecutionPayload) -> Result<Self> {
        let chunks = payload.field_roots()?;
        Ok(Self {
            tree: Tree::from_chunks(&chunks, PAYLOAD_TREE_CAPACITY)?,
        })
    }

    /// The payload's hash tree root
    pub fn root(&self) -> Root {
        self.tree.root()
    }

    /// Prove the field at `position` against the payload root
    pub fn field_proof(&self, position: u64) -> Result<Proof> {
        let index = leaf_gindex(PAYLOAD_TREE_CAPACITY, position)?;
        Ok(self.tree.prove(index)?)
    }

    /// Prove the block hash against the payload root
    pub fn block_hash_proof(&self) -> Result<Proof> {
        self.field_proof(BLOCK_HASH_INDEX)
    }
}

/// Prove the payload's block hash directly against the body root
///
/// Builds both trees and chains the two proofs; the result's generalized
/// index is [`BLOCK_HASH_BODY_GINDEX`].
pub fn block_hash_proof_in_body(body: &BeaconBlockBody) -> Result<Proof> {
    let body_tree = BeaconBlockBodyTree::new(body)?;
    let payload_tree = ExecutionPayloadTree::new(&body.execution_payload)?;
    let outer = body_tree.execution_payload_proof()?;
    let inner = payload_tree.block_hash_proof()?;
    Ok(join_proofs(&outer, &inner)?)
}
