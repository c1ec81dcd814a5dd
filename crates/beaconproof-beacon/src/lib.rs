//! Beacon chain block records and execution payload proofs
//!
//! This crate carries the fixed Bellatrix block body schema, the HTTP
//! client that fetches blocks from a beacon node, the wire-to-binary
//! conversion layer, and the record-level trees that serve inclusion
//! proofs for the execution payload and its block hash.

pub mod block;
pub mod client;
pub mod error;
pub mod tree;
pub mod wire;

pub use block::{
    Attestation, AttestationData, AttesterSlashing, BeaconBlockBody, BeaconBlockHeader,
    Checkpoint, Deposit, DepositData, Eth1Data, ExecutionPayload, IndexedAttestation,
    ProposerSlashing, SignedBeaconBlockHeader, SignedVoluntaryExit, SyncAggregate, VoluntaryExit,
};
pub use client::{BeaconClient, DEFAULT_ENDPOINT};
pub use error::{Error, Result};
pub use tree::{
    block_hash_proof_in_body, BeaconBlockBodyTree, ExecutionPayloadTree, BLOCK_HASH_BODY_GINDEX,
    BLOCK_HASH_INDEX, BODY_TREE_CAPACITY, EXECUTION_PAYLOAD_INDEX, PAYLOAD_TREE_CAPACITY,
};
pub use wire::BlockResponse;
