//! Bellatrix beacon block body records
//!
//! The fixed two-level schema: the outer block body and its nested
//! execution payload, plus the element records of the body's bounded
//! lists. Each record knows how to describe itself to the chunk encoder;
//! roots come out of `Merkleize::hash_tree_root`.

use beaconproof_merkle::{
    checked_bitlist, checked_byte_list, checked_list, checked_uint64_list, checked_vector,
    Error as SszError, Merkleize, Result as SszResult, Root, Value,
};

/// Maximum proposer slashings per block body
pub const MAX_PROPOSER_SLASHINGS: u64 = 16;
/// Maximum attester slashings per block body
pub const MAX_ATTESTER_SLASHINGS: u64 = 2;
/// Maximum attestations per block body
pub const MAX_ATTESTATIONS: u64 = 128;
/// Maximum deposits per block body
pub const MAX_DEPOSITS: u64 = 16;
/// Maximum voluntary exits per block body
pub const MAX_VOLUNTARY_EXITS: u64 = 16;
/// Maximum validator indices per attestation
pub const MAX_VALIDATORS_PER_COMMITTEE: u64 = 2048;
/// Maximum extra data bytes in an execution payload
pub const MAX_EXTRA_DATA_BYTES: u64 = 32;
/// Maximum byte length of one transaction
pub const MAX_BYTES_PER_TRANSACTION: u64 = 1_073_741_824;
/// Maximum transactions per execution payload
pub const MAX_TRANSACTIONS_PER_PAYLOAD: u64 = 1_048_576;
/// Fixed length of a deposit's Merkle branch
pub const DEPOSIT_PROOF_LENGTH: usize = 33;

fn values_of<T: Merkleize>(items: &[T]) -> SszResult<Vec<Value>> {
    items.iter().map(Merkleize::ssz_value).collect()
}

/// Eth1 chain voting data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Eth1Data {
    pub deposit_root: Vec<u8>,
    pub deposit_count: u64,
    pub block_hash: Vec<u8>,
}

impl Merkleize for Eth1Data {
    fn ssz_value(&self) -> SszResult<Value> {
        Ok(Value::container(vec![
            checked_vector("eth1_data.deposit_root", &self.deposit_root, 32)?,
            Value::Uint64(self.deposit_count),
            checked_vector("eth1_data.block_hash", &self.block_hash, 32)?,
        ]))
    }
}

/// A block header referencing its body by root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeaconBlockHeader {
    pub slot: u64,
    pub proposer_index: u64,
    pub parent_root: Vec<u8>,
    pub state_root: Vec<u8>,
    pub body_root: Vec<u8>,
}

impl Merkleize for BeaconBlockHeader {
    fn ssz_value(&self) -> SszResult<Value> {
        Ok(Value::container(vec![
            Value::Uint64(self.slot),
            Value::Uint64(self.proposer_index),
            checked_vector("header.parent_root", &self.parent_root, 32)?,
            checked_vector("header.state_root", &self.state_root, 32)?,
            checked_vector("header.body_root", &self.body_root, 32)?,
        ]))
    }
}

/// A block header with its proposer signature
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedBeaconBlockHeader {
    pub header: BeaconBlockHeader,
    pub signature: Vec<u8>,
}

impl Merkleize for SignedBeaconBlockHeader {
    fn ssz_value(&self) -> SszResult<Value> {
        Ok(Value::container(vec![
            self.header.ssz_value()?,
            checked_vector("signed_header.signature", &self.signature, 96)?,
        ]))
    }
}

/// Evidence of a proposer signing two conflicting headers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposerSlashing {
    pub signed_header_1: SignedBeaconBlockHeader,
    pub signed_header_2: SignedBeaconBlockHeader,
}

impl Merkleize for ProposerSlashing {
    fn ssz_value(&self) -> SszResult<Value> {
        Ok(Value::container(vec![
            self.signed_header_1.ssz_value()?,
            self.signed_header_2.ssz_value()?,
        ]))
    }
}

/// An epoch boundary reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checkpoint {
    pub epoch: u64,
    pub root: Vec<u8>,
}

impl Merkleize for Checkpoint {
    fn ssz_value(&self) -> SszResult<Value> {
        Ok(Value::container(vec![
            Value::Uint64(self.epoch),
            checked_vector("checkpoint.root", &self.root, 32)?,
        ]))
    }
}

/// What an attestation votes for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttestationData {
    pub slot: u64,
    pub index: u64,
    pub beacon_block_root: Vec<u8>,
    pub source: Checkpoint,
    pub target: Checkpoint,
}

impl Merkleize for AttestationData {
    fn ssz_value(&self) -> SszResult<Value> {
        Ok(Value::container(vec![
            Value::Uint64(self.slot),
            Value::Uint64(self.index),
            checked_vector("attestation_data.beacon_block_root", &self.beacon_block_root, 32)?,
            self.source.ssz_value()?,
            self.target.ssz_value()?,
        ]))
    }
}

/// An attestation naming its validators by index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexedAttestation {
    pub attesting_indices: Vec<u64>,
    pub data: AttestationData,
    pub signature: Vec<u8>,
}

impl Merkleize for IndexedAttestation {
    fn ssz_value(&self) -> SszResult<Value> {
        Ok(Value::container(vec![
            checked_uint64_list(
                "indexed_attestation.attesting_indices",
                &self.attesting_indices,
                MAX_VALIDATORS_PER_COMMITTEE,
            )?,
            self.data.ssz_value()?,
            checked_vector("indexed_attestation.signature", &self.signature, 96)?,
        ]))
    }
}

/// Evidence of validators attesting to two conflicting votes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttesterSlashing {
    pub attestation_1: IndexedAttestation,
    pub attestation_2: IndexedAttestation,
}

impl Merkleize for AttesterSlashing {
    fn ssz_value(&self) -> SszResult<Value> {
        Ok(Value::container(vec![
            self.attestation_1.ssz_value()?,
            self.attestation_2.ssz_value()?,
        ]))
    }
}

/// An aggregated committee attestation
///
/// `aggregation_bits` is kept in wire form: packed bits with a trailing
/// delimiter bit marking the length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attestation {
    pub aggregation_bits: Vec<u8>,
    pub data: AttestationData,
    pub signature: Vec<u8>,
}

impl Merkleize for Attestation {
    fn ssz_value(&self) -> SszResult<Value> {
        Ok(Value::container(vec![
            checked_bitlist(
                "attestation.aggregation_bits",
                &self.aggregation_bits,
                MAX_VALIDATORS_PER_COMMITTEE,
            )?,
            self.data.ssz_value()?,
            checked_vector("attestation.signature", &self.signature, 96)?,
        ]))
    }
}

/// The validator-supplied part of a deposit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepositData {
    pub pubkey: Vec<u8>,
    pub withdrawal_credentials: Vec<u8>,
    pub amount: u64,
    pub signature: Vec<u8>,
}

impl Merkleize for DepositData {
    fn ssz_value(&self) -> SszResult<Value> {
        Ok(Value::container(vec![
            checked_vector("deposit_data.pubkey", &self.pubkey, 48)?,
            checked_vector("deposit_data.withdrawal_credentials", &self.withdrawal_credentials, 32)?,
            Value::Uint64(self.amount),
            checked_vector("deposit_data.signature", &self.signature, 96)?,
        ]))
    }
}

/// A deposit with its branch into the deposit tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deposit {
    pub proof: Vec<Vec<u8>>,
    pub data: DepositData,
}

impl Merkleize for Deposit {
    fn ssz_value(&self) -> SszResult<Value> {
        if self.proof.len() != DEPOSIT_PROOF_LENGTH {
            return Err(SszError::LengthMismatch {
                field: "deposit.proof".into(),
                expected: DEPOSIT_PROOF_LENGTH,
                actual: self.proof.len(),
            });
        }
        let branch = self
            .proof
            .iter()
            .map(|node| checked_vector("deposit.proof", node, 32))
            .collect::<SszResult<Vec<_>>>()?;
        Ok(Value::container(vec![
            Value::container(branch),
            self.data.ssz_value()?,
        ]))
    }
}

/// A validator's request to exit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoluntaryExit {
    pub epoch: u64,
    pub validator_index: u64,
}

impl Merkleize for VoluntaryExit {
    fn ssz_value(&self) -> SszResult<Value> {
        Ok(Value::container(vec![
            Value::Uint64(self.epoch),
            Value::Uint64(self.validator_index),
        ]))
    }
}

/// A voluntary exit with its signature
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedVoluntaryExit {
    pub exit: VoluntaryExit,
    pub signature: Vec<u8>,
}

impl Merkleize for SignedVoluntaryExit {
    fn ssz_value(&self) -> SszResult<Value> {
        Ok(Value::container(vec![
            self.exit.ssz_value()?,
            checked_vector("signed_exit.signature", &self.signature, 96)?,
        ]))
    }
}

/// Aggregated sync committee signature over the previous slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncAggregate {
    pub sync_committee_bits: Vec<u8>,
    pub sync_committee_signature: Vec<u8>,
}

impl Merkleize for SyncAggregate {
    fn ssz_value(&self) -> SszResult<Value> {
        Ok(Value::container(vec![
            checked_vector("sync_aggregate.sync_committee_bits", &self.sync_committee_bits, 64)?,
            checked_vector(
                "sync_aggregate.sync_committee_signature",
                &self.sync_committee_signature,
                96,
            )?,
        ]))
    }
}

/// The execution payload embedded in a Bellatrix block body
///
/// `base_fee_per_gas` holds the 32-byte reversed big-endian form the
/// wire conversion produces; it is encoded as a plain 32-byte vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionPayload {
    pub parent_hash: Vec<u8>,
    pub fee_recipient: Vec<u8>,
    pub state_root: Vec<u8>,
    pub receipts_root: Vec<u8>,
    pub logs_bloom: Vec<u8>,
    pub prev_randao: Vec<u8>,
    pub block_number: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: u64,
    pub extra_data: Vec<u8>,
    pub base_fee_per_gas: Vec<u8>,
    pub block_hash: Vec<u8>,
    pub transactions: Vec<Vec<u8>>,
}

impl ExecutionPayload {
    pub(crate) fn field_values(&self) -> SszResult<Vec<Value>> {
        let transactions = self
            .transactions
            .iter()
            .map(|tx| checked_byte_list("payload.transactions", tx, MAX_BYTES_PER_TRANSACTION))
            .collect::<SszResult<Vec<_>>>()?;

        Ok(vec![
            checked_vector("payload.parent_hash", &self.parent_hash, 32)?,
            checked_vector("payload.fee_recipient", &self.fee_recipient, 20)?,
            checked_vector("payload.state_root", &self.state_root, 32)?,
            checked_vector("payload.receipts_root", &self.receipts_root, 32)?,
            checked_vector("payload.logs_bloom", &self.logs_bloom, 256)?,
            checked_vector("payload.prev_randao", &self.prev_randao, 32)?,
            Value::Uint64(self.block_number),
            Value::Uint64(self.gas_limit),
            Value::Uint64(self.gas_used),
            Value::Uint64(self.timestamp),
            checked_byte_list("payload.extra_data", &self.extra_data, MAX_EXTRA_DATA_BYTES)?,
            checked_vector("payload.base_fee_per_gas", &self.base_fee_per_gas, 32)?,
            checked_vector("payload.block_hash", &self.block_hash, 32)?,
            checked_list(
                "payload.transactions",
                transactions,
                MAX_TRANSACTIONS_PER_PAYLOAD,
            )?,
        ])
    }

    /// Roots of the payload's fourteen fields, in schema order
    pub fn field_roots(&self) -> SszResult<Vec<Root>> {
        self.field_values()?
            .iter()
            .map(Value::hash_tree_root)
            .collect()
    }
}

impl Merkleize for ExecutionPayload {
    fn ssz_value(&self) -> SszResult<Value> {
        Ok(Value::container_with_capacity(
            self.field_values()?,
            crate::tree::PAYLOAD_TREE_CAPACITY,
        ))
    }
}

/// The Bellatrix beacon block body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeaconBlockBody {
    pub randao_reveal: Vec<u8>,
    pub eth1_data: Eth1Data,
    pub graffiti: Vec<u8>,
    pub proposer_slashings: Vec<ProposerSlashing>,
    pub attester_slashings: Vec<AttesterSlashing>,
    pub attestations: Vec<Attestation>,
    pub deposits: Vec<Deposit>,
    pub voluntary_exits: Vec<SignedVoluntaryExit>,
    pub sync_aggregate: SyncAggregate,
    pub execution_payload: ExecutionPayload,
}

impl BeaconBlockBody {
    pub(crate) fn field_values(&self) -> SszResult<Vec<Value>> {
        Ok(vec![
            checked_vector("body.randao_reveal", &self.randao_reveal, 96)?,
            self.eth1_data.ssz_value()?,
            checked_vector("body.graffiti", &self.graffiti, 32)?,
            checked_list(
                "body.proposer_slashings",
                values_of(&self.proposer_slashings)?,
                MAX_PROPOSER_SLASHINGS,
            )?,
            checked_list(
                "body.attester_slashings",
                values_of(&self.attester_slashings)?,
                MAX_ATTESTER_SLASHINGS,
            )?,
            checked_list("body.attestations", values_of(&self.attestations)?, MAX_ATTESTATIONS)?,
            checked_list("body.deposits", values_of(&self.deposits)?, MAX_DEPOSITS)?,
            checked_list(
                "body.voluntary_exits",
                values_of(&self.voluntary_exits)?,
                MAX_VOLUNTARY_EXITS,
            )?,
            self.sync_aggregate.ssz_value()?,
            self.execution_payload.ssz_value()?,
        ])
    }

    /// Roots of the body's ten fields, in schema order
    pub fn field_roots(&self) -> SszResult<Vec<Root>> {
        self.field_values()?
            .iter()
            .map(Value::hash_tree_root)
            .collect()
    }
}

impl Merkleize for BeaconBlockBody {
    fn ssz_value(&self) -> SszResult<Value> {
        Ok(Value::container_with_capacity(
            self.field_values()?,
            crate::tree::BODY_TREE_CAPACITY,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn zero_payload() -> ExecutionPayload {
        ExecutionPayload {
            parent_hash: vec![0; 32],
            fee_recipient: vec![0; 20],
            state_root: vec![0; 32],
            receipts_root: vec![0; 32],
            logs_bloom: vec![0; 256],
            prev_randao: vec![0; 32],
            block_number: 0,
            gas_limit: 0,
            gas_used: 0,
            timestamp: 0,
            extra_data: Vec::new(),
            base_fee_per_gas: vec![0; 32],
            block_hash: vec![0; 32],
            transactions: Vec::new(),
        }
    }

    pub(crate) fn zero_body() -> BeaconBlockBody {
        BeaconBlockBody {
            randao_reveal: vec![0; 96],
            eth1_data: Eth1Data {
                deposit_root: vec![0; 32],
                deposit_count: 0,
                block_hash: vec![0; 32],
            },
            graffiti: vec![0; 32],
            proposer_slashings: Vec::new(),
            attester_slashings: Vec::new(),
            attestations: Vec::new(),
            deposits: Vec::new(),
            voluntary_exits: Vec::new(),
            sync_aggregate: SyncAggregate {
                sync_committee_bits: vec![0; 64],
                sync_committee_signature: vec![0; 96],
            },
            execution_payload: zero_payload(),
        }
    }

    #[test]
    fn test_zero_payload_golden_root() {
        let root = zero_payload().hash_tree_root().unwrap();
        assert_eq!(
            root.to_hex(),
            "af55da97de3216f3e94e32ebcc02f6a86e927b6238591e32a64a3b02c97fa118"
        );
    }

    #[test]
    fn test_zero_body_golden_root() {
        let root = zero_body().hash_tree_root().unwrap();
        assert_eq!(
            root.to_hex(),
            "cd7c49966ebe72b1214e6d4733adf6bf06935c5fbc3b3ad08e84e3085428b82f"
        );
    }

    #[test]
    fn test_zero_eth1_data_root() {
        // three zero chunks under a four-leaf subtree
        let root = zero_body().eth1_data.hash_tree_root().unwrap();
        assert_eq!(
            root.to_hex(),
            "db56114e00fdd4c1f85c892bf35ac9a89289aaecb1ebd0a96cde606a748b5d71"
        );
    }

    #[test]
    fn test_zero_sync_aggregate_root() {
        let root = zero_body().sync_aggregate.hash_tree_root().unwrap();
        assert_eq!(
            root.to_hex(),
            "42b052541dce45557d83d34634a45a56d216d4375e5a9584f6445ce4e63324af"
        );
    }

    #[test]
    fn test_empty_transactions_golden_root() {
        let roots = zero_payload().field_roots().unwrap();
        assert_eq!(
            roots[13].to_hex(),
            "7ffe241ea60187fdb0187bfa22de35d1f9bed7ab061d9401fd47e34a54fbede1"
        );
    }

    #[test]
    fn test_single_transaction_golden_root() {
        let mut payload = zero_payload();
        payload.transactions = vec![vec![0xde, 0xad, 0xbe, 0xef]];
        let roots = payload.field_roots().unwrap();
        assert_eq!(
            roots[13].to_hex(),
            "a34ec5986816fa930a929ccd0fdf629a2afaead99daff0c265e75ad43f488f22"
        );
    }

    #[test]
    fn test_gas_limit_changes_root() {
        let base = zero_payload().hash_tree_root().unwrap();
        let mut bumped = zero_payload();
        bumped.gas_limit += 1;
        assert_ne!(bumped.hash_tree_root().unwrap(), base);
        assert_eq!(
            bumped.hash_tree_root().unwrap().to_hex(),
            "e518ec7722bec0e0f8aefa7591bd8915140d9b19a979dee788f3cd8c20b3f291"
        );
    }

    #[test]
    fn test_every_field_feeds_the_root() {
        let base = zero_body().hash_tree_root().unwrap();

        let mut body = zero_body();
        body.graffiti[0] = 1;
        assert_ne!(body.hash_tree_root().unwrap(), base);

        let mut body = zero_body();
        body.eth1_data.deposit_count = 1;
        assert_ne!(body.hash_tree_root().unwrap(), base);

        let mut body = zero_body();
        body.execution_payload.block_hash[31] = 1;
        assert_ne!(body.hash_tree_root().unwrap(), base);
    }

    #[test]
    fn test_determinism() {
        let body = zero_body();
        assert_eq!(
            body.hash_tree_root().unwrap(),
            body.hash_tree_root().unwrap()
        );
    }

    #[test]
    fn test_randao_reveal_wrong_length() {
        for wrong in [0usize, 95, 97] {
            let mut body = zero_body();
            body.randao_reveal = vec![0; wrong];
            let err = body.hash_tree_root().unwrap_err();
            match err {
                SszError::LengthMismatch { field, expected, actual } => {
                    assert_eq!(field, "body.randao_reveal");
                    assert_eq!(expected, 96);
                    assert_eq!(actual, wrong);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_voluntary_exits_at_limit_and_over() {
        let exit = SignedVoluntaryExit {
            exit: VoluntaryExit { epoch: 1, validator_index: 2 },
            signature: vec![0; 96],
        };

        let mut body = zero_body();
        body.voluntary_exits = vec![exit.clone(); MAX_VOLUNTARY_EXITS as usize];
        assert!(body.hash_tree_root().is_ok());

        body.voluntary_exits.push(exit);
        let err = body.hash_tree_root().unwrap_err();
        assert!(matches!(
            err,
            SszError::ListTooLong { limit: 16, actual: 17, .. }
        ));
    }

    #[test]
    fn test_deposit_proof_must_have_33_nodes() {
        let deposit = Deposit {
            proof: vec![vec![0; 32]; 32],
            data: DepositData {
                pubkey: vec![0; 48],
                withdrawal_credentials: vec![0; 32],
                amount: 0,
                signature: vec![0; 96],
            },
        };
        assert!(matches!(
            deposit.hash_tree_root(),
            Err(SszError::LengthMismatch { expected: 33, actual: 32, .. })
        ));

        let deposit = Deposit {
            proof: vec![vec![0; 32]; DEPOSIT_PROOF_LENGTH],
            ..deposit
        };
        assert!(deposit.hash_tree_root().is_ok());
    }

    #[test]
    fn test_populated_attestation_encodes() {
        let attestation = Attestation {
            aggregation_bits: vec![0b0000_1101],
            data: AttestationData {
                slot: 100,
                index: 2,
                beacon_block_root: vec![1; 32],
                source: Checkpoint { epoch: 3, root: vec![2; 32] },
                target: Checkpoint { epoch: 4, root: vec![3; 32] },
            },
            signature: vec![9; 96],
        };
        let root = attestation.hash_tree_root().unwrap();
        assert_eq!(root, attestation.hash_tree_root().unwrap());

        let mut body = zero_body();
        body.attestations = vec![attestation];
        assert_ne!(
            body.hash_tree_root().unwrap(),
            zero_body().hash_tree_root().unwrap()
        );
    }
}
