//! Beacon API wire types and conversion
//!
//! Typed serde mirrors of the `/eth/v2/beacon/blocks/{slot}` response.
//! Byte fields arrive as `0x`-prefixed hex strings and integers as
//! decimal strings; conversion into the binary records happens here, so
//! the tree engine only ever sees fully-typed values.

use crate::block::{
    Attestation, AttestationData, AttesterSlashing, BeaconBlockBody, BeaconBlockHeader,
    Checkpoint, Deposit, DepositData, Eth1Data, ExecutionPayload, IndexedAttestation,
    ProposerSlashing, SignedBeaconBlockHeader, SignedVoluntaryExit, SyncAggregate, VoluntaryExit,
};
use crate::error::{Error, Result};
use beaconproof_types::decode_hex;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Response envelope of `/eth/v2/beacon/blocks/{block_id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockResponse {
    pub version: String,
    #[serde(default)]
    pub execution_optimistic: bool,
    pub data: SignedBlockJson,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedBlockJson {
    pub message: BlockMessageJson,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockMessageJson {
    pub slot: String,
    pub proposer_index: String,
    pub parent_root: String,
    pub state_root: String,
    pub body: BlockBodyJson,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockBodyJson {
    pub randao_reveal: String,
    pub eth1_data: Eth1DataJson,
    pub graffiti: String,
    #[serde(default)]
    pub proposer_slashings: Vec<ProposerSlashingJson>,
    #[serde(default)]
    pub attester_slashings: Vec<AttesterSlashingJson>,
    #[serde(default)]
    pub attestations: Vec<AttestationJson>,
    #[serde(default)]
    pub deposits: Vec<DepositJson>,
    #[serde(default)]
    pub voluntary_exits: Vec<SignedVoluntaryExitJson>,
    pub sync_aggregate: SyncAggregateJson,
    pub execution_payload: ExecutionPayloadJson,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Eth1DataJson {
    pub deposit_root: String,
    pub deposit_count: String,
    pub block_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeaconBlockHeaderJson {
    pub slot: String,
    pub proposer_index: String,
    pub parent_root: String,
    pub state_root: String,
    pub body_root: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedBeaconBlockHeaderJson {
    pub message: BeaconBlockHeaderJson,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposerSlashingJson {
    pub signed_header_1: SignedBeaconBlockHeaderJson,
    pub signed_header_2: SignedBeaconBlockHeaderJson,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointJson {
    pub epoch: String,
    pub root: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttestationDataJson {
    pub slot: String,
    pub index: String,
    pub beacon_block_root: String,
    pub source: CheckpointJson,
    pub target: CheckpointJson,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedAttestationJson {
    pub attesting_indices: Vec<String>,
    pub data: AttestationDataJson,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttesterSlashingJson {
    pub attestation_1: IndexedAttestationJson,
    pub attestation_2: IndexedAttestationJson,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttestationJson {
    pub aggregation_bits: String,
    pub data: AttestationDataJson,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositDataJson {
    pub pubkey: String,
    pub withdrawal_credentials: String,
    pub amount: String,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositJson {
    pub proof: Vec<String>,
    pub data: DepositDataJson,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoluntaryExitJson {
    pub epoch: String,
    pub validator_index: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedVoluntaryExitJson {
    pub message: VoluntaryExitJson,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncAggregateJson {
    pub sync_committee_bits: String,
    pub sync_committee_signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionPayloadJson {
    pub parent_hash: String,
    pub fee_recipient: String,
    pub state_root: String,
    pub receipts_root: String,
    pub logs_bloom: String,
    pub prev_randao: String,
    pub block_number: String,
    pub gas_limit: String,
    pub gas_used: String,
    pub timestamp: String,
    pub extra_data: String,
    pub base_fee_per_gas: String,
    pub block_hash: String,
    #[serde(default)]
    pub transactions: Vec<String>,
}

fn hex_field(field: &str, value: &str) -> Result<Vec<u8>> {
    decode_hex(value).map_err(|e| Error::Wire(format!("{}: {}", field, e)))
}

fn decimal_field(field: &str, value: &str) -> Result<u64> {
    value
        .parse::<u64>()
        .map_err(|e| Error::Wire(format!("{}: invalid decimal: {}", field, e)))
}

/// Convert a decimal big integer into its 32-byte tree encoding
///
/// The convention the payload schema fixes: minimal big-endian bytes,
/// reversed, then zero-extended on the right to 32 bytes. Equivalent to
/// the value's little-endian form in a 32-byte buffer.
fn base_fee_field(field: &str, value: &str) -> Result<Vec<u8>> {
    let parsed = BigUint::parse_bytes(value.as_bytes(), 10)
        .ok_or_else(|| Error::Wire(format!("{}: invalid decimal: {}", field, value)))?;
    let mut bytes = parsed.to_bytes_le();
    if bytes.len() > 32 {
        return Err(Error::Wire(format!("{}: exceeds 256 bits", field)));
    }
    bytes.resize(32, 0);
    Ok(bytes)
}

impl TryFrom<&Eth1DataJson> for Eth1Data {
    type Error = Error;

    fn try_from(json: &Eth1DataJson) -> Result<Self> {
        Ok(Eth1Data {
            deposit_root: hex_field("eth1_data.deposit_root", &json.deposit_root)?,
            deposit_count: decimal_field("eth1_data.deposit_count", &json.deposit_count)?,
            block_hash: hex_field("eth1_data.block_hash", &json.block_hash)?,
        })
    }
}

impl TryFrom<&BeaconBlockHeaderJson> for BeaconBlockHeader {
    type Error = Error;

    fn try_from(json: &BeaconBlockHeaderJson) -> Result<Self> {
        Ok(BeaconBlockHeader {
            slot: decimal_field("header.slot", &json.slot)?,
            proposer_index: decimal_field("header.proposer_index", &json.proposer_index)?,
            parent_root: hex_field("header.parent_root", &json.parent_root)?,
            state_root: hex_field("header.state_root", &json.state_root)?,
            body_root: hex_field("header.body_root", &json.body_root)?,
        })
    }
}

impl TryFrom<&SignedBeaconBlockHeaderJson> for SignedBeaconBlockHeader {
    type Error = Error;

    fn try_from(json: &SignedBeaconBlockHeaderJson) -> Result<Self> {
        Ok(SignedBeaconBlockHeader {
            header: (&json.message).try_into()?,
            signature: hex_field("signed_header.signature", &json.signature)?,
        })
    }
}

impl TryFrom<&ProposerSlashingJson> for ProposerSlashing {
    type Error = Error;

    fn try_from(json: &ProposerSlashingJson) -> Result<Self> {
        Ok(ProposerSlashing {
            signed_header_1: (&json.signed_header_1).try_into()?,
            signed_header_2: (&json.signed_header_2).try_into()?,
        })
    }
}

impl TryFrom<&CheckpointJson> for Checkpoint {
    type Error = Error;

    fn try_from(json: &CheckpointJson) -> Result<Self> {
        Ok(Checkpoint {
            epoch: decimal_field("checkpoint.epoch", &json.epoch)?,
            root: hex_field("checkpoint.root", &json.root)?,
        })
    }
}

impl TryFrom<&AttestationDataJson> for AttestationData {
    type Error = Error;

    fn try_from(json: &AttestationDataJson) -> Result<Self> {
        Ok(AttestationData {
            slot: decimal_field("attestation_data.slot", &json.slot)?,
            index: decimal_field("attestation_data.index", &json.index)?,
            beacon_block_root: hex_field(
                "attestation_data.beacon_block_root",
                &json.beacon_block_root,
            )?,
            source: (&json.source).try_into()?,
            target: (&json.target).try_into()?,
        })
    }
}

impl TryFrom<&IndexedAttestationJson> for IndexedAttestation {
    type Error = Error;

    fn try_from(json: &IndexedAttestationJson) -> Result<Self> {
        let attesting_indices = json
            .attesting_indices
            .iter()
            .map(|index| decimal_field("indexed_attestation.attesting_indices", index))
            .collect::<Result<Vec<_>>>()?;
        Ok(IndexedAttestation {
            attesting_indices,
            data: (&json.data).try_into()?,
            signature: hex_field("indexed_attestation.signature", &json.signature)?,
        })
    }
}

impl TryFrom<&AttesterSlashingJson> for AttesterSlashing {
    type Error = Error;

    fn try_from(json: &AttesterSlashingJson) -> Result<Self> {
        Ok(AttesterSlashing {
            attestation_1: (&json.attestation_1).try_into()?,
            attestation_2: (&json.attestation_2).try_into()?,
        })
    }
}

impl TryFrom<&AttestationJson> for Attestation {
    type Error = Error;

    fn try_from(json: &AttestationJson) -> Result<Self> {
        Ok(Attestation {
            aggregation_bits: hex_field("attestation.aggregation_bits", &json.aggregation_bits)?,
            data: (&json.data).try_into()?,
            signature: hex_field("attestation.signature", &json.signature)?,
        })
    }
}

impl TryFrom<&DepositJson> for Deposit {
    type Error = Error;

    fn try_from(json: &DepositJson) -> Result<Self> {
        let proof = json
            .proof
            .iter()
            .map(|node| hex_field("deposit.proof", node))
            .collect::<Result<Vec<_>>>()?;
        Ok(Deposit {
            proof,
            data: DepositData {
                pubkey: hex_field("deposit_data.pubkey", &json.data.pubkey)?,
                withdrawal_credentials: hex_field(
                    "deposit_data.withdrawal_credentials",
                    &json.data.withdrawal_credentials,
                )?,
                amount: decimal_field("deposit_data.amount", &json.data.amount)?,
                signature: hex_field("deposit_data.signature", &json.data.signature)?,
            },
        })
    }
}

impl TryFrom<&SignedVoluntaryExitJson> for SignedVoluntaryExit {
    type Error = Error;

    fn try_from(json: &SignedVoluntaryExitJson) -> Result<Self> {
        Ok(SignedVoluntaryExit {
            exit: VoluntaryExit {
                epoch: decimal_field("voluntary_exit.epoch", &json.message.epoch)?,
                validator_index: decimal_field(
                    "voluntary_exit.validator_index",
                    &json.message.validator_index,
                )?,
            },
            signature: hex_field("signed_exit.signature", &json.signature)?,
        })
    }
}

impl TryFrom<&SyncAggregateJson> for SyncAggregate {
    type Error = Error;

    fn try_from(json: &SyncAggregateJson) -> Result<Self> {
        Ok(SyncAggregate {
            sync_committee_bits: hex_field(
                "sync_aggregate.sync_committee_bits",
                &json.sync_committee_bits,
            )?,
            sync_committee_signature: hex_field(
                "sync_aggregate.sync_committee_signature",
                &json.sync_committee_signature,
            )?,
        })
    }
}

impl TryFrom<&ExecutionPayloadJson> for ExecutionPayload {
    type Error = Error;

    fn try_from(json: &ExecutionPayloadJson) -> Result<Self> {
        let transactions = json
            .transactions
            .iter()
            .map(|tx| hex_field("payload.transactions", tx))
            .collect::<Result<Vec<_>>>()?;
        Ok(ExecutionPayload {
            parent_hash: hex_field("payload.parent_hash", &json.parent_hash)?,
            fee_recipient: hex_field("payload.fee_recipient", &json.fee_recipient)?,
            state_root: hex_field("payload.state_root", &json.state_root)?,
            receipts_root: hex_field("payload.receipts_root", &json.receipts_root)?,
            logs_bloom: hex_field("payload.logs_bloom", &json.logs_bloom)?,
            prev_randao: hex_field("payload.prev_randao", &json.prev_randao)?,
            block_number: decimal_field("payload.block_number", &json.block_number)?,
            gas_limit: decimal_field("payload.gas_limit", &json.gas_limit)?,
            gas_used: decimal_field("payload.gas_used", &json.gas_used)?,
            timestamp: decimal_field("payload.timestamp", &json.timestamp)?,
            extra_data: hex_field("payload.extra_data", &json.extra_data)?,
            base_fee_per_gas: base_fee_field("payload.base_fee_per_gas", &json.base_fee_per_gas)?,
            block_hash: hex_field("payload.block_hash", &json.block_hash)?,
            transactions,
        })
    }
}

impl TryFrom<&BlockBodyJson> for BeaconBlockBody {
    type Error = Error;

    fn try_from(json: &BlockBodyJson) -> Result<Self> {
        fn convert_all<'a, J, T>(items: &'a [J]) -> Result<Vec<T>>
        where
            T: TryFrom<&'a J, Error = Error>,
        {
            items.iter().map(T::try_from).collect()
        }

        Ok(BeaconBlockBody {
            randao_reveal: hex_field("body.randao_reveal", &json.randao_reveal)?,
            eth1_data: (&json.eth1_data).try_into()?,
            graffiti: hex_field("body.graffiti", &json.graffiti)?,
            proposer_slashings: convert_all(&json.proposer_slashings)?,
            attester_slashings: convert_all(&json.attester_slashings)?,
            attestations: convert_all(&json.attestations)?,
            deposits: convert_all(&json.deposits)?,
            voluntary_exits: convert_all(&json.voluntary_exits)?,
            sync_aggregate: (&json.sync_aggregate).try_into()?,
            execution_payload: (&json.execution_payload).try_into()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_fee_reversal() {
        // 1 gwei = 0x3B9ACA00: minimal big-endian 3b 9a ca 00,
        // reversed to 00 ca 9a 3b, zeros appended to 32 bytes
        let bytes = base_fee_field("base_fee", "1000000000").unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[..4], &[0x00, 0xca, 0x9a, 0x3b]);
        assert_eq!(&bytes[4..], &[0u8; 28]);
    }

    #[test]
    fn test_base_fee_zero_and_bounds() {
        assert_eq!(base_fee_field("base_fee", "0").unwrap(), vec![0u8; 32]);

        // 2^256 - 1 fits, 2^256 does not
        let max = BigUint::from(1u8) << 256usize;
        let fits = (&max - 1u8).to_string();
        assert!(base_fee_field("base_fee", &fits).is_ok());
        assert!(base_fee_field("base_fee", &max.to_string()).is_err());
        assert!(base_fee_field("base_fee", "not a number").is_err());
    }

    #[test]
    fn test_decimal_field_rejects_garbage() {
        assert_eq!(decimal_field("f", "12345").unwrap(), 12345);
        assert!(decimal_field("f", "").is_err());
        assert!(decimal_field("f", "0x10").is_err());
        assert!(decimal_field("f", "-1").is_err());
    }

    #[test]
    fn test_hex_field_error_carries_name() {
        let err = hex_field("body.graffiti", "0xzz").unwrap_err();
        assert!(err.to_string().contains("body.graffiti"));
    }
}
