//! beaconproof command line tool
//!
//! Fetches a beacon block by slot, computes the body and execution
//! payload hash tree roots, and prints the chained inclusion proof for
//! the payload's block hash. The proof is self-verified before the tool
//! exits.

use anyhow::{bail, Context};
use beaconproof_beacon::{
    BeaconBlockBody, BeaconBlockBodyTree, BeaconClient, ExecutionPayloadTree, DEFAULT_ENDPOINT,
};
use beaconproof_merkle::{join_proofs, verify_proof, Merkleize};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "beaconproof", about = "Execution payload inclusion proofs for beacon blocks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the execution payload proof for a block
    Generate {
        /// Beacon chain slot
        #[arg(long)]
        slot: u64,
        /// Beacon node endpoint
        #[arg(long, default_value = DEFAULT_ENDPOINT)]
        endpoint: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate { slot, endpoint } => generate(slot, &endpoint).await,
    }
}

async fn generate(slot: u64, endpoint: &str) -> anyhow::Result<()> {
    let client = BeaconClient::new(endpoint);
    let response = client
        .get_block_by_slot(slot)
        .await
        .with_context(|| format!("fetching block at slot {slot} from {endpoint}"))?;
    tracing::info!(slot, version = %response.version, "fetched block");

    let body: BeaconBlockBody = (&response.data.message.body)
        .try_into()
        .context("converting wire block to binary records")?;

    let body_tree = BeaconBlockBodyTree::new(&body).context("building body tree")?;
    let payload_tree = ExecutionPayloadTree::new(&body.execution_payload)
        .context("building execution payload tree")?;

    let payload_proof = body_tree.execution_payload_proof()?;
    let block_hash_proof = payload_tree.block_hash_proof()?;

    println!("body root: {}", body_tree.root());
    println!("payload root: {}", payload_tree.root());
    println!("payload proof hashes: {}", payload_proof.hashes.len());

    for hash in payload_proof.hashes.iter().chain(&block_hash_proof.hashes) {
        println!("{}", hash);
    }

    let payload_root = body.execution_payload.hash_tree_root()?;
    if !verify_proof(&payload_root, &block_hash_proof)? {
        bail!("block hash proof failed to verify against the payload root");
    }

    let joined = join_proofs(&payload_proof, &block_hash_proof)?;
    if !verify_proof(&body_tree.root(), &joined)? {
        bail!("chained proof failed to verify against the body root");
    }
    tracing::info!(gindex = joined.index, "proof verified");

    Ok(())
}
