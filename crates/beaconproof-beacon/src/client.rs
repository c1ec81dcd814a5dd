//! Beacon node client for fetching blocks

use crate::error::{Error, Result};
use crate::wire::BlockResponse;

/// Default beacon node endpoint
pub const DEFAULT_ENDPOINT: &str = "https://lodestar-mainnet.chainsafe.io";

/// A client for a beacon node's REST API
pub struct BeaconClient {
    /// Base URL of the beacon node
    url: String,
    /// HTTP client
    client: reqwest::Client,
}

impl BeaconClient {
    /// Create a new beacon client
    pub fn new(url: impl Into<String>) -> Self {
        let mut url = url.into();
        while url.ends_with('/') {
            url.pop();
        }
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }

    /// Create a client for the default mainnet endpoint
    pub fn mainnet() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }

    /// Fetch the signed block at a slot
    pub async fn get_block_by_slot(&self, slot: u64) -> Result<BlockResponse> {
        let url = format!("{}/eth/v2/beacon/blocks/{}", self.url, slot);
        tracing::debug!(slot, %url, "fetching beacon block");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Api(format!(
                "failed to get block at slot {}: {}",
                slot,
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Http(format!("failed to parse JSON: {}", e)))
    }
}
