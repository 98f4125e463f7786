/*!
 * HTTP adapters for the compute and block-storage inventory services
 *
 * Warden only needs a get-by-id lookup from each inventory to validate that
 * a resource exists and is in a protectable state before admission.
 */

use crate::config::InventoryEndpoint;
use crate::error::{Result, WardenError};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use warden_control::inventory::{
    ComputeInventory, InstanceRecord, InventoryError, VolumeInventory, VolumeRecord,
};

fn build_client(config: &InventoryEndpoint) -> Result<(reqwest::Client, String)> {
    let base = config.endpoint.trim_end_matches('/').to_string();
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| WardenError::Config(format!("inventory client: {}", e)))?;
    Ok((client, base))
}

async fn fetch_json<T: serde::de::DeserializeOwned>(
    http: &reqwest::Client,
    url: String,
    resource_id: &str,
) -> std::result::Result<T, InventoryError> {
    let response = http
        .get(&url)
        .send()
        .await
        .map_err(|e| InventoryError::Transport(e.to_string()))?;

    if response.status() == StatusCode::NOT_FOUND {
        return Err(InventoryError::NotFound(resource_id.to_string()));
    }

    if !response.status().is_success() {
        return Err(InventoryError::Transport(format!(
            "{} answered HTTP {}",
            url,
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| InventoryError::Transport(e.to_string()))
}

/// Compute inventory over HTTP
pub struct HttpComputeInventory {
    http: reqwest::Client,
    base: String,
}

impl HttpComputeInventory {
    pub fn new(config: &InventoryEndpoint) -> Result<Self> {
        let (http, base) = build_client(config)?;
        Ok(Self { http, base })
    }
}

#[async_trait]
impl ComputeInventory for HttpComputeInventory {
    async fn get_instance(
        &self,
        instance_id: &str,
    ) -> std::result::Result<InstanceRecord, InventoryError> {
        let url = format!("{}/servers/{}", self.base, instance_id);
        fetch_json(&self.http, url, instance_id).await
    }
}

/// Block-storage inventory over HTTP
pub struct HttpVolumeInventory {
    http: reqwest::Client,
    base: String,
}

impl HttpVolumeInventory {
    pub fn new(config: &InventoryEndpoint) -> Result<Self> {
        let (http, base) = build_client(config)?;
        Ok(Self { http, base })
    }
}

#[async_trait]
impl VolumeInventory for HttpVolumeInventory {
    async fn get_volume(
        &self,
        volume_id: &str,
    ) -> std::result::Result<VolumeRecord, InventoryError> {
        let url = format!("{}/volumes/{}", self.base, volume_id);
        fetch_json(&self.http, url, volume_id).await
    }
}
