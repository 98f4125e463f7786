//! Inventory boundary: the compute and block-storage services used to
//! validate resource state at admission time.
//!
//! These are external collaborators; the core only needs a get-by-id lookup
//! from each. Reference HTTP implementations live in the root crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("no record for {0}")]
    NotFound(String),

    #[error("inventory service unreachable: {0}")]
    Transport(String),
}

/// A VM instance as reported by the compute inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub id: String,
    pub display_name: String,
    /// VM state (e.g. "active", "stopped", "error")
    pub state: String,
}

/// A volume as reported by the block-storage inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeRecord {
    pub id: String,
    pub display_name: String,
    /// Volume status (e.g. "available", "in-use", "deleted")
    pub status: String,
    /// Volume type identifier, carried through as the protection subtype
    #[serde(default)]
    pub volume_type: Option<String>,
}

/// Lookup into the compute inventory
#[async_trait]
pub trait ComputeInventory: Send + Sync {
    async fn get_instance(&self, instance_id: &str) -> Result<InstanceRecord, InventoryError>;
}

/// Lookup into the block-storage inventory
#[async_trait]
pub trait VolumeInventory: Send + Sync {
    async fn get_volume(&self, volume_id: &str) -> Result<VolumeRecord, InventoryError>;
}
