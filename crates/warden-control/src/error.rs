//! Error types for the orchestration core

use crate::inventory::InventoryError;
use thiserror::Error;
use warden_engine::EngineError;

#[derive(Error, Debug)]
pub enum ControlError {
    #[error("resource {0} not found")]
    ResourceNotFound(String),

    #[error("resource {id} is not in a protectable state (current state: {state})")]
    NotProtectable { id: String, state: String },

    #[error("unknown resource kind: {0}")]
    UnknownResourceKind(String),

    #[error("insufficient capacity to protect additional resources")]
    InsufficientCapacity,

    #[error("no protection policy resolved for datacenter {0}")]
    DatacenterPolicyNotFound(String),

    #[error("policy {0} has no protection executions to recover from")]
    NothingToRecover(String),

    #[error("no default action named {name:?} in the catalog for resource type {resource_type_id}")]
    DefaultActionNotFound { name: String, resource_type_id: u32 },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("inventory lookup failed: {0}")]
    Inventory(InventoryError),
}

impl ControlError {
    /// Map an inventory failure for `resource_id` into the admission-time
    /// taxonomy: a missing record becomes [`ControlError::ResourceNotFound`],
    /// anything else is surfaced as an inventory error.
    pub fn from_inventory(resource_id: &str, err: InventoryError) -> Self {
        match err {
            InventoryError::NotFound(_) => ControlError::ResourceNotFound(resource_id.to_string()),
            other => ControlError::Inventory(other),
        }
    }
}
