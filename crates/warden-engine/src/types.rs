//! Wire types shared with the external data-protection engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A protection action the engine can apply to a resource type
/// (e.g. "Image Copy", "Volume Replication", "Volume Snapshot").
///
/// The orchestrator resolves action ids by display name from the engine's
/// per-resource-type catalog during bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    /// Engine-assigned action identifier
    pub id: String,

    /// Display name, matched against the configured defaults
    pub name: String,
}

/// A workload policy: the engine's unit of protection grouping.
///
/// Resources are attached to a policy via resource-actions; a protect
/// command executes all pending actions under the policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadPolicy {
    /// Engine-assigned policy identifier
    pub id: String,

    /// Policy name (one per deployment in the reference design)
    pub name: String,
}

/// A resource as registered with the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineResource {
    /// Resource identifier (instance or volume UUID)
    pub id: String,

    /// Display name shown in the engine
    pub name: String,

    /// Numeric marker distinguishing instances from volumes
    #[serde(rename = "resource_type_id")]
    pub type_id: u32,
}

/// The binding of a resource to a protection action within a policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAction {
    pub resource_id: String,
    pub action_id: String,
    pub policy_id: String,
}

/// A historical record of one protect invocation's output.
///
/// Executions are what recovery replays and what the retention sweeper
/// prunes; the engine returns them most-recent-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyExecution {
    /// Engine-assigned execution identifier (also names the backing
    /// storage container)
    pub id: String,

    /// Optional display name
    #[serde(default)]
    pub name: Option<String>,

    /// When the execution was produced
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
