//! The engine boundary contract consumed by the orchestration core

use crate::error::EngineError;
use crate::types::{ActionDescriptor, EngineResource, PolicyExecution, ResourceAction, WorkloadPolicy};
use async_trait::async_trait;

/// Boundary contract to the external data-protection engine.
///
/// All calls are synchronous remote calls from the orchestrator's point of
/// view: the periodic loop blocks on each call in sequence, and timeouts are
/// this layer's responsibility. Any failure surfaces as an [`EngineError`]
/// which the loops treat uniformly as a tick-level error with no retry
/// beyond the next scheduled tick.
#[async_trait]
pub trait ProtectionEngine: Send + Sync {
    /// List the protection actions available for a resource type.
    async fn list_actions(&self, resource_type_id: u32)
        -> Result<Vec<ActionDescriptor>, EngineError>;

    /// List all workload policies known to the engine.
    async fn list_workload_policies(&self) -> Result<Vec<WorkloadPolicy>, EngineError>;

    /// Create a workload policy with the given name.
    async fn create_workload_policy(&self, name: &str) -> Result<WorkloadPolicy, EngineError>;

    /// Register a resource with the engine.
    async fn create_resource(
        &self,
        resource_id: &str,
        name: &str,
        resource_type_id: u32,
    ) -> Result<(), EngineError>;

    /// Bind a resource to a protection action under a policy.
    async fn create_resource_action(
        &self,
        resource_id: &str,
        action_id: &str,
        policy_id: &str,
    ) -> Result<(), EngineError>;

    /// Execute all pending actions under a policy now.
    async fn protect(&self, policy_id: &str) -> Result<(), EngineError>;

    /// Recover from a protection execution (by its container id).
    async fn recover(&self, execution_id: &str) -> Result<(), EngineError>;

    /// List policies from the recovery side of the engine.
    async fn recovery_list_policies(&self) -> Result<Vec<WorkloadPolicy>, EngineError>;

    /// List a policy's protection executions, most recent first.
    async fn recovery_list_policy_executions(
        &self,
        policy_id: &str,
    ) -> Result<Vec<PolicyExecution>, EngineError>;

    /// Delete a protection execution, including its backing storage.
    async fn delete_policy_execution(&self, execution_id: &str) -> Result<(), EngineError>;

    /// Fetch a registered resource.
    async fn get_resource(&self, resource_id: &str) -> Result<EngineResource, EngineError>;

    /// Fetch the action binding for a resource under a policy.
    async fn get_resource_action(
        &self,
        policy_id: &str,
        resource_id: &str,
    ) -> Result<ResourceAction, EngineError>;
}
