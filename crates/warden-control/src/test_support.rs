//! In-memory fakes shared by this crate's unit tests

use crate::inventory::{
    ComputeInventory, InstanceRecord, InventoryError, VolumeInventory, VolumeRecord,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use warden_engine::{
    ActionDescriptor, EngineError, EngineResource, PolicyExecution, ProtectionEngine,
    ResourceAction, WorkloadPolicy,
};

/// How the fake engine should misbehave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    #[default]
    None,
    /// Action catalog listing fails with a transient error
    ListActionsUnavailable,
    /// Resource-action creation fails with a transient error
    ResourceActionTransient,
    /// Resource-action creation is permanently rejected
    ResourceActionRejected,
    /// Execution deletion is rejected
    DeleteExecutionRejected,
}

fn transient() -> EngineError {
    EngineError::Status {
        code: 503,
        body: "engine unavailable".to_string(),
    }
}

fn rejected(body: &str) -> EngineError {
    EngineError::Status {
        code: 409,
        body: body.to_string(),
    }
}

/// Fake engine that records every call and serves canned catalogs.
///
/// The action catalog is fixed: resource type 1 carries "Image Copy",
/// resource type 2 carries "Volume Replication" and "Volume Snapshot",
/// matching the default configuration.
#[derive(Default)]
pub struct RecordingEngine {
    calls: Mutex<Vec<String>>,
    policies: Mutex<Vec<WorkloadPolicy>>,
    recovery_policies: Mutex<Vec<WorkloadPolicy>>,
    executions: Mutex<HashMap<String, Vec<PolicyExecution>>>,
    failure: Mutex<FailureMode>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| {
                // Match at the call-name boundary so a bare name like "recover"
                // does not also count "recovery_list_policy_executions(...)".
                call.starts_with(prefix)
                    && (prefix.contains('(') || call[prefix.len()..].starts_with('('))
            })
            .count()
    }

    pub fn set_failure(&self, mode: FailureMode) {
        *self.failure.lock().unwrap() = mode;
    }

    pub fn add_policy(&self, id: &str, name: &str) {
        self.policies.lock().unwrap().push(WorkloadPolicy {
            id: id.to_string(),
            name: name.to_string(),
        });
    }

    pub fn add_recovery_policy(&self, id: &str, name: &str) {
        self.recovery_policies.lock().unwrap().push(WorkloadPolicy {
            id: id.to_string(),
            name: name.to_string(),
        });
    }

    /// Append an execution for a policy. Executions are served in insertion
    /// order, so insert most-recent-first as the engine contract promises.
    pub fn add_execution(&self, policy_id: &str, execution_id: &str) {
        self.executions
            .lock()
            .unwrap()
            .entry(policy_id.to_string())
            .or_default()
            .push(PolicyExecution {
                id: execution_id.to_string(),
                name: None,
                created_at: None,
            });
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn failure(&self) -> FailureMode {
        *self.failure.lock().unwrap()
    }
}

#[async_trait]
impl ProtectionEngine for RecordingEngine {
    async fn list_actions(
        &self,
        resource_type_id: u32,
    ) -> Result<Vec<ActionDescriptor>, EngineError> {
        self.record(format!("list_actions({})", resource_type_id));

        if self.failure() == FailureMode::ListActionsUnavailable {
            return Err(transient());
        }

        let catalog = match resource_type_id {
            1 => vec![ActionDescriptor {
                id: "action-image-copy".to_string(),
                name: "Image Copy".to_string(),
            }],
            2 => vec![
                ActionDescriptor {
                    id: "action-vol-replication".to_string(),
                    name: "Volume Replication".to_string(),
                },
                ActionDescriptor {
                    id: "action-vol-snapshot".to_string(),
                    name: "Volume Snapshot".to_string(),
                },
            ],
            _ => Vec::new(),
        };
        Ok(catalog)
    }

    async fn list_workload_policies(&self) -> Result<Vec<WorkloadPolicy>, EngineError> {
        self.record("list_workload_policies()".to_string());
        Ok(self.policies.lock().unwrap().clone())
    }

    async fn create_workload_policy(&self, name: &str) -> Result<WorkloadPolicy, EngineError> {
        self.record(format!("create_workload_policy({})", name));

        let policy = WorkloadPolicy {
            id: "policy-1".to_string(),
            name: name.to_string(),
        };
        self.policies.lock().unwrap().push(policy.clone());
        Ok(policy)
    }

    async fn create_resource(
        &self,
        resource_id: &str,
        name: &str,
        resource_type_id: u32,
    ) -> Result<(), EngineError> {
        self.record(format!(
            "create_resource({}, {}, {})",
            resource_id, name, resource_type_id
        ));
        Ok(())
    }

    async fn create_resource_action(
        &self,
        resource_id: &str,
        action_id: &str,
        policy_id: &str,
    ) -> Result<(), EngineError> {
        self.record(format!(
            "create_resource_action({}, {}, {})",
            resource_id, action_id, policy_id
        ));

        match self.failure() {
            FailureMode::ResourceActionTransient => Err(transient()),
            FailureMode::ResourceActionRejected => Err(rejected("unsupported resource")),
            _ => Ok(()),
        }
    }

    async fn protect(&self, policy_id: &str) -> Result<(), EngineError> {
        self.record(format!("protect({})", policy_id));
        Ok(())
    }

    async fn recover(&self, execution_id: &str) -> Result<(), EngineError> {
        self.record(format!("recover({})", execution_id));
        Ok(())
    }

    async fn recovery_list_policies(&self) -> Result<Vec<WorkloadPolicy>, EngineError> {
        self.record("recovery_list_policies()".to_string());
        Ok(self.recovery_policies.lock().unwrap().clone())
    }

    async fn recovery_list_policy_executions(
        &self,
        policy_id: &str,
    ) -> Result<Vec<PolicyExecution>, EngineError> {
        self.record(format!("recovery_list_policy_executions({})", policy_id));
        Ok(self
            .executions
            .lock()
            .unwrap()
            .get(policy_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_policy_execution(&self, execution_id: &str) -> Result<(), EngineError> {
        self.record(format!("delete_policy_execution({})", execution_id));

        if self.failure() == FailureMode::DeleteExecutionRejected {
            return Err(rejected("execution is gone"));
        }

        let mut executions = self.executions.lock().unwrap();
        for list in executions.values_mut() {
            list.retain(|e| e.id != execution_id);
        }
        Ok(())
    }

    async fn get_resource(&self, resource_id: &str) -> Result<EngineResource, EngineError> {
        self.record(format!("get_resource({})", resource_id));
        Err(EngineError::Status {
            code: 404,
            body: format!("no resource {}", resource_id),
        })
    }

    async fn get_resource_action(
        &self,
        policy_id: &str,
        resource_id: &str,
    ) -> Result<ResourceAction, EngineError> {
        self.record(format!("get_resource_action({}, {})", policy_id, resource_id));
        Err(EngineError::Status {
            code: 404,
            body: format!("no action for {} in {}", resource_id, policy_id),
        })
    }
}

/// Fixed-content inventory serving both the compute and volume lookups.
#[derive(Default)]
pub struct StaticInventory {
    instances: HashMap<String, InstanceRecord>,
    volumes: HashMap<String, VolumeRecord>,
}

impl StaticInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instance(mut self, id: &str, name: &str, state: &str) -> Self {
        self.instances.insert(
            id.to_string(),
            InstanceRecord {
                id: id.to_string(),
                display_name: name.to_string(),
                state: state.to_string(),
            },
        );
        self
    }

    pub fn with_volume(mut self, id: &str, name: &str, status: &str, subtype: Option<&str>) -> Self {
        self.volumes.insert(
            id.to_string(),
            VolumeRecord {
                id: id.to_string(),
                display_name: name.to_string(),
                status: status.to_string(),
                volume_type: subtype.map(str::to_string),
            },
        );
        self
    }
}

#[async_trait]
impl ComputeInventory for StaticInventory {
    async fn get_instance(&self, instance_id: &str) -> Result<InstanceRecord, InventoryError> {
        self.instances
            .get(instance_id)
            .cloned()
            .ok_or_else(|| InventoryError::NotFound(instance_id.to_string()))
    }
}

#[async_trait]
impl VolumeInventory for StaticInventory {
    async fn get_volume(&self, volume_id: &str) -> Result<VolumeRecord, InventoryError> {
        self.volumes
            .get(volume_id)
            .cloned()
            .ok_or_else(|| InventoryError::NotFound(volume_id.to_string()))
    }
}
