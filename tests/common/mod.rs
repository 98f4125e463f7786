//! Shared fixtures for warden integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use warden_control::inventory::{
    ComputeInventory, InstanceRecord, InventoryError, VolumeInventory, VolumeRecord,
};
use warden_control::{ControlConfig, Orchestrator};
use warden_engine::{
    ActionDescriptor, EngineError, EngineResource, PolicyExecution, ProtectionEngine,
    ResourceAction, WorkloadPolicy,
};

/// In-memory engine double recording every call.
///
/// Serves the default action catalog (resource type 1: "Image Copy";
/// resource type 2: "Volume Replication" and "Volume Snapshot") and an
/// execution store that deletions actually mutate.
#[derive(Default)]
pub struct MockEngine {
    calls: Mutex<Vec<String>>,
    policies: Mutex<Vec<WorkloadPolicy>>,
    recovery_policies: Mutex<Vec<WorkloadPolicy>>,
    executions: Mutex<HashMap<String, Vec<PolicyExecution>>>,
    unavailable: AtomicBool,
}

impl MockEngine {
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

    /// Make every engine call fail with a transient error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn add_recovery_policy(&self, id: &str, name: &str) {
        self.recovery_policies.lock().unwrap().push(WorkloadPolicy {
            id: id.to_string(),
            name: name.to_string(),
        });
    }

    /// Append an execution; insert most-recent-first as the engine does.
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

    pub fn execution_ids(&self, policy_id: &str) -> Vec<String> {
        self.executions
            .lock()
            .unwrap()
            .get(policy_id)
            .map(|list| list.iter().map(|e| e.id.clone()).collect())
            .unwrap_or_default()
    }

    fn record(&self, call: String) -> Result<(), EngineError> {
        self.calls.lock().unwrap().push(call);
        if self.unavailable.load(Ordering::SeqCst) {
            Err(EngineError::Status {
                code: 503,
                body: "engine unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProtectionEngine for MockEngine {
    async fn list_actions(
        &self,
        resource_type_id: u32,
    ) -> Result<Vec<ActionDescriptor>, EngineError> {
        self.record(format!("list_actions({})", resource_type_id))?;

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
        self.record("list_workload_policies()".to_string())?;
        Ok(self.policies.lock().unwrap().clone())
    }

    async fn create_workload_policy(&self, name: &str) -> Result<WorkloadPolicy, EngineError> {
        self.record(format!("create_workload_policy({})", name))?;

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
        ))
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
        ))
    }

    async fn protect(&self, policy_id: &str) -> Result<(), EngineError> {
        self.record(format!("protect({})", policy_id))
    }

    async fn recover(&self, execution_id: &str) -> Result<(), EngineError> {
        self.record(format!("recover({})", execution_id))
    }

    async fn recovery_list_policies(&self) -> Result<Vec<WorkloadPolicy>, EngineError> {
        self.record("recovery_list_policies()".to_string())?;
        Ok(self.recovery_policies.lock().unwrap().clone())
    }

    async fn recovery_list_policy_executions(
        &self,
        policy_id: &str,
    ) -> Result<Vec<PolicyExecution>, EngineError> {
        self.record(format!("recovery_list_policy_executions({})", policy_id))?;
        Ok(self
            .executions
            .lock()
            .unwrap()
            .get(policy_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_policy_execution(&self, execution_id: &str) -> Result<(), EngineError> {
        self.record(format!("delete_policy_execution({})", execution_id))?;

        let mut executions = self.executions.lock().unwrap();
        for list in executions.values_mut() {
            list.retain(|e| e.id != execution_id);
        }
        Ok(())
    }

    async fn get_resource(&self, resource_id: &str) -> Result<EngineResource, EngineError> {
        self.record(format!("get_resource({})", resource_id))?;
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
        self.record(format!("get_resource_action({}, {})", policy_id, resource_id))?;
        Err(EngineError::Status {
            code: 404,
            body: format!("no action for {} in {}", resource_id, policy_id),
        })
    }
}

/// Inventory double with a fixed set of instances and volumes.
#[derive(Default)]
pub struct MockInventory {
    instances: HashMap<String, InstanceRecord>,
    volumes: HashMap<String, VolumeRecord>,
}

impl MockInventory {
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
impl ComputeInventory for MockInventory {
    async fn get_instance(&self, instance_id: &str) -> Result<InstanceRecord, InventoryError> {
        self.instances
            .get(instance_id)
            .cloned()
            .ok_or_else(|| InventoryError::NotFound(instance_id.to_string()))
    }
}

#[async_trait]
impl VolumeInventory for MockInventory {
    async fn get_volume(&self, volume_id: &str) -> Result<VolumeRecord, InventoryError> {
        self.volumes
            .get(volume_id)
            .cloned()
            .ok_or_else(|| InventoryError::NotFound(volume_id.to_string()))
    }
}

/// Orchestrator wired to the given engine and a default inventory.
pub fn orchestrator(config: ControlConfig, engine: Arc<MockEngine>) -> Orchestrator {
    let inventory = Arc::new(
        MockInventory::new()
            .with_instance("i1", "web-1", "active")
            .with_instance("i-stopped", "batch-1", "stopped")
            .with_volume("v1", "data-1", "available", Some("drbddriver-1"))
            .with_volume("v-deleted", "old-1", "deleted", None)
            .with_volume("v-lvm", "scratch-1", "in-use", Some("lvm")),
    );
    Orchestrator::new(config, engine, inventory.clone(), inventory).unwrap()
}
