//! Recovery workflow for a failed datacenter
//!
//! Resolves the workload policies belonging to the failed site and replays
//! the most recent protection execution of each. Policy resolution is a
//! local naming-convention lookup — it never touches the engine, so an
//! unresolvable datacenter fails before any engine call is made.

use crate::error::ControlError;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use warden_engine::ProtectionEngine;

/// Maps a datacenter reference to the workload policies protecting it.
///
/// Pluggable so deployments with their own policy naming schemes can swap
/// the convention. Implementations must resolve locally (no engine calls).
pub trait PolicyResolver: Send + Sync {
    /// Policy references for the datacenter; empty means none resolve.
    fn resolve(&self, datacenter: &str) -> Vec<String>;
}

/// Reference resolver: one policy per datacenter, named after its hostname.
#[derive(Debug, Default)]
pub struct HostnameResolver;

impl PolicyResolver for HostnameResolver {
    fn resolve(&self, datacenter: &str) -> Vec<String> {
        let hostname = datacenter.trim();
        if hostname.is_empty() {
            Vec::new()
        } else {
            vec![hostname.to_string()]
        }
    }
}

/// Outcome of recovering one policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyOutcome {
    /// The policy that was attempted
    pub policy: String,

    /// The execution that was replayed, when recovery was issued
    pub execution: Option<String>,

    /// Why recovery was not issued, when it failed
    pub error: Option<String>,
}

impl PolicyOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate result of a datacenter recovery.
///
/// Policies are processed aggregate-and-continue: a failure on one never
/// prevents attempting the others, and the report carries every per-policy
/// outcome so partial success is visible to the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecoveryReport {
    /// The datacenter that was recovered
    pub datacenter: String,

    /// Per-policy outcomes, in resolution order
    pub outcomes: Vec<PolicyOutcome>,
}

impl RecoveryReport {
    fn new(datacenter: &str) -> Self {
        Self {
            datacenter: datacenter.to_string(),
            outcomes: Vec::new(),
        }
    }

    fn record_success(&mut self, policy: String, execution: String) {
        self.outcomes.push(PolicyOutcome {
            policy,
            execution: Some(execution),
            error: None,
        });
    }

    fn record_failure(&mut self, policy: String, error: String) {
        self.outcomes.push(PolicyOutcome {
            policy,
            execution: None,
            error: Some(error),
        });
    }

    /// Whether every resolved policy recovered.
    pub fn fully_recovered(&self) -> bool {
        self.outcomes.iter().all(PolicyOutcome::succeeded)
    }

    /// Format a human-readable summary for the recovery log line.
    pub fn summary(&self) -> String {
        let succeeded = self.outcomes.iter().filter(|o| o.succeeded()).count();
        format!(
            "Recovery of {}: {}/{} policies recovered",
            self.datacenter,
            succeeded,
            self.outcomes.len()
        )
    }
}

/// Run the recovery workflow for a datacenter.
pub async fn recover_datacenter(
    resolver: &dyn PolicyResolver,
    engine: &dyn ProtectionEngine,
    datacenter: &str,
) -> Result<RecoveryReport, ControlError> {
    let policies = resolver.resolve(datacenter);
    if policies.is_empty() {
        return Err(ControlError::DatacenterPolicyNotFound(datacenter.to_string()));
    }

    info!(
        "🚑 recovering datacenter {} across {} policies",
        datacenter,
        policies.len()
    );

    let mut report = RecoveryReport::new(datacenter);
    for policy in policies {
        match recover_policy(engine, &policy).await {
            Ok(execution) => {
                info!("policy {} recovering from execution {}", policy, execution);
                report.record_success(policy, execution);
            }
            Err(e) => {
                error!("policy {} could not be recovered: {}", policy, e);
                report.record_failure(policy, e.to_string());
            }
        }
    }

    info!("📊 {}", report.summary());
    Ok(report)
}

/// Recover one policy: replay its most recent protection execution.
async fn recover_policy(
    engine: &dyn ProtectionEngine,
    policy: &str,
) -> Result<String, ControlError> {
    let executions = engine.recovery_list_policy_executions(policy).await?;

    // Most-recent-first per the engine contract; only the latest is replayed.
    let latest = executions
        .first()
        .ok_or_else(|| ControlError::NothingToRecover(policy.to_string()))?;

    engine.recover(&latest.id).await?;
    Ok(latest.id.clone())
}
