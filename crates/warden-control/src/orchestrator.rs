//! The orchestration manager and its periodic optimization loop
//!
//! The [`Orchestrator`] owns the pending-resource ledger and the workload
//! policy identity. Admission requests append to the ledger; the periodic
//! loop asks the configured strategy what to commit, binds those resources
//! to their default actions in the engine, and issues protect commands —
//! either when the strategy asks for one or when the forced-protect
//! countdown runs out.

use crate::admission::{self, AdmissionGate, UnboundedGate};
use crate::config::ControlConfig;
use crate::error::ControlError;
use crate::inventory::{ComputeInventory, VolumeInventory};
use crate::ledger::PendingLedger;
use crate::recovery::{self, HostnameResolver, PolicyResolver, RecoveryReport};
use crate::resource::{ProtectableResource, ResourceKind};
use crate::stats::{TickStats, TickStatsBuilder};
use crate::strategy::DecisionStrategy;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use warden_engine::{ActionDescriptor, ProtectionEngine, WorkloadPolicy};

/// Identity resolved from the engine on the first successful bootstrap:
/// the workload policy and the default action ids per resource kind.
/// Immutable for the rest of the process lifetime.
#[derive(Debug, Clone)]
struct Bootstrap {
    policy: WorkloadPolicy,
    instance_action: String,
    volume_replication_action: String,
    volume_snapshot_action: String,
}

impl Bootstrap {
    /// Select the default action id for a resource: instances get the
    /// instance action; volumes of the configured replication subtype get
    /// replication, all others snapshot.
    fn action_for<'a>(&'a self, resource: &ProtectableResource, config: &ControlConfig) -> &'a str {
        match resource.kind {
            ResourceKind::Instance => &self.instance_action,
            ResourceKind::Volume => match resource.volume_subtype.as_deref() {
                Some(subtype) if subtype == config.volume_replication_subtype => {
                    &self.volume_replication_action
                }
                _ => &self.volume_snapshot_action,
            },
        }
    }
}

/// Mutable loop state, touched only with the state mutex held.
struct LoopState {
    bootstrap: Option<Bootstrap>,
    loops_remaining: u32,
    strategy: Box<dyn DecisionStrategy>,
}

/// The orchestration manager.
///
/// Shared behind an `Arc`: admission and recovery entry points take `&self`
/// and may be called concurrently with the running loop. The ledger mutex
/// serializes appends against the loop's snapshot/drain, so a resource
/// submitted mid-tick is either part of that tick's decision or deferred to
/// the next — never both.
pub struct Orchestrator {
    config: ControlConfig,
    engine: Arc<dyn ProtectionEngine>,
    compute: Arc<dyn ComputeInventory>,
    volumes: Arc<dyn VolumeInventory>,
    gate: Box<dyn AdmissionGate>,
    resolver: Box<dyn PolicyResolver>,
    ledger: PendingLedger,
    state: Mutex<LoopState>,
}

impl Orchestrator {
    /// Build an orchestrator with the reference admission gate
    /// (always-approve), the hostname policy resolver, and the strategy
    /// named in the configuration.
    pub fn new(
        config: ControlConfig,
        engine: Arc<dyn ProtectionEngine>,
        compute: Arc<dyn ComputeInventory>,
        volumes: Arc<dyn VolumeInventory>,
    ) -> Result<Self, ControlError> {
        config.validate().map_err(ControlError::Config)?;

        let strategy = config.strategy.build();
        let loops_remaining = config.default_protect_loops();

        Ok(Self {
            config,
            engine,
            compute,
            volumes,
            gate: Box::new(UnboundedGate),
            resolver: Box::new(HostnameResolver),
            ledger: PendingLedger::new(),
            state: Mutex::new(LoopState {
                bootstrap: None,
                loops_remaining,
                strategy,
            }),
        })
    }

    /// Replace the admission gate.
    pub fn with_gate(mut self, gate: Box<dyn AdmissionGate>) -> Self {
        self.gate = gate;
        self
    }

    /// Replace the datacenter policy resolver.
    pub fn with_resolver(mut self, resolver: Box<dyn PolicyResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the decision strategy (before the loop is started).
    pub fn with_strategy(mut self, strategy: Box<dyn DecisionStrategy>) -> Self {
        self.state.get_mut().strategy = strategy;
        self
    }

    /// Number of resources currently awaiting commitment.
    pub async fn pending(&self) -> usize {
        self.ledger.len().await
    }

    // ------------------------------------------------------------------
    // Admission
    // ------------------------------------------------------------------

    /// Accept a resource for eventual protection.
    ///
    /// This does not protect the resource immediately; it registers it with
    /// the engine and queues it until the optimization loop decides it is a
    /// good time. Fails (mutating nothing) if capacity is exhausted, the
    /// resource cannot be found, or it is not in a protectable state.
    /// Re-submitting an already-pending resource is accepted as a no-op.
    pub async fn protect(
        &self,
        resource_id: &str,
        kind: ResourceKind,
    ) -> Result<(), ControlError> {
        if !self.gate.admit(self.ledger.len().await) {
            warn!("no capacity to protect more resources; rejecting {}", resource_id);
            return Err(ControlError::InsufficientCapacity);
        }

        if self.ledger.contains(resource_id).await {
            debug!("resource {} is already pending protection", resource_id);
            return Ok(());
        }

        let resource = match kind {
            ResourceKind::Instance => {
                let instance = self
                    .compute
                    .get_instance(resource_id)
                    .await
                    .map_err(|e| ControlError::from_inventory(resource_id, e))?;
                admission::check_instance_protectable(&instance)?;

                self.engine
                    .create_resource(&instance.id, &instance.display_name, self.config.instance_type_id)
                    .await?;
                ProtectableResource::instance(instance.id)
            }
            ResourceKind::Volume => {
                let volume = self
                    .volumes
                    .get_volume(resource_id)
                    .await
                    .map_err(|e| ControlError::from_inventory(resource_id, e))?;
                admission::check_volume_protectable(&volume)?;

                self.engine
                    .create_resource(&volume.id, &volume.display_name, self.config.volume_type_id)
                    .await?;
                ProtectableResource::volume(volume.id, volume.volume_type)
            }
        };

        if self.ledger.insert(resource).await {
            info!("resource {} accepted for protection", resource_id);
        } else {
            debug!("resource {} was submitted concurrently; keeping one entry", resource_id);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Recovery
    // ------------------------------------------------------------------

    /// Recover everything protected for a failed datacenter.
    ///
    /// Resolves the datacenter's policies (no engine calls; fails with
    /// [`ControlError::DatacenterPolicyNotFound`] if none resolve) and
    /// replays the most recent protection execution of each. Policies are
    /// processed aggregate-and-continue; see [`RecoveryReport`].
    pub async fn recover(&self, datacenter: &str) -> Result<RecoveryReport, ControlError> {
        recovery::recover_datacenter(self.resolver.as_ref(), self.engine.as_ref(), datacenter)
            .await
    }

    // ------------------------------------------------------------------
    // The optimization loop
    // ------------------------------------------------------------------

    /// Main loop — runs for the process lifetime.
    ///
    /// Typically spawned as a background tokio task. The first tick fires
    /// immediately, then every `protect_interval_secs`. A failed tick is
    /// logged and the loop proceeds to the next scheduled tick; ticks are
    /// not queued or coalesced.
    pub async fn run(&self) {
        info!(
            "🛡️  Orchestrator active | policy: {} | tick: {}s | forced protect every {} ticks | strategy: {:?}",
            self.config.policy_name,
            self.config.protect_interval_secs,
            self.config.default_protect_loops(),
            self.config.strategy,
        );

        let mut interval =
            tokio::time::interval(Duration::from_secs(self.config.protect_interval_secs));
        // A slow tick delays the next one; missed ticks are never bursted.
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            self.run_tick().await;
        }
    }

    /// Execute a single optimization tick.
    ///
    /// Public so embedders and tests can drive the loop manually.
    pub async fn run_tick(&self) {
        let mut state = self.state.lock().await;

        match self.tick(&mut state).await {
            Ok(stats) => info!("📊 {}", stats.summary()),
            Err(e) => error!("optimization tick failed: {}", e),
        }
    }

    /// One pass of the tick state machine: bootstrap, decide, commit,
    /// protect gate. Any error aborts the tick; the next tick starts from
    /// wherever the persistent state (bootstrap, countdown, ledger) was
    /// left.
    async fn tick(&self, state: &mut LoopState) -> Result<TickStats, ControlError> {
        // Bootstrap until it succeeds; nothing commits or protects before.
        let bootstrap = match state.bootstrap.clone() {
            Some(bootstrap) => bootstrap,
            None => {
                let bootstrap = self.bootstrap().await?;
                info!(
                    "workload policy {:?} resolved with id {}",
                    bootstrap.policy.name, bootstrap.policy.id
                );
                state.bootstrap = Some(bootstrap.clone());
                bootstrap
            }
        };

        let pending = self.ledger.snapshot().await;
        let decision = state.strategy.decide(&pending);
        debug!(
            "strategy included {} of {} pending resources (trigger protect: {})",
            decision.include.len(),
            pending.len(),
            decision.trigger_protect
        );

        let mut stats = TickStatsBuilder::new(pending.len(), decision.include.len());
        for resource in &decision.include {
            self.commit_resource(&bootstrap, resource, &mut stats).await;
        }

        // Protect gate: strategy request, or the countdown running out,
        // issues a protect and rewinds the countdown to its default.
        state.loops_remaining = state.loops_remaining.saturating_sub(1);
        if decision.trigger_protect || state.loops_remaining == 0 {
            self.engine.protect(&bootstrap.policy.id).await?;
            stats.record_protect(!decision.trigger_protect);
            state.loops_remaining = self.config.default_protect_loops();
            debug!(
                "protect issued for policy {}; countdown reset to {}",
                bootstrap.policy.id, state.loops_remaining
            );
        }

        Ok(stats.finish())
    }

    /// Commit one resource: bind it to its default action under the active
    /// policy and drop it from the ledger once the engine confirms.
    ///
    /// A transient engine failure leaves the resource pending for the next
    /// tick. A permanent rejection drops it — logged, not retried.
    async fn commit_resource(
        &self,
        bootstrap: &Bootstrap,
        resource: &ProtectableResource,
        stats: &mut TickStatsBuilder,
    ) {
        let action_id = bootstrap.action_for(resource, &self.config);

        match self
            .engine
            .create_resource_action(&resource.id, action_id, &bootstrap.policy.id)
            .await
        {
            Ok(()) => {
                self.ledger.remove(&resource.id).await;
                stats.record_committed();
                debug!("resource {} committed with action {}", resource.id, action_id);
            }
            Err(e) if e.is_transient() => {
                stats.record_deferred();
                warn!("resource {} deferred to next tick: {}", resource.id, e);
            }
            Err(e) => {
                self.ledger.remove(&resource.id).await;
                stats.record_dropped();
                error!("not protecting resource {}: engine rejected it: {}", resource.id, e);
            }
        }
    }

    /// Resolve the workload policy and the default action ids.
    ///
    /// Runs at the top of every tick until it succeeds once; each
    /// resolution failure aborts the tick and is retried on the next.
    async fn bootstrap(&self) -> Result<Bootstrap, ControlError> {
        debug!("bootstrapping orchestration identity");

        let instance_catalog = self.engine.list_actions(self.config.instance_type_id).await?;
        let instance_action = find_action(
            &instance_catalog,
            &self.config.default_instance_action,
            self.config.instance_type_id,
        )?;

        let volume_catalog = self.engine.list_actions(self.config.volume_type_id).await?;
        let volume_replication_action = find_action(
            &volume_catalog,
            &self.config.default_volume_replication_action,
            self.config.volume_type_id,
        )?;
        let volume_snapshot_action = find_action(
            &volume_catalog,
            &self.config.default_volume_snapshot_action,
            self.config.volume_type_id,
        )?;

        let policy = self.resolve_policy().await?;

        Ok(Bootstrap {
            policy,
            instance_action,
            volume_replication_action,
            volume_snapshot_action,
        })
    }

    /// Discover the configured workload policy, creating it if the engine
    /// does not know it yet.
    async fn resolve_policy(&self) -> Result<WorkloadPolicy, ControlError> {
        for policy in self.engine.list_workload_policies().await? {
            if policy.name == self.config.policy_name {
                debug!("workload policy {:?} already exists", policy.name);
                return Ok(policy);
            }
        }

        info!("creating workload policy {:?}", self.config.policy_name);
        Ok(self
            .engine
            .create_workload_policy(&self.config.policy_name)
            .await?)
    }
}

/// Match an action in the catalog by display name.
fn find_action(
    catalog: &[ActionDescriptor],
    name: &str,
    resource_type_id: u32,
) -> Result<String, ControlError> {
    catalog
        .iter()
        .find(|action| action.name == name)
        .map(|action| action.id.clone())
        .ok_or_else(|| ControlError::DefaultActionNotFound {
            name: name.to_string(),
            resource_type_id,
        })
}
