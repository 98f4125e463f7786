//! Warden Control: the DR orchestration core
//!
//! Clients ask the control plane to protect compute resources; an external
//! DR engine performs the actual protection actions. This crate decides
//! *when* and *what*: admitted resources wait in an in-memory ledger until
//! the periodic optimization loop commits them into a workload policy and,
//! periodically, tells the engine to protect that policy.
//!
//! # Architecture: the tick state machine
//!
//! ```text
//! ┌─────────────┐
//! │  Bootstrap  │──> Resolve policy + default actions (until it succeeds)
//! └──────┬──────┘
//!        │
//!        v
//! ┌─────────────┐
//! │  Decide     │──> Ask the strategy: protect now? include what?
//! └──────┬──────┘
//!        │
//!        v
//! ┌─────────────┐
//! │  Commit     │──> Bind included resources to actions, drain ledger
//! └──────┬──────┘
//!        │
//!        v
//! ┌─────────────┐
//! │  Protect    │──> Strategy asked, or countdown ran out? protect policy
//! └──────┬──────┘
//!        │
//!        └────> Next tick
//! ```
//!
//! A separate retention sweeper prunes stale protection executions, and the
//! recovery workflow replays the most recent execution of a failed
//! datacenter's policies.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use warden_control::{ControlConfig, Orchestrator, ResourceKind, RetentionSweeper};
//! use warden_engine::{EngineConfig, RemoteEngine};
//! # use warden_control::inventory::{ComputeInventory, VolumeInventory};
//!
//! # async fn example(
//! #     compute: Arc<dyn ComputeInventory>,
//! #     volumes: Arc<dyn VolumeInventory>,
//! # ) -> anyhow::Result<()> {
//! let engine = Arc::new(RemoteEngine::new(EngineConfig::default())?);
//! let config = ControlConfig::default();
//!
//! let sweeper = RetentionSweeper::new(engine.clone(), config.cleanup_interval_secs);
//! let orchestrator = Arc::new(Orchestrator::new(config, engine, compute, volumes)?);
//!
//! // Background loops
//! let loop_handle = orchestrator.clone();
//! tokio::spawn(async move { loop_handle.run().await });
//! tokio::spawn(async move { sweeper.run().await });
//!
//! // Entry point called by the request layer
//! orchestrator.protect("6e5f...", ResourceKind::Instance).await?;
//! # Ok(())
//! # }
//! ```

pub mod admission;
pub mod config;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod orchestrator;
pub mod recovery;
pub mod resource;
pub mod retention;
pub mod stats;
pub mod strategy;

#[cfg(test)]
pub(crate) mod test_support;

pub use admission::{AdmissionGate, UnboundedGate};
pub use config::ControlConfig;
pub use error::ControlError;
pub use ledger::PendingLedger;
pub use orchestrator::Orchestrator;
pub use recovery::{HostnameResolver, PolicyResolver, RecoveryReport};
pub use resource::{ProtectableResource, ResourceKind};
pub use retention::RetentionSweeper;
pub use stats::{RetentionStats, TickStats};
pub use strategy::{Decision, DecisionStrategy, IncludeAllStrategy, StrategyKind, TrafficShapingStrategy};
