/*!
 * Warden: disaster-recovery orchestration control plane
 *
 * Warden decides, over time, which compute resources (VM instances, storage
 * volumes) should be enrolled into data-protection policies, when to trigger
 * protection actions, and how to drive recovery of a failed site. The actual
 * protection work (snapshotting, replication) is delegated to an external DR
 * engine; warden owns the *when* and *what*.
 *
 * The workspace splits into:
 * - [`warden_control`] — the orchestration core (admission, optimization
 *   loop, recovery workflow, retention sweeper)
 * - [`warden_engine`] — the protocol adapter to the external engine
 * - this crate — service wiring: configuration, logging, inventory
 *   adapters, and the `warden` binary
 */

pub mod config;
pub mod error;
pub mod inventory;
pub mod logging;

pub use config::{InventoryEndpoint, LogConfig, LogLevel, WardenConfig};
pub use error::WardenError;
pub use inventory::{HttpComputeInventory, HttpVolumeInventory};

// The orchestration surface, re-exported for embedders and the request layer
pub use warden_control::{
    ControlConfig, ControlError, Orchestrator, ProtectableResource, RecoveryReport, ResourceKind,
    RetentionSweeper, StrategyKind,
};
pub use warden_engine::{EngineConfig, EngineError, ProtectionEngine, RemoteEngine};
