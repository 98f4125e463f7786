//! Orchestration configuration
//!
//! One explicit struct passed to the orchestrator's constructor, replacing
//! any process-global option registry. Every recognized option is a field
//! here with a serde default, so a partial TOML table deserializes into a
//! fully-populated config.

use crate::strategy::StrategyKind;
use serde::{Deserialize, Serialize};

/// Settings for the orchestration core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Interval of the optimization control loop, in seconds
    ///
    /// **Default:** 30
    #[serde(default = "default_protect_interval_secs")]
    pub protect_interval_secs: u64,

    /// Interval of the retention (cleanup) loop, in seconds
    ///
    /// **Default:** 3600 (1 hour)
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,

    /// Maximum interval between forced protect actions, in minutes.
    ///
    /// Even if the strategy never requests a protect, one is forced at
    /// least this often via the loop countdown.
    ///
    /// **Default:** 30
    #[serde(default = "default_max_protection_interval_mins")]
    pub max_protection_interval_mins: u64,

    /// Name of the workload policy resources are committed under.
    ///
    /// The policy is discovered by this name on first bootstrap, or created
    /// if the engine does not know it yet.
    #[serde(default = "default_policy_name")]
    pub policy_name: String,

    /// Numeric marker the engine uses for instance resources
    ///
    /// **Default:** 1
    #[serde(default = "default_instance_type_id")]
    pub instance_type_id: u32,

    /// Numeric marker the engine uses for volume resources
    ///
    /// **Default:** 2
    #[serde(default = "default_volume_type_id")]
    pub volume_type_id: u32,

    /// Display name of the default replication action for instances
    ///
    /// **Default:** "Image Copy"
    #[serde(default = "default_instance_action")]
    pub default_instance_action: String,

    /// Display name of the replication action for volumes
    ///
    /// **Default:** "Volume Replication"
    #[serde(default = "default_volume_replication_action")]
    pub default_volume_replication_action: String,

    /// Display name of the snapshot action for volumes
    ///
    /// **Default:** "Volume Snapshot"
    #[serde(default = "default_volume_snapshot_action")]
    pub default_volume_snapshot_action: String,

    /// Volume subtype that selects the replication action; volumes of any
    /// other subtype fall back to snapshot
    ///
    /// **Default:** "drbddriver-1"
    #[serde(default = "default_volume_replication_subtype")]
    pub volume_replication_subtype: String,

    /// Decision strategy driving the optimization loop
    #[serde(default)]
    pub strategy: StrategyKind,
}

fn default_protect_interval_secs() -> u64 {
    30
}

fn default_cleanup_interval_secs() -> u64 {
    3600
}

fn default_max_protection_interval_mins() -> u64 {
    30
}

fn default_policy_name() -> String {
    "warden-primary".to_string()
}

fn default_instance_type_id() -> u32 {
    1
}

fn default_volume_type_id() -> u32 {
    2
}

fn default_instance_action() -> String {
    "Image Copy".to_string()
}

fn default_volume_replication_action() -> String {
    "Volume Replication".to_string()
}

fn default_volume_snapshot_action() -> String {
    "Volume Snapshot".to_string()
}

fn default_volume_replication_subtype() -> String {
    "drbddriver-1".to_string()
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            protect_interval_secs: default_protect_interval_secs(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
            max_protection_interval_mins: default_max_protection_interval_mins(),
            policy_name: default_policy_name(),
            instance_type_id: default_instance_type_id(),
            volume_type_id: default_volume_type_id(),
            default_instance_action: default_instance_action(),
            default_volume_replication_action: default_volume_replication_action(),
            default_volume_snapshot_action: default_volume_snapshot_action(),
            volume_replication_subtype: default_volume_replication_subtype(),
            strategy: StrategyKind::default(),
        }
    }
}

impl ControlConfig {
    /// The countdown default: how many loop ticks may pass before a protect
    /// is forced. Derived so that a protect fires at least once every
    /// `max_protection_interval_mins`, whatever the tick interval is.
    pub fn default_protect_loops(&self) -> u32 {
        ((60 * self.max_protection_interval_mins) / self.protect_interval_secs) as u32
    }

    /// Validate the configuration.
    ///
    /// Returns an error message if any option is unusable.
    pub fn validate(&self) -> Result<(), String> {
        if self.protect_interval_secs == 0 {
            return Err("protect_interval_secs must be greater than 0".to_string());
        }

        if self.cleanup_interval_secs == 0 {
            return Err("cleanup_interval_secs must be greater than 0".to_string());
        }

        if self.max_protection_interval_mins == 0 {
            return Err("max_protection_interval_mins must be greater than 0".to_string());
        }

        if self.policy_name.trim().is_empty() {
            return Err("policy_name must not be empty".to_string());
        }

        if self.instance_type_id == self.volume_type_id {
            return Err("instance_type_id and volume_type_id must differ".to_string());
        }

        Ok(())
    }
}
