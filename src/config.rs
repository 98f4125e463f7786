/*!
 * Service configuration for warden
 */

use crate::error::{Result, WardenError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::Level;
use warden_control::ControlConfig;
use warden_engine::EngineConfig;

/// Log verbosity for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level for diagnostic output
    #[serde(default)]
    pub level: LogLevel,

    /// Log file path (None = stdout)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Endpoint of an inventory service (compute or block storage)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryEndpoint {
    /// Base URL of the inventory API
    #[serde(default = "default_inventory_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_inventory_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_inventory_endpoint() -> String {
    "http://127.0.0.1:8774".to_string()
}

fn default_inventory_timeout_secs() -> u64 {
    30
}

impl Default for InventoryEndpoint {
    fn default() -> Self {
        Self {
            endpoint: default_inventory_endpoint(),
            timeout_secs: default_inventory_timeout_secs(),
        }
    }
}

/// Top-level service configuration, loaded from a TOML file.
///
/// Every section has full defaults, so an empty file (or no file at all)
/// yields a runnable local configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WardenConfig {
    /// External DR engine connection
    #[serde(default)]
    pub engine: EngineConfig,

    /// Compute inventory service
    #[serde(default)]
    pub compute: InventoryEndpoint,

    /// Block-storage inventory service
    #[serde(default)]
    pub volume: InventoryEndpoint,

    /// Orchestration core settings
    #[serde(default)]
    pub control: ControlConfig,

    /// Logging
    #[serde(default)]
    pub log: LogConfig,
}

impl WardenConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| WardenError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load configuration, falling back to defaults if the file does not
    /// exist (a bad file is still an error).
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
