//! Resource identity as tracked by the orchestration core

use crate::error::ControlError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of compute resource a protect request refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// A VM instance
    Instance,
    /// A storage volume
    Volume,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Instance => write!(f, "Instance"),
            ResourceKind::Volume => write!(f, "Volume"),
        }
    }
}

impl FromStr for ResourceKind {
    type Err = ControlError;

    /// Parse the kind as it arrives from the request boundary.
    ///
    /// Anything other than "Instance" or "Volume" is an
    /// [`ControlError::UnknownResourceKind`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Instance" => Ok(ResourceKind::Instance),
            "Volume" => Ok(ResourceKind::Volume),
            other => Err(ControlError::UnknownResourceKind(other.to_string())),
        }
    }
}

/// A resource accepted for eventual protection.
///
/// Created by the admission handler on a successful protect request; lives
/// in the [`PendingLedger`](crate::ledger::PendingLedger) until the periodic
/// loop commits it into the workload policy. The ledger is not persisted:
/// a process restart drops pending resources and they must be re-submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectableResource {
    /// Opaque resource identifier (instance or volume UUID)
    pub id: String,

    /// Resource kind, selecting the default protection action
    pub kind: ResourceKind,

    /// Volume subtype (volumes only); the configured replication subtype
    /// maps to the replication action, everything else to snapshot
    pub volume_subtype: Option<String>,
}

impl ProtectableResource {
    /// An instance pending protection
    pub fn instance(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ResourceKind::Instance,
            volume_subtype: None,
        }
    }

    /// A volume pending protection
    pub fn volume(id: impl Into<String>, subtype: Option<String>) -> Self {
        Self {
            id: id.into(),
            kind: ResourceKind::Volume,
            volume_subtype: subtype,
        }
    }
}
