//! Admission checks for protect requests
//!
//! A protect request passes three gates before a resource is accepted into
//! the ledger: the capacity predicate, the inventory lookup, and the
//! protectable-state check. The capacity predicate is pluggable; the
//! reference implementation approves everything.

use crate::error::ControlError;
use crate::inventory::{InstanceRecord, VolumeRecord};

/// Instance state in which protection may be requested
pub const PROTECTABLE_INSTANCE_STATE: &str = "active";

/// Volume statuses in which protection may be requested
pub const PROTECTABLE_VOLUME_STATES: &[&str] = &["available", "in-use"];

/// Global admission predicate: is there capacity to take on one more
/// resource?
///
/// Called once per protect request before any lookup or engine call.
/// Implementations should be cheap and must not block.
pub trait AdmissionGate: Send + Sync {
    /// `pending` is the number of resources currently awaiting commitment.
    fn admit(&self, pending: usize) -> bool;
}

/// Reference gate: always approves.
#[derive(Debug, Default)]
pub struct UnboundedGate;

impl AdmissionGate for UnboundedGate {
    fn admit(&self, _pending: usize) -> bool {
        true
    }
}

/// Check that an instance is in a protectable state.
pub fn check_instance_protectable(instance: &InstanceRecord) -> Result<(), ControlError> {
    if instance.state == PROTECTABLE_INSTANCE_STATE {
        Ok(())
    } else {
        Err(ControlError::NotProtectable {
            id: instance.id.clone(),
            state: instance.state.clone(),
        })
    }
}

/// Check that a volume is in a protectable state.
pub fn check_volume_protectable(volume: &VolumeRecord) -> Result<(), ControlError> {
    if PROTECTABLE_VOLUME_STATES.contains(&volume.status.as_str()) {
        Ok(())
    } else {
        Err(ControlError::NotProtectable {
            id: volume.id.clone(),
            state: volume.status.clone(),
        })
    }
}
