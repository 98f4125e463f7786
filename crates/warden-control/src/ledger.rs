//! The pending-resource ledger
//!
//! An in-memory, insertion-ordered collection of resources accepted for
//! eventual protection. Two actors mutate it: the admission handler appends,
//! the periodic loop drains on commit. All access goes through one async
//! mutex so appends and drains serialize, and the loop's decide phase reads
//! a consistent snapshot: a resource submitted mid-tick lands either in that
//! tick's snapshot or in the next one, never half in both.

use crate::resource::ProtectableResource;
use tokio::sync::Mutex;

/// Mutex-guarded queue of resources awaiting commitment to a policy.
///
/// Not persisted: a process restart drops pending entries (they must be
/// re-submitted). Membership is at-most-once per resource id.
#[derive(Debug, Default)]
pub struct PendingLedger {
    entries: Mutex<Vec<ProtectableResource>>,
}

impl PendingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resource unless one with the same id is already pending.
    ///
    /// Returns `false` (leaving the ledger unchanged) on a duplicate, so
    /// concurrent duplicate submissions collapse to a single entry.
    pub async fn insert(&self, resource: ProtectableResource) -> bool {
        let mut entries = self.entries.lock().await;
        if entries.iter().any(|r| r.id == resource.id) {
            return false;
        }
        entries.push(resource);
        true
    }

    /// Whether a resource id is currently pending.
    pub async fn contains(&self, resource_id: &str) -> bool {
        let entries = self.entries.lock().await;
        entries.iter().any(|r| r.id == resource_id)
    }

    /// A consistent snapshot of the pending set, in insertion order.
    pub async fn snapshot(&self) -> Vec<ProtectableResource> {
        let entries = self.entries.lock().await;
        entries.clone()
    }

    /// Remove a resource by id. Returns `false` if it was not pending
    /// (already committed, or never submitted).
    pub async fn remove(&self, resource_id: &str) -> bool {
        let mut entries = self.entries.lock().await;
        match entries.iter().position(|r| r.id == resource_id) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of pending resources.
    pub async fn len(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.len()
    }

    /// Whether the ledger is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
