//! Loop statistics and telemetry
//!
//! Tracks what each optimization tick and each retention pass actually did,
//! for the per-tick summary log lines.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Outcome of a single optimization tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickStats {
    /// Resources pending when the tick started
    pub pending_before: usize,

    /// Resources the strategy asked to include
    pub included: usize,

    /// Resources committed (bound to an action and removed from the ledger)
    pub committed: usize,

    /// Resources left pending after a transient engine failure
    pub deferred: usize,

    /// Resources dropped after a permanent engine rejection
    pub dropped: usize,

    /// Whether a protect command was issued this tick
    pub protect_issued: bool,

    /// Whether the protect was forced by the countdown rather than
    /// requested by the strategy
    pub protect_forced: bool,

    /// Time taken by the tick
    pub duration: Option<Duration>,
}

impl TickStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format a human-readable summary for the tick log line.
    pub fn summary(&self) -> String {
        let protect = if self.protect_issued {
            if self.protect_forced {
                "protect: forced"
            } else {
                "protect: requested"
            }
        } else {
            "protect: deferred"
        };

        format!(
            "Tick: {} pending | {} included | {} committed | {} deferred | {} dropped | {}",
            self.pending_before, self.included, self.committed, self.deferred, self.dropped, protect
        )
    }
}

/// Builder accumulating tick stats as the tick progresses
#[derive(Debug)]
pub struct TickStatsBuilder {
    stats: TickStats,
    start_time: Instant,
}

impl TickStatsBuilder {
    pub fn new(pending_before: usize, included: usize) -> Self {
        Self {
            stats: TickStats {
                pending_before,
                included,
                ..TickStats::default()
            },
            start_time: Instant::now(),
        }
    }

    pub fn record_committed(&mut self) {
        self.stats.committed += 1;
    }

    pub fn record_deferred(&mut self) {
        self.stats.deferred += 1;
    }

    pub fn record_dropped(&mut self) {
        self.stats.dropped += 1;
    }

    pub fn record_protect(&mut self, forced: bool) {
        self.stats.protect_issued = true;
        self.stats.protect_forced = forced;
    }

    /// Finalize and return the stats.
    pub fn finish(mut self) -> TickStats {
        self.stats.duration = Some(self.start_time.elapsed());
        self.stats
    }
}

/// Outcome of a single retention pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetentionStats {
    /// Policies inspected
    pub policies: usize,

    /// Stale executions deleted
    pub deleted: usize,

    /// Deletions that failed (already gone, or engine error)
    pub failed: usize,

    /// Time taken by the pass
    pub duration: Option<Duration>,
}

impl RetentionStats {
    /// Format a human-readable summary for the pass log line.
    pub fn summary(&self) -> String {
        format!(
            "Retention: {} policies | {} executions deleted | {} failed",
            self.policies, self.deleted, self.failed
        )
    }
}
