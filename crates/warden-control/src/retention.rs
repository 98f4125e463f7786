//! Retention sweeper: prunes stale protection executions
//!
//! Every policy keeps only its most recent execution; everything older is
//! deleted through the engine, which also removes the backing storage. The
//! sweep is idempotent — deleting an execution that is already gone is a
//! logged no-op, not a failure of the pass.

use crate::stats::RetentionStats;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{debug, info, warn};
use warden_engine::ProtectionEngine;

/// Periodic cleanup task for old protection data.
pub struct RetentionSweeper {
    engine: Arc<dyn ProtectionEngine>,
    interval_secs: u64,
}

impl RetentionSweeper {
    pub fn new(engine: Arc<dyn ProtectionEngine>, interval_secs: u64) -> Self {
        Self {
            engine,
            interval_secs,
        }
    }

    /// Main loop — runs for the process lifetime.
    ///
    /// The first pass runs immediately on startup, then once per interval.
    pub async fn run(&self) {
        info!("🧹 Retention sweeper active | interval: {}s", self.interval_secs);

        let mut ticker = interval(Duration::from_secs(self.interval_secs));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.run_pass().await;
        }
    }

    /// Execute a single retention pass.
    ///
    /// Public so embedders and tests can drive the sweeper manually. Engine
    /// failures are contained: a failed listing skips that policy (or the
    /// pass), a failed deletion is counted and the sweep continues.
    pub async fn run_pass(&self) -> RetentionStats {
        debug!("cleaning up old protection data");
        let start_time = Instant::now();
        let mut stats = RetentionStats::default();

        let policies = match self.engine.recovery_list_policies().await {
            Ok(policies) => policies,
            Err(e) => {
                warn!("retention pass skipped, could not list policies: {}", e);
                stats.duration = Some(start_time.elapsed());
                return stats;
            }
        };

        for policy in policies {
            stats.policies += 1;

            let executions = match self
                .engine
                .recovery_list_policy_executions(&policy.id)
                .await
            {
                Ok(executions) => executions,
                Err(e) => {
                    warn!("skipping policy {}: could not list executions: {}", policy.id, e);
                    continue;
                }
            };

            // Most-recent-first: keep the head, delete the rest.
            for execution in executions.iter().skip(1) {
                match self.engine.delete_policy_execution(&execution.id).await {
                    Ok(()) => {
                        stats.deleted += 1;
                        debug!("deleted stale execution {}", execution.id);
                    }
                    Err(e) => {
                        stats.failed += 1;
                        warn!(
                            "could not delete execution {} (it may already be gone): {}",
                            execution.id, e
                        );
                    }
                }
            }
        }

        stats.duration = Some(start_time.elapsed());
        info!("📊 {}", stats.summary());
        stats
    }
}
