//! Decision strategies for the optimization loop
//!
//! A strategy looks at the current pending set and answers two questions:
//! should a protect be triggered right now, and which pending resources
//! should be committed into the policy this tick. It never mutates the
//! ledger itself; the orchestrator applies the returned set.
//!
//! Strategies run inline on the loop task, so `decide` must return well
//! inside the tick interval and must not block.

use crate::resource::ProtectableResource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// The two-value decision contract every strategy implements
#[derive(Debug, Clone, Default)]
pub struct Decision {
    /// Issue a protect command this tick, regardless of the countdown
    pub trigger_protect: bool,

    /// Pending resources to commit into the policy this tick
    pub include: Vec<ProtectableResource>,
}

impl Decision {
    /// Include every pending resource without forcing a protect.
    pub fn include_all(pending: &[ProtectableResource]) -> Self {
        Self {
            trigger_protect: false,
            include: pending.to_vec(),
        }
    }
}

/// A pluggable decision function over the pending set.
///
/// Implementations may keep internal state (`&mut self`) but must have no
/// side effects beyond it, and must be safe to call on every tick.
pub trait DecisionStrategy: Send + Sync {
    fn decide(&mut self, pending: &[ProtectableResource]) -> Decision;
}

/// Reference strategy: include everything immediately, never force an
/// out-of-band protect (the loop countdown handles periodic protects).
#[derive(Debug, Default)]
pub struct IncludeAllStrategy;

impl DecisionStrategy for IncludeAllStrategy {
    fn decide(&mut self, pending: &[ProtectableResource]) -> Decision {
        Decision::include_all(pending)
    }
}

/// One traffic sample for a replication link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkTelemetry {
    /// Identifier of the replication/copy daemon being shaped
    pub link_id: String,

    /// Observed throughput in bytes per second
    pub throughput_bps: u64,

    /// Bytes queued behind the link
    pub backlog_bytes: u64,
}

/// Source of live performance telemetry for the shaping strategy
pub trait TelemetrySource: Send + Sync {
    fn sample(&self) -> Vec<LinkTelemetry>;
}

/// Telemetry source that reports nothing; keeps the shaping strategy
/// runnable where no collector is wired in.
#[derive(Debug, Default)]
pub struct NullTelemetry;

impl TelemetrySource for NullTelemetry {
    fn sample(&self) -> Vec<LinkTelemetry> {
        Vec::new()
    }
}

/// Strategy that recomputes traffic-shaping shares from live telemetry
/// before deciding.
///
/// The decision contract is the same as [`IncludeAllStrategy`]; the value
/// of this strategy is the shaping pass it runs first. The controller that
/// turns samples into share updates is a placeholder: shares are split
/// proportionally to backlog, and applying them to the transport is left to
/// the telemetry source's owner.
pub struct TrafficShapingStrategy {
    telemetry: Box<dyn TelemetrySource>,
    shares: HashMap<String, f64>,
}

impl TrafficShapingStrategy {
    pub fn new(telemetry: Box<dyn TelemetrySource>) -> Self {
        Self {
            telemetry,
            shares: HashMap::new(),
        }
    }

    /// Current share per link, as of the last decide pass.
    pub fn shares(&self) -> &HashMap<String, f64> {
        &self.shares
    }

    fn recompute_shares(&mut self) {
        let samples = self.telemetry.sample();
        if samples.is_empty() {
            self.shares.clear();
            return;
        }

        let total_backlog: u64 = samples.iter().map(|s| s.backlog_bytes).sum();
        let even_share = 1.0 / samples.len() as f64;

        self.shares = samples
            .iter()
            .map(|s| {
                let share = if total_backlog == 0 {
                    even_share
                } else {
                    s.backlog_bytes as f64 / total_backlog as f64
                };
                (s.link_id.clone(), share)
            })
            .collect();

        debug!("recomputed traffic shares for {} links", self.shares.len());
    }
}

impl DecisionStrategy for TrafficShapingStrategy {
    fn decide(&mut self, pending: &[ProtectableResource]) -> Decision {
        self.recompute_shares();
        Decision::include_all(pending)
    }
}

/// The closed set of strategies selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// [`IncludeAllStrategy`]
    #[default]
    IncludeAll,

    /// [`TrafficShapingStrategy`] with a null telemetry source; embedders
    /// wanting real shaping construct the strategy directly
    TrafficShaping,
}

impl StrategyKind {
    /// Build the configured strategy.
    pub fn build(self) -> Box<dyn DecisionStrategy> {
        match self {
            StrategyKind::IncludeAll => Box::new(IncludeAllStrategy),
            StrategyKind::TrafficShaping => {
                Box::new(TrafficShapingStrategy::new(Box::new(NullTelemetry)))
            }
        }
    }
}
