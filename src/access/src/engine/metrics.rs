//! Decision counters and latency percentiles for access checks

use crate::engine::decision::{AccessDecision, DecisionReason};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::RwLock;

const MAX_LATENCY_SAMPLES: usize = 10_000;

/// Snapshot of access control metrics
#[derive(Debug, Clone, Default)]
pub struct EngineMetrics {
    /// Decisions that produced a verdict
    pub total_decisions: u64,
    /// Decisions that granted access
    pub granted: u64,
    /// Decisions that refused access
    pub denied: u64,
    /// Grants made by the global allow-list without consulting ancestry
    pub global_bypasses: u64,
    /// Patron grants withheld because of an embargo or deletion mark
    pub restricted: u64,
    /// Checks that failed closed because ancestry could not be resolved
    pub ancestry_failures: u64,

    /// Mean latency over the retained samples
    pub avg_latency_ms: f64,
    /// Median latency over the retained samples
    pub latency_p50_ms: f64,
    /// 99th percentile latency over the retained samples
    pub latency_p99_ms: f64,
}

impl EngineMetrics {
    /// Fraction of decisions that granted access
    pub fn grant_rate(&self) -> f64 {
        if self.total_decisions == 0 {
            0.0
        } else {
            self.granted as f64 / self.total_decisions as f64
        }
    }
}

#[derive(Default)]
struct State {
    metrics: EngineMetrics,
    samples: VecDeque<f64>,
}

/// Collects [`EngineMetrics`] across concurrent checks
#[derive(Default)]
pub struct MetricsCollector {
    state: RwLock<State>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed decision and how long it took
    pub async fn record_decision(&self, decision: &AccessDecision, latency: Duration) {
        let mut state = self.state.write().await;
        let metrics = &mut state.metrics;

        metrics.total_decisions += 1;
        if decision.granted {
            metrics.granted += 1;
        } else {
            metrics.denied += 1;
        }

        match decision.reason {
            DecisionReason::GlobalPrincipal => metrics.global_bypasses += 1,
            DecisionReason::EmbargoCapped { .. } | DecisionReason::MarkedForDeletion { .. } => {
                metrics.restricted += 1
            }
            _ => {}
        }

        // Percentiles are derived in `snapshot`, off the decision path
        if state.samples.len() == MAX_LATENCY_SAMPLES {
            state.samples.pop_front();
        }
        state.samples.push_back(latency.as_secs_f64() * 1000.0);
    }

    /// Count a check that failed closed on ancestry resolution
    pub async fn record_ancestry_failure(&self) {
        self.state.write().await.metrics.ancestry_failures += 1;
    }

    /// Current counters plus latency statistics over the retained samples
    pub async fn snapshot(&self) -> EngineMetrics {
        let (mut metrics, mut sorted) = {
            let state = self.state.read().await;
            (state.metrics.clone(), Vec::from(state.samples.clone()))
        };

        if !sorted.is_empty() {
            sorted.sort_by(f64::total_cmp);
            let sum: f64 = sorted.iter().sum();
            metrics.avg_latency_ms = sum / sorted.len() as f64;
            metrics.latency_p50_ms = percentile(&sorted, 0.50);
            metrics.latency_p99_ms = percentile(&sorted, 0.99);
        }
        metrics
    }

    /// Clear all counters and samples
    pub async fn reset(&self) {
        *self.state.write().await = State::default();
    }
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() as f64) * p) as usize;
    sorted[idx.min(sorted.len() - 1)]
}
