//! ═══════════════════════════════════════════════════════════════════════════════
//! TELEMETRY — Bounded Step Metrics History
//! ═══════════════════════════════════════════════════════════════════════════════
//!
//! Every forward pass leaves one metrics record here. The log is a bounded
//! window (oldest records fall off), summarizable into aggregate health
//! and branch-selection statistics, and exportable as JSON. It sits
//! outside the hot path and never influences arbitration.
//! ═══════════════════════════════════════════════════════════════════════════════

use std::collections::VecDeque;

use serde::Serialize;

use crate::branch::{BranchMetrics, BRANCH_COUNT};
use crate::error::ManifoldResult;

/// Bounded history of winning-branch metrics
#[derive(Debug, Clone)]
pub struct StepLog {
    history: VecDeque<BranchMetrics>,
    capacity: usize,
}

/// Aggregate view over the retained window
#[derive(Debug, Clone, Serialize)]
pub struct TelemetrySummary {
    /// Records currently retained
    pub samples: usize,
    pub mean_health: f64,
    pub mean_score: f64,
    /// How often each branch index won within the window
    pub branch_wins: [usize; BRANCH_COUNT],
    /// Mean health of the window's second half minus its first half
    pub health_trend: f64,
}

impl StepLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, metrics: &BranchMetrics) {
        if self.history.len() >= self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(metrics.clone());
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn latest(&self) -> Option<&BranchMetrics> {
        self.history.back()
    }

    pub fn history(&self) -> impl Iterator<Item = &BranchMetrics> {
        self.history.iter()
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Aggregate the retained window. Empty log yields all-zero summary.
    pub fn summary(&self) -> TelemetrySummary {
        let samples = self.history.len();
        if samples == 0 {
            return TelemetrySummary {
                samples: 0,
                mean_health: 0.0,
                mean_score: 0.0,
                branch_wins: [0; BRANCH_COUNT],
                health_trend: 0.0,
            };
        }

        let mut health_sum = 0.0;
        let mut score_sum = 0.0;
        let mut branch_wins = [0usize; BRANCH_COUNT];
        for m in &self.history {
            health_sum += m.health;
            score_sum += m.score;
            if m.branch_index < BRANCH_COUNT {
                branch_wins[m.branch_index] += 1;
            }
        }

        let half = samples / 2;
        let health_trend = if half == 0 {
            0.0
        } else {
            let early: f64 = self.history.iter().take(half).map(|m| m.health).sum();
            let late: f64 = self
                .history
                .iter()
                .skip(samples - half)
                .map(|m| m.health)
                .sum();
            late / half as f64 - early / half as f64
        };

        TelemetrySummary {
            samples,
            mean_health: health_sum / samples as f64,
            mean_score: score_sum / samples as f64,
            branch_wins,
            health_trend,
        }
    }

    /// Export the retained window as a JSON array
    pub fn to_json(&self) -> ManifoldResult<String> {
        let records: Vec<&BranchMetrics> = self.history.iter().collect();
        Ok(serde_json::to_string(&records)?)
    }
}
