//! ═══════════════════════════════════════════════════════════════════════════════
//! BRANCH — Speculative Candidates, Torsion Gating, Arbitration
//! ═══════════════════════════════════════════════════════════════════════════════
//!
//! Each step spawns three candidate continuations of the combined state:
//! the middle branch is the state untouched, the outer two scale it by a
//! symmetric variance. When the pressure field runs past its critical
//! threshold every candidate is twisted by a torsion gate keyed to the
//! external input's intent scalar; below threshold candidates pass
//! through untouched. The injected health model then scores each
//! candidate and the strictly best score wins, earliest index on ties.
//! ═══════════════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

use crate::config::BranchConfig;
use crate::health::HealthModel;
use crate::state::StateVector;

/// Candidates spawned per step
pub const BRANCH_COUNT: usize = 3;

/// Torsion gate amplitude
const TORSION_GAIN: f64 = 0.1;

/// Noise estimate per unit of missing coherence
const SIGMA_SCALE: f64 = 0.05;

/// Coherence reference point for the noise estimate
const COHERENCE_REF: f64 = 1.1;

/// Correlation estimate at zero variance
const RHO_BASE: f64 = 0.9;

/// Correlation shift per unit of branch variance
const RHO_VARIANCE_GAIN: f64 = 0.05;

// ═══════════════════════════════════════════════════════════════════════════════
// METRICS
// ═══════════════════════════════════════════════════════════════════════════════

/// Quality record attached to the winning branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchMetrics {
    /// Health in [0, 1] from the injected model
    pub health: f64,
    /// Ranking score derived from health
    pub score: f64,
    /// Which candidate won (0, 1, or 2)
    pub branch_index: usize,
    /// Grid coherence of the lattice aggregate this step
    pub lattice_coherence: f64,
}

/// One scored candidate continuation
#[derive(Debug, Clone)]
pub struct Branch {
    pub index: usize,
    pub variance: f64,
    pub state: StateVector,
    pub metrics: BranchMetrics,
}

// ═══════════════════════════════════════════════════════════════════════════════
// EVALUATOR
// ═══════════════════════════════════════════════════════════════════════════════

/// Spawns, gates, scores, and arbitrates candidate branches.
///
/// The health model is a constructor-injected collaborator; there is no
/// internal fallback.
pub struct BranchEvaluator {
    config: BranchConfig,
    model: Box<dyn HealthModel>,
}

impl BranchEvaluator {
    pub fn new(config: BranchConfig, model: Box<dyn HealthModel>) -> Self {
        Self { config, model }
    }

    /// Evaluate all candidates and return the winner.
    ///
    /// Selection is by strict `>` on score, so an exact tie keeps the
    /// earliest-indexed candidate.
    pub fn evaluate(
        &self,
        combined: &StateVector,
        input: &StateVector,
        pressure: f64,
        lattice_coherence: f64,
    ) -> Branch {
        let gate_open = pressure > self.config.psi_critical;
        let intent = input.intent().unwrap_or(self.config.default_intent);

        let mut winner: Option<Branch> = None;
        let mut best_score = f64::NEG_INFINITY;

        for index in 0..BRANCH_COUNT {
            let variance = (index as f64 - 1.0) * self.config.variance_step;

            let candidate = if index == 1 {
                // zero-variance branch: the state itself, bit for bit
                combined.clone()
            } else {
                combined.map(|x| x * (1.0 + variance))
            };

            let candidate = if gate_open {
                torsion(&candidate, intent)
            } else {
                candidate // passive flow
            };

            let sigma = SIGMA_SCALE * (COHERENCE_REF - candidate.coherence());
            let rho = RHO_BASE + variance * RHO_VARIANCE_GAIN;
            let health = self.model.health(sigma, rho, self.config.reliability);
            let score = self.model.score(health);

            if winner.is_none() || score > best_score {
                best_score = score;
                winner = Some(Branch {
                    index,
                    variance,
                    state: candidate,
                    metrics: BranchMetrics {
                        health,
                        score,
                        branch_index: index,
                        lattice_coherence,
                    },
                });
            }
        }

        // the first candidate always seeds the winner slot
        match winner {
            Some(branch) => branch,
            None => unreachable!("BRANCH_COUNT is nonzero"),
        }
    }
}

/// Twist every element by the intent scalar: x · (1 + 0.1·sin(intent))
fn torsion(state: &StateVector, intent: f64) -> StateVector {
    let twist = 1.0 + TORSION_GAIN * intent.sin();
    state.map(|x| x * twist)
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
