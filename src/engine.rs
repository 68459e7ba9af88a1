//! ═══════════════════════════════════════════════════════════════════════════════
//! ENGINE — One Forward Pass per Step
//! ═══════════════════════════════════════════════════════════════════════════════
//!
//! Wires the subsystems into a single synchronous pipeline, strictly in
//! sequence: pressure update → dual-channel transform of the previous
//! combined state → lossy compression → lattice injection + diffusion →
//! checked combination → branch arbitration. The winning candidate is the
//! next combined state; its metrics land in the telemetry log.
//!
//! One engine instance is meant to be driven by one simulation loop.
//! Nothing here blocks or suspends; a step either completes or returns a
//! validation error.
//! ═══════════════════════════════════════════════════════════════════════════════

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::branch::{BranchEvaluator, BranchMetrics};
use crate::compress::{Compressor, MeanFieldCompressor};
use crate::config::EngineConfig;
use crate::duality::DualChannel;
use crate::error::{ManifoldError, ManifoldResult};
use crate::health::{HealthModel, SignalHealthModel};
use crate::lattice::Lattice;
use crate::pressure::PressureField;
use crate::state::StateVector;
use crate::telemetry::StepLog;

/// Result of one forward pass
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// The winning candidate; feed it back as `previous` next step
    pub state: StateVector,
    /// Quality record for the winning candidate
    pub metrics: BranchMetrics,
}

// ═══════════════════════════════════════════════════════════════════════════════
// BUILDER — Collaborators are wired here or not at all
// ═══════════════════════════════════════════════════════════════════════════════

/// Builds an [`Engine`], enforcing that the scoring and compression
/// collaborators are wired before anything runs.
pub struct EngineBuilder {
    config: EngineConfig,
    seed: u64,
    health: Option<Box<dyn HealthModel>>,
    compressor: Option<Box<dyn Compressor>>,
}

impl EngineBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            seed: 0,
            health: None,
            compressor: None,
        }
    }

    /// Seed for every random draw the engine makes (initialization and
    /// per-call jitter). Same seed, same config, same inputs means the same run.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn health_model(mut self, model: Box<dyn HealthModel>) -> Self {
        self.health = Some(model);
        self
    }

    pub fn compressor(mut self, compressor: Box<dyn Compressor>) -> Self {
        self.compressor = Some(compressor);
        self
    }

    /// Install the shipped collaborators ([`SignalHealthModel`],
    /// [`MeanFieldCompressor`]) where none were wired explicitly.
    pub fn with_defaults(mut self) -> Self {
        if self.health.is_none() {
            self.health = Some(Box::new(SignalHealthModel));
        }
        if self.compressor.is_none() {
            self.compressor = Some(Box::new(MeanFieldCompressor));
        }
        self
    }

    pub fn build(self) -> ManifoldResult<Engine> {
        self.config.validate()?;
        let health = self
            .health
            .ok_or(ManifoldError::CollaboratorMissing("health model"))?;
        let compressor = self
            .compressor
            .ok_or(ManifoldError::CollaboratorMissing("compressor"))?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let dim = self.config.dim;
        let lattice = Lattice::new(dim, self.config.lattice.clone(), &mut rng);
        let duality = DualChannel::new(dim, self.config.duality.clone(), &mut rng);
        let pressure = PressureField::new(self.config.pressure.clone());
        let evaluator = BranchEvaluator::new(self.config.branch.clone(), health);
        let telemetry = StepLog::new(self.config.telemetry_capacity);

        Ok(Engine {
            config: self.config,
            rng,
            lattice,
            pressure,
            duality,
            evaluator,
            compressor,
            telemetry,
            steps: 0,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENGINE
// ═══════════════════════════════════════════════════════════════════════════════

/// The per-step simulation core
pub struct Engine {
    config: EngineConfig,
    rng: StdRng,
    lattice: Lattice,
    pressure: PressureField,
    duality: DualChannel,
    evaluator: BranchEvaluator,
    compressor: Box<dyn Compressor>,
    telemetry: StepLog,
    steps: u64,
}

impl Engine {
    pub fn builder(config: EngineConfig) -> EngineBuilder {
        EngineBuilder::new(config)
    }

    /// One forward pass over the external input and the previous combined
    /// state. Returns the winning candidate and its metrics.
    pub fn step(
        &mut self,
        input: &StateVector,
        previous: &StateVector,
    ) -> ManifoldResult<StepOutcome> {
        // 1. Advance the pressure field
        self.pressure.update();
        let psi = self.pressure.pressure();

        // 2. Dual-channel pass over the previous combined state
        let balanced = self.duality.process(previous, &mut self.rng)?;

        // 3. Lossy compression under the current pressure; the collaborator
        //    contract is dimension-preserving, enforced before the add
        let compressed = self.compressor.compress(&balanced, psi);
        if compressed.len() != self.config.dim {
            return Err(ManifoldError::Shape {
                expected: self.config.dim,
                actual: compressed.len(),
            });
        }

        // 4. Volumetric pass over the raw external input
        let grid = self.lattice.process_step(input)?;

        // 5. Combine the two signal paths
        let combined = compressed.checked_add(&grid)?;

        // 6. Arbitrate candidate continuations
        let winner = self
            .evaluator
            .evaluate(&combined, input, psi, grid.coherence());

        self.telemetry.record(&winner.metrics);
        self.steps += 1;
        tracing::debug!(
            step = self.steps,
            pressure = psi,
            branch = winner.metrics.branch_index,
            health = winner.metrics.health,
            "forward pass complete"
        );

        Ok(StepOutcome {
            state: winner.state,
            metrics: winner.metrics,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current pressure readout
    pub fn pressure(&self) -> f64 {
        self.pressure.pressure()
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn telemetry(&self) -> &StepLog {
        &self.telemetry
    }

    /// Completed forward passes
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
