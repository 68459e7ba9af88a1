//! ═══════════════════════════════════════════════════════════════════════════════
//! MANIFOLD — Volumetric Lattice Simulation Core
//! ═══════════════════════════════════════════════════════════════════════════════
//! Per-step pipeline: a logistic pressure field, an antagonistic dual-channel
//! transform, lossy compression, diffusion over a 3×3×3 node grid, and
//! arbitration between speculative branch continuations.
//!
//! The boundary is purely programmatic: vectors in, a winning state vector
//! plus its metrics out. Scoring and compression are injected collaborators.
//! ═══════════════════════════════════════════════════════════════════════════════

#![allow(clippy::needless_range_loop)] // Indexed loops clearer for stencil math

// ═══════════════════════════════════════════════════════════════════════════════
// FOUNDATION MODULES — signal contract, configuration, errors
// ═══════════════════════════════════════════════════════════════════════════════

pub mod config;
pub mod error;
pub mod state;

// ═══════════════════════════════════════════════════════════════════════════════
// CORE MODULES — the per-step pipeline
// ═══════════════════════════════════════════════════════════════════════════════

pub mod branch;
pub mod compress;
pub mod duality;
pub mod engine;
pub mod health;
pub mod lattice;
pub mod pressure;

// ═══════════════════════════════════════════════════════════════════════════════
// SUPPORT MODULES — input shaping, step history
// ═══════════════════════════════════════════════════════════════════════════════

pub mod resonance;
pub mod telemetry;

// Re-export the common surface
pub use branch::{Branch, BranchEvaluator, BranchMetrics, BRANCH_COUNT};
pub use compress::{Compressor, MeanFieldCompressor};
pub use config::{
    BranchConfig, DualityConfig, EngineConfig, LatticeConfig, PressureConfig, SweepMode,
};
pub use duality::DualChannel;
pub use engine::{Engine, EngineBuilder, StepOutcome};
pub use error::{ManifoldError, ManifoldResult};
pub use health::{HealthModel, SignalHealthModel};
pub use lattice::{Lattice, Node};
pub use pressure::PressureField;
pub use resonance::PhaseLock;
pub use state::StateVector;
pub use telemetry::{StepLog, TelemetrySummary};
