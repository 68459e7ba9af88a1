//! ═══════════════════════════════════════════════════════════════════════════════
//! CONFIG — Tunable Parameters for the Simulation Core
//! ═══════════════════════════════════════════════════════════════════════════════
//!
//! One config struct per subsystem, with documented defaults that reproduce
//! the reference dynamics. `EngineConfig::validate` rejects inconsistent
//! values before anything is constructed.
//! ═══════════════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

use crate::error::{ManifoldError, ManifoldResult};

/// Golden-ratio time constant governing diffusion speed.
/// Higher tau = slower, more deliberate dynamics.
pub const TAU: f64 = 1.618_033_988_749_895;

// ═══════════════════════════════════════════════════════════════════════════════
// SWEEP MODE — Diffusion update semantics
// ═══════════════════════════════════════════════════════════════════════════════

/// How the per-node flux sweep reads neighbor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepMode {
    /// Nodes update in fixed index order and later nodes read neighbors
    /// already updated in the same pass (Gauss–Seidel). This is the
    /// reference behavior; results depend on the documented node order.
    InPlace,
    /// All fluxes are computed against a snapshot of the pass's starting
    /// state, then applied at once (Jacobi). Order-independent.
    Buffered,
}

// ═══════════════════════════════════════════════════════════════════════════════
// PER-SUBSYSTEM CONFIGS
// ═══════════════════════════════════════════════════════════════════════════════

/// Lattice construction and diffusion parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatticeConfig {
    /// Diffusive coupling strength between adjacent nodes
    pub coupling: f64,

    /// Time constant dividing the coupling (see [`TAU`])
    pub tau: f64,

    /// Integration timestep for one flux sweep
    pub dt: f64,

    /// Fraction of the injected input received by non-center nodes
    pub ambient_gain: f64,

    /// Half-width of the uniform distribution for initial node state.
    /// Zero gives all-zero initial states (deterministic start).
    pub init_spread: f64,

    /// Sweep semantics (see [`SweepMode`])
    pub sweep: SweepMode,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            coupling: 0.1,
            tau: TAU,
            dt: 0.1,
            ambient_gain: 0.1, // center gets 10x the periphery
            init_spread: 0.1,
            sweep: SweepMode::InPlace,
        }
    }
}

/// Logistic pressure field parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PressureConfig {
    /// Linear growth coefficient of the logistic term
    pub growth: f64,

    /// Quadratic decay coefficient of the logistic term
    pub decay: f64,

    /// Damping factor applied to each level delta
    pub step: f64,

    /// Pressure floor
    pub base: f64,

    /// Pressure gained per unit of level
    pub scale: f64,

    /// Hard ceiling on the internal level. The raw logistic map has its
    /// fixed point near 2.56, which would push pressure far past the
    /// documented operating band; the ceiling keeps pressure within
    /// [base, base + ceiling*scale]. Raise it to recover the unclamped
    /// reference behavior.
    pub level_ceiling: f64,
}

impl Default for PressureConfig {
    fn default() -> Self {
        Self {
            growth: 1.409,
            decay: 0.551,
            step: 0.01,
            base: 0.1,
            scale: 0.2,
            level_ceiling: 1.0, // pressure band [0.1, 0.3]
        }
    }
}

/// Dual-channel transform parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DualityConfig {
    /// Half-width of the uniform distribution for weight initialization
    pub weight_spread: f64,

    /// Lower bound of the adversarial jitter band
    pub jitter_min: f64,

    /// Upper bound of the adversarial jitter band
    pub jitter_max: f64,
}

impl Default for DualityConfig {
    fn default() -> Self {
        Self {
            weight_spread: 0.1,
            jitter_min: 0.9,
            jitter_max: 1.1,
        }
    }
}

/// Branch generation and arbitration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchConfig {
    /// Perturbation scale per index step away from the middle branch
    pub variance_step: f64,

    /// Pressure above which the torsion gate engages
    pub psi_critical: f64,

    /// Fixed reliability constant fed to the health model
    pub reliability: f64,

    /// Intent scalar used when the external input is empty
    pub default_intent: f64,
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            variance_step: 0.1,
            psi_critical: 0.25, // inside the reachable pressure band
            reliability: 0.84,
            default_intent: 0.5,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENGINE CONFIG — Aggregate
// ═══════════════════════════════════════════════════════════════════════════════

/// Full configuration for one simulation engine instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// State vector dimension D, shared by every subsystem
    pub dim: usize,

    pub lattice: LatticeConfig,
    pub pressure: PressureConfig,
    pub duality: DualityConfig,
    pub branch: BranchConfig,

    /// How many step metrics records the telemetry log retains
    pub telemetry_capacity: usize,
}

impl EngineConfig {
    /// Default parameters at the given dimension
    pub fn with_dim(dim: usize) -> Self {
        Self {
            dim,
            ..Self::default()
        }
    }

    /// Reject inconsistent parameters before construction
    pub fn validate(&self) -> ManifoldResult<()> {
        if self.dim == 0 {
            return Err(ManifoldError::InvalidConfig {
                field: "dim",
                message: "must be at least 1".to_string(),
            });
        }
        if self.lattice.tau <= 0.0 {
            return Err(ManifoldError::InvalidConfig {
                field: "lattice.tau",
                message: format!("must be positive, got {}", self.lattice.tau),
            });
        }
        if self.lattice.dt <= 0.0 {
            return Err(ManifoldError::InvalidConfig {
                field: "lattice.dt",
                message: format!("must be positive, got {}", self.lattice.dt),
            });
        }
        if self.lattice.init_spread < 0.0 {
            return Err(ManifoldError::InvalidConfig {
                field: "lattice.init_spread",
                message: "must not be negative".to_string(),
            });
        }
        if self.duality.jitter_min > self.duality.jitter_max {
            return Err(ManifoldError::InvalidConfig {
                field: "duality.jitter_min",
                message: format!(
                    "band is inverted: [{}, {}]",
                    self.duality.jitter_min, self.duality.jitter_max
                ),
            });
        }
        if self.pressure.level_ceiling <= 0.0 {
            return Err(ManifoldError::InvalidConfig {
                field: "pressure.level_ceiling",
                message: "must be positive".to_string(),
            });
        }
        if self.telemetry_capacity == 0 {
            return Err(ManifoldError::InvalidConfig {
                field: "telemetry_capacity",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dim: 64,
            lattice: LatticeConfig::default(),
            pressure: PressureConfig::default(),
            duality: DualityConfig::default(),
            branch: BranchConfig::default(),
            telemetry_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(EngineConfig::default().validate().is_ok());
        assert!(EngineConfig::with_dim(1).validate().is_ok());
    }

    #[test]
    fn test_zero_dim_rejected() {
        let config = EngineConfig::with_dim(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_jitter_band_rejected() {
        let mut config = EngineConfig::default();
        config.duality.jitter_min = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = EngineConfig::with_dim(8);
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.dim, 8);
        assert_eq!(back.lattice.sweep, SweepMode::InPlace);
    }
}
