//! Phase-locked conversion of a raw scalar stream into lattice stimuli.

use serde::{Deserialize, Serialize};

use crate::state::StateVector;

/// Phase-locks a scalar sample stream to the simulation's intent slot.
///
/// Each call advances an internal phase and emits a D-dim stimulus whose
/// first component carries the locked amplitude; the rest stay zero. The
/// locked amplitude is raw · sin(phase) · plv.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseLock {
    /// Phase-locking value, the coupling strength of the lock
    plv: f64,
    /// Current phase in radians
    phase: f64,
    /// Phase advance per sample
    rate: f64,
}

impl PhaseLock {
    pub fn new() -> Self {
        Self {
            plv: 0.88,
            phase: 0.0,
            rate: 0.1,
        }
    }

    pub fn with_plv(plv: f64) -> Self {
        Self {
            plv,
            ..Self::new()
        }
    }

    pub fn plv(&self) -> f64 {
        self.plv
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Lock one raw sample into a D-dim stimulus vector
    pub fn sync(&mut self, raw: f64, dim: usize) -> StateVector {
        self.phase += self.rate;
        let locked = raw * self.phase.sin() * self.plv;

        let mut values = vec![0.0; dim];
        if let Some(first) = values.first_mut() {
            *first = locked;
        }
        StateVector::new(values)
    }
}

impl Default for PhaseLock {
    fn default() -> Self {
        Self::new()
    }
}
