//! ═══════════════════════════════════════════════════════════════════════════════
//! COMPRESS — Lossy, Pressure-Parameterized Reduction
//! ═══════════════════════════════════════════════════════════════════════════════
//!
//! The compression step is a seam: the engine only fixes the contract
//! (same dimension out as in, parameterized by the current pressure) and
//! validates the output's shape before it is combined with the lattice
//! aggregate. The shipped implementation attenuates each component's
//! deviation from the vector mean: higher pressure, harder squeeze.
//! ═══════════════════════════════════════════════════════════════════════════════

use crate::state::StateVector;

/// Lossy reduction of a state vector under the current pressure.
///
/// Implementations must preserve dimensionality; the engine rejects any
/// output whose length differs from its input with a shape error.
pub trait Compressor: Send {
    fn compress(&self, state: &StateVector, pressure: f64) -> StateVector;
}

// ═══════════════════════════════════════════════════════════════════════════════
// MEAN-FIELD COMPRESSOR — Shipped default
// ═══════════════════════════════════════════════════════════════════════════════

/// Pulls every component toward the vector mean by a fraction equal to
/// the pressure: out[d] = mean + (x[d] − mean)·(1 − pressure). The mean
/// itself survives exactly; detail around it is lost.
#[derive(Debug, Clone, Default)]
pub struct MeanFieldCompressor;

impl Compressor for MeanFieldCompressor {
    fn compress(&self, state: &StateVector, pressure: f64) -> StateVector {
        let mean = state.mean();
        let retain = (1.0 - pressure).clamp(0.0, 1.0);
        state.map(|x| mean + (x - mean) * retain)
    }
}
