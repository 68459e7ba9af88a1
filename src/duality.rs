//! ═══════════════════════════════════════════════════════════════════════════════
//! DUALITY — Antagonistic Two-Path Linear Transform
//! ═══════════════════════════════════════════════════════════════════════════════
//!
//! Two independent banks of D weight vectors read the same input. The
//! direct path is a plain linear projection; the adversarial path negates
//! its projection and multiplies each component by fresh uniform jitter.
//! The two outputs are summed, modeling a balance of antagonistic
//! readouts.
//!
//! Repeated calls with the same input are NOT equal unless the caller
//! seeds and resets the generator; the jitter is drawn per component,
//! per call, from the RNG threaded in by the caller.
//! ═══════════════════════════════════════════════════════════════════════════════

use rand::Rng;

use crate::config::DualityConfig;
use crate::error::{ManifoldError, ManifoldResult};
use crate::state::StateVector;

/// Fixed-weight dual-channel transform
#[derive(Debug, Clone)]
pub struct DualChannel {
    config: DualityConfig,
    direct: Vec<Vec<f64>>,
    adversarial: Vec<Vec<f64>>,
}

impl DualChannel {
    /// Draw both weight banks from the caller's RNG. Weights are fixed for
    /// the life of the transform; only the jitter stays stochastic.
    pub fn new(dim: usize, config: DualityConfig, rng: &mut impl Rng) -> Self {
        let direct = random_bank(dim, config.weight_spread, rng);
        let adversarial = random_bank(dim, config.weight_spread, rng);
        Self {
            config,
            direct,
            adversarial,
        }
    }

    pub fn dim(&self) -> usize {
        self.direct.len()
    }

    /// Direct projection plus jittered, negated adversarial projection.
    /// Output dimension equals input dimension; coherence is carried
    /// through unchanged.
    pub fn process(&self, input: &StateVector, rng: &mut impl Rng) -> ManifoldResult<StateVector> {
        if input.len() != self.dim() {
            return Err(ManifoldError::Shape {
                expected: self.dim(),
                actual: input.len(),
            });
        }

        let values = self
            .direct
            .iter()
            .zip(self.adversarial.iter())
            .map(|(w, v)| {
                let direct = dot(w, input.values());
                let jitter = rng.gen_range(self.config.jitter_min..=self.config.jitter_max);
                let shadow = -dot(v, input.values()) * jitter;
                direct + shadow
            })
            .collect();

        Ok(StateVector::with_coherence(values, input.coherence()))
    }
}

fn dot(w: &[f64], x: &[f64]) -> f64 {
    w.iter().zip(x.iter()).map(|(a, b)| a * b).sum()
}

/// dim × dim weight bank drawn uniformly from [-spread, spread)
fn random_bank(dim: usize, spread: f64, rng: &mut impl Rng) -> Vec<Vec<f64>> {
    (0..dim)
        .map(|_| {
            (0..dim)
                .map(|_| {
                    if spread > 0.0 {
                        rng.gen_range(-spread..spread)
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_output_dimension_matches_input() {
        for dim in [1usize, 8, 64] {
            let mut rng = StdRng::seed_from_u64(3);
            let channel = DualChannel::new(dim, DualityConfig::default(), &mut rng);
            let input = StateVector::new(vec![0.5; dim]);
            let out = channel.process(&input, &mut rng).unwrap();
            assert_eq!(out.len(), dim, "Dimension must be preserved at D={}", dim);
        }
    }

    #[test]
    fn test_coherence_carried_through() {
        let mut rng = StdRng::seed_from_u64(9);
        let channel = DualChannel::new(4, DualityConfig::default(), &mut rng);
        let input = StateVector::with_coherence(vec![1.0, 0.0, 0.0, 0.0], 0.42);
        let out = channel.process(&input, &mut rng).unwrap();
        assert_eq!(out.coherence(), 0.42);
    }

    #[test]
    fn test_seeded_replay_is_deterministic() {
        let build = || {
            let mut rng = StdRng::seed_from_u64(1234);
            let channel = DualChannel::new(8, DualityConfig::default(), &mut rng);
            let input = StateVector::new(vec![0.25; 8]);
            channel.process(&input, &mut rng).unwrap()
        };
        assert_eq!(build(), build(), "Same seed must replay bit-for-bit");
    }

    #[test]
    fn test_repeated_calls_jitter() {
        let mut rng = StdRng::seed_from_u64(5);
        let channel = DualChannel::new(8, DualityConfig::default(), &mut rng);
        let input = StateVector::new(vec![1.0; 8]);

        let a = channel.process(&input, &mut rng).unwrap();
        let b = channel.process(&input, &mut rng).unwrap();
        assert_ne!(
            a, b,
            "Fresh jitter per call should perturb the adversarial path"
        );
    }

    #[test]
    fn test_rejects_wrong_dimension() {
        let mut rng = StdRng::seed_from_u64(2);
        let channel = DualChannel::new(4, DualityConfig::default(), &mut rng);
        let input = StateVector::zeros(5);
        assert!(channel.process(&input, &mut rng).is_err());
    }
}
