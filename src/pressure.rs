//! ═══════════════════════════════════════════════════════════════════════════════
//! PRESSURE — Logistic Field Driving the Torsion Gate
//! ═══════════════════════════════════════════════════════════════════════════════
//!
//! A scalar level evolves under a damped logistic-growth map and is read
//! out as a pressure value in a soft band around [0.1, 0.3]. The field is
//! independent of the lattice and updates exactly once per outer step.
//! ═══════════════════════════════════════════════════════════════════════════════

use crate::config::PressureConfig;

/// Scalar pressure field
#[derive(Debug, Clone)]
pub struct PressureField {
    config: PressureConfig,
    level: f64,
    pressure: f64,
    clamped: bool,
}

impl PressureField {
    pub fn new(config: PressureConfig) -> Self {
        Self {
            config,
            level: 0.5,
            pressure: 0.1,
            clamped: false,
        }
    }

    /// Start from a non-default level (level is otherwise 0.5)
    pub fn with_level(config: PressureConfig, level: f64) -> Self {
        let mut field = Self::new(config);
        field.level = level;
        field
    }

    /// Advance the field one step:
    /// delta = growth·level − decay·level², level += step·delta, then
    /// pressure = base + level·scale. The raw map is unstable for large
    /// levels, so the level is held at `level_ceiling`; the first time the
    /// ceiling engages a warning is emitted.
    pub fn update(&mut self) {
        let delta = self.config.growth * self.level - self.config.decay * self.level * self.level;
        self.level += self.config.step * delta;

        if self.level > self.config.level_ceiling {
            self.level = self.config.level_ceiling;
            if !self.clamped {
                self.clamped = true;
                tracing::warn!(
                    ceiling = self.config.level_ceiling,
                    "pressure level reached its ceiling"
                );
            }
        }

        self.pressure = self.config.base + self.level * self.config.scale;
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    /// Has the level ceiling ever engaged?
    pub fn is_saturated(&self) -> bool {
        self.clamped
    }

    pub fn reset(&mut self) {
        self.level = 0.5;
        self.pressure = self.config.base;
        self.clamped = false;
    }
}

impl Default for PressureField {
    fn default() -> Self {
        Self::new(PressureConfig::default())
    }
}
