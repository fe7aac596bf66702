//! Simulated mixer scale.
//!
//! There is no load cell on the bench rig, so every read advances an
//! accumulated weight by a random increment drawn from
//! `[weight_increment_min_kg, weight_increment_max_kg)`.  The weight never
//! passes the session target: the last step is clamped so the scale
//! settles exactly on it.  The `stable` flag models sensor jitter only.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::StationConfig;
use crate::units::{WEIGHT_UNIT, round_to};

/// One scale reading as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightReading {
    /// Accumulated weight, rounded to one decimal.
    pub value: f64,
    pub unit: String,
    pub stable: bool,
}

/// Live-weight simulator.  Owns the single process-wide accumulated weight.
pub struct WeightSimulator {
    weight: f64,
    increment_min: f64,
    increment_max: f64,
    stable_probability: f64,
    rng: StdRng,
}

impl WeightSimulator {
    /// Build a simulator from config.  A configured `rng_seed` makes the
    /// reading sequence reproducible.
    pub fn new(config: &StationConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            weight: 0.0,
            increment_min: config.weight_increment_min_kg,
            increment_max: config.weight_increment_max_kg,
            // gen_bool panics outside [0, 1]
            stable_probability: config.stable_probability.clamp(0.0, 1.0),
            rng,
        }
    }

    /// Advance the scale toward `target` and return the new reading.
    pub fn read(&mut self, target: f64) -> WeightReading {
        let increment = self.draw_increment();
        self.weight = (self.weight + increment).min(target).max(self.weight);
        let stable = self.rng.gen_bool(self.stable_probability);

        WeightReading {
            value: round_to(self.weight, 1),
            unit: WEIGHT_UNIT.to_owned(),
            stable,
        }
    }

    /// Current accumulated weight (unrounded).
    pub fn current(&self) -> f64 {
        self.weight
    }

    /// Drop the accumulated weight back to zero.
    pub fn reset(&mut self) {
        self.weight = 0.0;
    }

    fn draw_increment(&mut self) -> f64 {
        if self.increment_max > self.increment_min {
            self.rng.gen_range(self.increment_min..self.increment_max)
        } else {
            self.increment_min
        }
    }
}
