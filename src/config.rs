//! Station configuration parameters
//!
//! All tunable parameters for the mixing station.
//! Values can be overridden by the stored config document or the CLI.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::app::ports::{ConfigError, ConfigPort};

/// Core station configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    // --- Scale simulation ---
    /// Smallest weight increment per reading (kg)
    pub weight_increment_min_kg: f64,
    /// Largest weight increment per reading (kg)
    pub weight_increment_max_kg: f64,
    /// Probability that a reading is flagged stable (0.0-1.0)
    pub stable_probability: f64,
    /// Fixed RNG seed for reproducible simulation runs
    pub rng_seed: Option<u64>,

    // --- Motors ---
    /// Switch every dosing motor on while a session runs
    pub motors_follow_session: bool,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            weight_increment_min_kg: 10.0,
            weight_increment_max_kg: 20.0,
            stable_probability: 0.8,
            rng_seed: None,

            motors_follow_session: true,
        }
    }
}

impl StationConfig {
    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.weight_increment_min_kg > 0.0 && self.weight_increment_min_kg <= 1000.0) {
            return Err(ConfigError::ValidationFailed(
                "weight_increment_min_kg must be within (0, 1000]",
            ));
        }
        if !(self.weight_increment_max_kg >= self.weight_increment_min_kg
            && self.weight_increment_max_kg <= 1000.0)
        {
            return Err(ConfigError::ValidationFailed(
                "weight_increment_max_kg must be within [weight_increment_min_kg, 1000]",
            ));
        }
        if !(0.0..=1.0).contains(&self.stable_probability) {
            return Err(ConfigError::ValidationFailed(
                "stable_probability must be 0.0-1.0",
            ));
        }
        Ok(())
    }

    /// Load from `port`, falling back to defaults when the stored document
    /// is unreadable, corrupt or out of range.
    pub fn load_or_default(port: &impl ConfigPort) -> Self {
        port.load().unwrap_or_else(|e| {
            warn!("Stored config unusable ({}), using defaults", e);
            Self::default()
        })
    }
}
