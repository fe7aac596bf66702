//! Shared mutable context threaded through every FSM handler.
//!
//! `MixContext` is the single struct that state handlers read from and
//! write to: the session slot, the latest scale weight, the motor command
//! and the configuration.

use chrono::{DateTime, Utc};

use crate::config::StationConfig;

/// The one mixing run that may be open at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct MixSession {
    /// Name of the recipe the session was started with.
    pub recipe_id: String,
    /// Fixed for the session; denominator of the completion percentage.
    pub total_weight_target: f64,
    pub session_start: DateTime<Utc>,
}

/// Commands that state handlers write to request motor actions.
/// The service applies them to the motor port after each transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct MotorCommands {
    /// Every dosing motor should run.
    pub dosing: bool,
}

pub struct MixContext {
    /// Open session, `None` while idle.
    pub session: Option<MixSession>,
    /// Accumulated scale weight mirrored after every reading (kg).
    pub live_weight: f64,
    /// Latched once the live weight reaches the session target.
    pub target_reached: bool,

    pub commands: MotorCommands,

    pub config: StationConfig,
}

impl MixContext {
    pub fn new(config: StationConfig) -> Self {
        Self {
            session: None,
            live_weight: 0.0,
            target_reached: false,
            commands: MotorCommands::default(),
            config,
        }
    }

    pub fn in_progress(&self) -> bool {
        self.session.is_some()
    }
}
