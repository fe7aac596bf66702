//! Reply payloads returned by [`CommandHandler::dispatch`](super::ports::CommandHandler).
//!
//! Each command has one success shape.  [`AppReply`] serializes untagged so
//! the console puts the bare payload under `"data"`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::drivers::motor::Motor;
use crate::ledger::UsageReport;
use crate::recipe::Recipe;
use crate::sensors::WeightReading;

/// Confirmation of a newly opened session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionHandle {
    pub message: String,
    /// RFC 3339 start timestamp, used as the session token.
    pub session_id: String,
    pub recipe: Recipe,
    pub total_weight: f64,
    pub started_at: DateTime<Utc>,
}

/// Snapshot of the session slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    pub in_progress: bool,
    /// 0 while idle.
    pub total_weight_target: f64,
    pub recipe_id: Option<String>,
    pub session_start: Option<DateTime<Utc>>,
    /// Accumulated scale weight, rounded to one decimal.
    pub current_weight: f64,
    pub target_reached: bool,
}

impl SessionStatus {
    pub fn idle() -> Self {
        Self {
            in_progress: false,
            total_weight_target: 0.0,
            recipe_id: None,
            session_start: None,
            current_weight: 0.0,
            target_reached: false,
        }
    }
}

/// What happened to the ledger when a session closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UsageOutcome {
    Recorded,
    /// The recipe was gone (or unreadable) at stop; nothing was recorded.
    RecipeMissing,
    /// The ledger write failed; the session closed anyway.
    Failed { reason: String },
}

/// Result of closing a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopResult {
    /// Rounded to 2 decimals.  Not capped at 100.
    pub completion_percentage: f64,
    pub final_weight: f64,
    pub usage: UsageOutcome,
}

/// Current state of both dosing motors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MotorStatus {
    pub corn: bool,
    pub alfalfa: bool,
}

/// Success payload for every command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AppReply {
    Started(SessionHandle),
    Stopped(StopResult),
    Status(SessionStatus),
    Weight(WeightReading),
    Usage(UsageReport),
    Recipes(Vec<Recipe>),
    Recipe(Recipe),
    Ack {
        message: String,
    },
    MotorToggled {
        message: String,
        motor: Motor,
        on: bool,
    },
    Motors(MotorStatus),
}

impl AppReply {
    pub fn ack(message: impl Into<String>) -> Self {
        Self::Ack {
            message: message.into(),
        }
    }
}
