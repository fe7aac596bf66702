//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) and the
//! [`Station`](super::station::Station) emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log a line, push to a UI, record in
//! a test.

use crate::drivers::motor::Motor;
use crate::fsm::StateId;
use crate::sensors::WeightReading;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The application service has started (carries initial state).
    Started(StateId),

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// A mixing session was opened.
    SessionStarted {
        recipe_id: String,
        total_weight: f64,
    },

    /// A scale reading was taken during a session.
    WeightSampled(WeightReading),

    /// The live weight reached the session target.
    TargetReached { total_weight: f64 },

    /// A mixing session was closed.
    SessionStopped {
        recipe_id: String,
        completion_percentage: f64,
        final_weight: f64,
    },

    /// The session's consumption was written to the ledger.
    UsageRecorded {
        recipe_id: String,
        effective_weight: f64,
    },

    /// The ledger was left untouched at stop.
    UsageSkipped { recipe_id: String, reason: String },

    /// A dosing motor changed state.
    MotorChanged { motor: Motor, on: bool },
}
