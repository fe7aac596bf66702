//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (stderr in the binary).  A UI push channel would
//! implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] as one tagged line.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::SessionStarted {
                recipe_id,
                total_weight,
            } => {
                info!("SESSION | started recipe={} target={:.1}kg", recipe_id, total_weight);
            }
            AppEvent::WeightSampled(reading) => {
                info!(
                    "WEIGHT | {:.1}{} {}",
                    reading.value,
                    reading.unit,
                    if reading.stable { "stable" } else { "unstable" }
                );
            }
            AppEvent::TargetReached { total_weight } => {
                info!("WEIGHT | target {:.1}kg reached", total_weight);
            }
            AppEvent::SessionStopped {
                recipe_id,
                completion_percentage,
                final_weight,
            } => {
                info!(
                    "SESSION | stopped recipe={} completion={:.2}% final={:.2}kg",
                    recipe_id, completion_percentage, final_weight
                );
            }
            AppEvent::UsageRecorded {
                recipe_id,
                effective_weight,
            } => {
                info!("USAGE | recipe={} effective={:.2}kg", recipe_id, effective_weight);
            }
            AppEvent::UsageSkipped { recipe_id, reason } => {
                warn!("USAGE | skipped recipe={} reason={}", recipe_id, reason);
            }
            AppEvent::MotorChanged { motor, on } => {
                info!("MOTOR | {} {}", motor, if *on { "running" } else { "stopped" });
            }
        }
    }
}
