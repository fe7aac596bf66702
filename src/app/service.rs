//! Application service, the hexagonal core.
//!
//! [`AppService`] owns the FSM, the session context, the simulated scale
//! and the usage ledger.  It exposes a transport-agnostic API.  Motors,
//! recipe lookups and events flow through port traits injected at call
//! sites, so the whole service is testable with mock adapters.
//!
//! ```text
//!  RecipeStore ──▶ ┌─────────────────────────┐ ──▶ EventSink
//!                  │       AppService        │
//!    MotorPort ◀── │  FSM · Scale · Ledger   │ ──▶ StoragePort
//!                  └─────────────────────────┘
//! ```
//!
//! The service itself is not synchronised.  [`Station`](super::station::Station)
//! wraps it in a mutex so every operation is one atomic step.

use chrono::{DateTime, Utc};
use log::{error, info, warn};

use crate::config::StationConfig;
use crate::drivers::motor::Motor;
use crate::error::{ConflictError, Result, ValidationError};
use crate::fsm::context::{MixContext, MixSession};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::ledger::{ResourceUsageLedger, UsageReport, effective_weight};
use crate::recipe::Recipe;
use crate::sensors::{WeightReading, WeightSimulator};
use crate::units::round_to;

use super::events::AppEvent;
use super::ports::{EventSink, MotorPort, RecipeStore, StoragePort};
use super::replies::{SessionHandle, SessionStatus, StopResult, UsageOutcome};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all session logic.
pub struct AppService<S> {
    fsm: Fsm,
    ctx: MixContext,
    scale: WeightSimulator,
    ledger: ResourceUsageLedger<S>,
}

impl<S: StoragePort> AppService<S> {
    /// Construct the service from configuration and the ledger's storage.
    ///
    /// Does **not** start the FSM; call [`boot`](Self::boot) next.
    pub fn new(config: StationConfig, ledger_store: S) -> Self {
        let scale = WeightSimulator::new(&config);
        let ctx = MixContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Idle);

        Self {
            fsm,
            ctx,
            scale,
            ledger: ResourceUsageLedger::new(ledger_store),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in Idle and bring the motors to match.
    pub fn boot(&mut self, motors: &mut impl MotorPort, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        self.scale.reset();
        self.apply_motors(motors, sink);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("AppService started in {:?}", self.fsm.current_state());
    }

    // ── Session operations ────────────────────────────────────

    /// Open a session.
    ///
    /// The running-session check comes first, so a second start always
    /// reports a conflict no matter what it carries.
    pub fn start(
        &mut self,
        recipe: Option<Recipe>,
        total_weight: f64,
        now: DateTime<Utc>,
        motors: &mut impl MotorPort,
        sink: &mut impl EventSink,
    ) -> Result<SessionHandle> {
        if self.ctx.in_progress() {
            return Err(ConflictError::SessionInProgress.into());
        }
        let recipe = recipe.ok_or(ValidationError::MissingRecipe)?;
        recipe.validate()?;
        if !(total_weight.is_finite() && total_weight > 0.0) {
            return Err(ValidationError::NonPositiveTarget(total_weight).into());
        }

        self.scale.reset();
        self.ctx.session = Some(MixSession {
            recipe_id: recipe.name.clone(),
            total_weight_target: total_weight,
            session_start: now,
        });
        self.transition(StateId::InProgress, motors, sink);

        sink.emit(&AppEvent::SessionStarted {
            recipe_id: recipe.name.clone(),
            total_weight,
        });
        info!(
            "Session started: recipe '{}', target {:.1} kg",
            recipe.name, total_weight
        );

        Ok(SessionHandle {
            message: "Mixing session started.".to_owned(),
            session_id: now.to_rfc3339(),
            recipe,
            total_weight,
            started_at: now,
        })
    }

    /// Take one scale reading toward the session target.
    pub fn read_weight(&mut self, sink: &mut impl EventSink) -> Result<WeightReading> {
        let target = self
            .ctx
            .session
            .as_ref()
            .map(|s| s.total_weight_target)
            .ok_or(ConflictError::NoSessionInProgress)?;

        let reading = self.scale.read(target);
        self.ctx.live_weight = self.scale.current();

        let was_reached = self.ctx.target_reached;
        self.fsm.tick(&mut self.ctx);

        sink.emit(&AppEvent::WeightSampled(reading.clone()));
        if !was_reached && self.ctx.target_reached {
            sink.emit(&AppEvent::TargetReached {
                total_weight: target,
            });
        }
        Ok(reading)
    }

    /// Close the session and attribute its consumption to the ledger.
    ///
    /// The ledger step is best-effort: a missing recipe or a failed write is
    /// reported in [`StopResult::usage`] and the session closes regardless.
    pub fn stop(
        &mut self,
        recipes: &impl RecipeStore,
        now: DateTime<Utc>,
        motors: &mut impl MotorPort,
        sink: &mut impl EventSink,
    ) -> Result<StopResult> {
        let session = self
            .ctx
            .session
            .clone()
            .ok_or(ConflictError::NoSessionInProgress)?;
        let current_weight = self.scale.current();

        let completion = if session.total_weight_target > 0.0 {
            current_weight / session.total_weight_target * 100.0
        } else {
            0.0
        };

        let usage = self.record_usage(recipes, &session, completion, now, sink);

        self.transition(StateId::Idle, motors, sink);
        self.scale.reset();

        let result = StopResult {
            completion_percentage: round_to(completion, 2),
            final_weight: round_to(current_weight, 2),
            usage,
        };
        sink.emit(&AppEvent::SessionStopped {
            recipe_id: session.recipe_id.clone(),
            completion_percentage: result.completion_percentage,
            final_weight: result.final_weight,
        });
        info!(
            "Session stopped: recipe '{}', {:.2}% of {:.1} kg",
            session.recipe_id, result.completion_percentage, session.total_weight_target
        );
        Ok(result)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Session slot snapshot.  Valid in any state.
    pub fn status(&self) -> SessionStatus {
        match &self.ctx.session {
            None => SessionStatus::idle(),
            Some(session) => SessionStatus {
                in_progress: true,
                total_weight_target: session.total_weight_target,
                recipe_id: Some(session.recipe_id.clone()),
                session_start: Some(session.session_start),
                current_weight: round_to(self.scale.current(), 1),
                target_reached: self.ctx.target_reached,
            },
        }
    }

    /// Ledger document stamped with `now`.
    pub fn usage_report(&self, now: DateTime<Utc>) -> UsageReport {
        self.ledger.report(now)
    }

    pub fn ledger(&self) -> &ResourceUsageLedger<S> {
        &self.ledger
    }

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Clone of the live configuration.
    pub fn current_config(&self) -> StationConfig {
        self.ctx.config.clone()
    }

    // ── Internal ──────────────────────────────────────────────

    fn record_usage(
        &self,
        recipes: &impl RecipeStore,
        session: &MixSession,
        completion: f64,
        now: DateTime<Utc>,
        sink: &mut impl EventSink,
    ) -> UsageOutcome {
        let recipe = match recipes.find(&session.recipe_id) {
            Ok(Some(recipe)) => recipe,
            Ok(None) => {
                warn!(
                    "Recipe '{}' not found at stop, ledger not updated",
                    session.recipe_id
                );
                sink.emit(&AppEvent::UsageSkipped {
                    recipe_id: session.recipe_id.clone(),
                    reason: "recipe not found".to_owned(),
                });
                return UsageOutcome::RecipeMissing;
            }
            Err(e) => {
                warn!(
                    "Recipe '{}' lookup failed at stop ({}), ledger not updated",
                    session.recipe_id, e
                );
                sink.emit(&AppEvent::UsageSkipped {
                    recipe_id: session.recipe_id.clone(),
                    reason: format!("recipe lookup failed: {e}"),
                });
                return UsageOutcome::RecipeMissing;
            }
        };

        match self
            .ledger
            .record(&recipe, session.total_weight_target, completion, now)
        {
            Ok(_) => {
                sink.emit(&AppEvent::UsageRecorded {
                    recipe_id: recipe.name.clone(),
                    effective_weight: round_to(
                        effective_weight(session.total_weight_target, completion),
                        2,
                    ),
                });
                UsageOutcome::Recorded
            }
            Err(e) => {
                error!("Ledger write failed for '{}': {}", recipe.name, e);
                sink.emit(&AppEvent::UsageSkipped {
                    recipe_id: recipe.name.clone(),
                    reason: format!("ledger write failed: {e}"),
                });
                UsageOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Force an FSM transition, then apply motor commands and report it.
    fn transition(
        &mut self,
        next: StateId,
        motors: &mut impl MotorPort,
        sink: &mut impl EventSink,
    ) {
        let prev = self.fsm.current_state();
        self.fsm.force_transition(next, &mut self.ctx);
        self.apply_motors(motors, sink);
        if prev != next {
            sink.emit(&AppEvent::StateChanged {
                from: prev,
                to: next,
            });
        }
    }

    /// Translate the FSM's dosing command into motor port calls.
    fn apply_motors(&self, motors: &mut impl MotorPort, sink: &mut impl EventSink) {
        if !self.ctx.config.motors_follow_session {
            return;
        }
        set_all_motors(motors, sink, self.ctx.commands.dosing);
    }
}

/// Drive every motor to `on`, emitting an event for each one that changes.
pub(super) fn set_all_motors(
    motors: &mut impl MotorPort,
    sink: &mut impl EventSink,
    on: bool,
) {
    let changed: Vec<Motor> = Motor::ALL
        .into_iter()
        .filter(|&motor| motors.is_on(motor) != on)
        .collect();
    if on {
        motors.all_on();
    } else {
        motors.all_off();
    }
    for motor in changed {
        sink.emit(&AppEvent::MotorChanged { motor, on });
    }
}
