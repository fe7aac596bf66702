//! The station: one mutex around the service and every adapter.
//!
//! [`Station`] is the composition root used by transports.  Each
//! [`dispatch`](CommandHandler::dispatch) takes the lock once and runs the
//! whole command inside it, so the idle check in `start` and the transition
//! that follows can never be split by another caller.

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::info;

use crate::adapters::recipe_store::StoredRecipes;
use crate::config::StationConfig;
use crate::drivers::motor::Motor;
use crate::error::Result;

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{ClockPort, CommandHandler, ConfigError, EventSink, MotorPort, StoragePort};
use super::replies::{AppReply, MotorStatus};
use super::service::{AppService, set_all_motors};

struct StationInner<S, M, E, C> {
    service: AppService<S>,
    recipes: StoredRecipes<S>,
    motors: M,
    sink: E,
    clock: C,
}

/// Thread-safe front door to the mixing station.
pub struct Station<S, M, E, C> {
    inner: Mutex<StationInner<S, M, E, C>>,
}

impl<S, M, E, C> Station<S, M, E, C>
where
    S: StoragePort + Clone,
    M: MotorPort,
    E: EventSink,
    C: ClockPort,
{
    /// Validate `config`, wire the adapters and boot the service.
    ///
    /// `storage` backs both the ledger and the recipe store; each gets its
    /// own handle.
    pub fn new(
        config: StationConfig,
        storage: S,
        mut motors: M,
        mut sink: E,
        clock: C,
    ) -> core::result::Result<Self, ConfigError> {
        config.validate()?;

        let mut service = AppService::new(config, storage.clone());
        service.boot(&mut motors, &mut sink);

        Ok(Self {
            inner: Mutex::new(StationInner {
                service,
                recipes: StoredRecipes::new(storage),
                motors,
                sink,
                clock,
            }),
        })
    }

    /// Read access to the event sink (test recorders, UI bridges).
    pub fn with_sink<R>(&self, f: impl FnOnce(&E) -> R) -> R {
        f(&self.lock().sink)
    }

    /// Read access to the motor adapter.
    pub fn with_motors<R>(&self, f: impl FnOnce(&M) -> R) -> R {
        f(&self.lock().motors)
    }

    /// Clone of the live configuration.
    pub fn config(&self) -> StationConfig {
        self.lock().service.current_config()
    }

    fn lock(&self) -> MutexGuard<'_, StationInner<S, M, E, C>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S, M, E, C> CommandHandler for Station<S, M, E, C>
where
    S: StoragePort + Clone,
    M: MotorPort,
    E: EventSink,
    C: ClockPort,
{
    fn dispatch(&self, command: AppCommand) -> Result<AppReply> {
        let mut guard = self.lock();
        let StationInner {
            service,
            recipes,
            motors,
            sink,
            clock,
        } = &mut *guard;
        let now = clock.now();

        match command {
            // ── Session ───────────────────────────────────────
            AppCommand::Start {
                recipe,
                total_weight,
            } => service
                .start(recipe, total_weight, now, motors, sink)
                .map(AppReply::Started),
            AppCommand::Stop => service
                .stop(&*recipes, now, motors, sink)
                .map(AppReply::Stopped),
            AppCommand::Status => Ok(AppReply::Status(service.status())),
            AppCommand::Weight => service.read_weight(sink).map(AppReply::Weight),
            AppCommand::Usage => Ok(AppReply::Usage(service.usage_report(now))),

            // ── Recipes ───────────────────────────────────────
            AppCommand::ListRecipes => recipes.list().map(AppReply::Recipes),
            AppCommand::GetRecipe { name } => recipes.get(&name).map(AppReply::Recipe),
            AppCommand::CreateRecipe { recipe } => {
                let created = recipes.create(recipe, now)?;
                Ok(AppReply::ack(format!("Recipe '{}' created.", created.name)))
            }
            AppCommand::UpdateRecipe { name, recipe } => {
                let updated = recipes.update(&name, recipe, now)?;
                Ok(AppReply::ack(format!("Recipe '{}' updated.", updated.name)))
            }
            AppCommand::DeleteRecipe { name } => {
                recipes.delete(&name)?;
                Ok(AppReply::ack(format!("Recipe '{}' deleted.", name)))
            }

            // ── Motors ────────────────────────────────────────
            AppCommand::ToggleMotor { motor } => {
                let on = !motors.is_on(motor);
                motors.set_motor(motor, on);
                sink.emit(&AppEvent::MotorChanged { motor, on });
                let verb = if on { "started" } else { "stopped" };
                Ok(AppReply::MotorToggled {
                    message: format!("{} motor {}.", motor.label(), verb),
                    motor,
                    on,
                })
            }
            AppCommand::StartAllMotors => {
                set_all_motors(motors, sink, true);
                info!("All motors started");
                Ok(AppReply::ack("All motors started."))
            }
            AppCommand::StopAllMotors => {
                set_all_motors(motors, sink, false);
                info!("All motors stopped");
                Ok(AppReply::ack("All motors stopped."))
            }
            AppCommand::MotorStatus => Ok(AppReply::Motors(MotorStatus {
                corn: motors.is_on(Motor::Corn),
                alfalfa: motors.is_on(Motor::Alfalfa),
            })),
        }
    }
}
