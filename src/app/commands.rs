//! Inbound commands to the station.
//!
//! These represent actions requested by the outside world (the line
//! console, tests, any future HTTP front-end) that the
//! [`Station`](super::station::Station) interprets and acts upon.
//! The serde form is the console wire format: one JSON object per request,
//! tagged by `"op"`.

use serde::Deserialize;

use crate::drivers::motor::Motor;
use crate::recipe::Recipe;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum AppCommand {
    /// Open a mixing session for `recipe` with a target of `total_weight` kg.
    Start {
        #[serde(default)]
        recipe: Option<Recipe>,
        #[serde(default, alias = "totalWeight")]
        total_weight: f64,
    },

    /// Close the running session and attribute its usage to the ledger.
    Stop,

    /// Report the session slot.
    Status,

    /// Take one scale reading.
    Weight,

    /// Return the resource usage ledger.
    Usage,

    ListRecipes,
    GetRecipe { name: String },
    CreateRecipe { recipe: Recipe },
    /// Replace recipe `name`; `recipe.name` may differ (rename).
    UpdateRecipe { name: String, recipe: Recipe },
    DeleteRecipe { name: String },

    /// Flip one motor.
    ToggleMotor { motor: Motor },
    StartAllMotors,
    StopAllMotors,
    MotorStatus,
}
