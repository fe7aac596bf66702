//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to               |
//! |----------------|--------------------|---------------------------|
//! | `clock`        | ClockPort          | System wall clock         |
//! | `console`      | (drives)           | CommandHandler over stdio |
//! | `file_store`   | StoragePort        | `<data_dir>/<ns>/<key>`   |
//! |                | ConfigPort         |                           |
//! | `hardware`     | MotorPort          | Simulated motor drivers   |
//! | `log_sink`     | EventSink          | `log` facade              |
//! | `recipe_store` | RecipeStore        | Any StoragePort           |

pub mod clock;
pub mod console;
pub mod file_store;
pub mod hardware;
pub mod log_sink;
pub mod recipe_store;
