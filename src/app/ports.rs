//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (motors, recipe store, event sinks, storage, clock)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the session engine never touches files
//! or actuators directly.  [`CommandHandler`] is the one driving port: the
//! console (or any future transport) feeds commands through it.
//!
//! ## Contract notes
//!
//! - **ConfigPort** implementations MUST validate before persisting.
//! - **StoragePort** writes MUST be atomic; a reader never observes a
//!   half-written document.
//! - All port errors are typed, callers must handle every variant explicitly.

use chrono::{DateTime, Utc};

use crate::config::StationConfig;
use crate::drivers::motor::Motor;
use crate::recipe::Recipe;

use super::commands::AppCommand;
use super::events::AppEvent;
use super::replies::AppReply;

// ───────────────────────────────────────────────────────────────
// Command port (driving adapter: transport → domain)
// ───────────────────────────────────────────────────────────────

/// Inbound port: anything that can execute an [`AppCommand`].
pub trait CommandHandler {
    fn dispatch(&self, command: AppCommand) -> crate::error::Result<AppReply>;
}

// ───────────────────────────────────────────────────────────────
// Motor port (driven adapter: domain → actuators)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the dosing motors.
pub trait MotorPort {
    /// Switch one motor on or off.
    fn set_motor(&mut self, motor: Motor, on: bool);

    /// Whether the motor is currently running.
    fn is_on(&self, motor: Motor) -> bool;

    /// Start every dosing motor.
    fn all_on(&mut self) {
        for motor in Motor::ALL {
            self.set_motor(motor, true);
        }
    }

    /// Stop every dosing motor.
    fn all_off(&mut self) {
        for motor in Motor::ALL {
            self.set_motor(motor, false);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Recipe lookup port (driven adapter: domain ← recipe store)
// ───────────────────────────────────────────────────────────────

/// Read-side port the session engine uses to re-fetch a recipe at stop.
pub trait RecipeStore {
    /// `Ok(None)` when no recipe with that name exists.
    fn find(&self, name: &str) -> Result<Option<Recipe>, StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Wall-clock source for session tokens, ledger dates and recipe stamps.
pub trait ClockPort {
    fn now(&self) -> DateTime<Utc>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.  Adapters
/// decide where they go (log output, a UI push channel, a test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists station configuration.
///
/// Implementations MUST call [`StationConfig::validate`] before persisting.
/// Invalid ranges are rejected with [`ConfigError::ValidationFailed`], not
/// silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`StationConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<StationConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &StationConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ durable documents)
// ───────────────────────────────────────────────────────────────

/// Durable key-value document storage.
///
/// Keys are namespaced so the ledger, the recipe store and the config never
/// collide.  Values are whole documents: there are no partial updates.
pub trait StoragePort {
    /// Read a whole document.
    fn read(&self, namespace: &str, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Replace a whole document atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;

    /// All keys in a namespace, sorted.  Empty if the namespace is unknown.
    fn keys(&self, namespace: &str) -> Result<Vec<String>, StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Stored bytes could not be decoded (or a value could not be encoded).
    Corrupted,
    /// Namespace or key cannot be mapped onto the backing store.
    InvalidKey,
    /// Underlying I/O failure.
    Io(std::io::ErrorKind),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Corrupted => write!(f, "document corrupted"),
            Self::InvalidKey => write!(f, "invalid storage key"),
            Self::Io(kind) => write!(f, "I/O error: {}", kind),
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound,
            kind => Self::Io(kind),
        }
    }
}

impl From<StorageError> for ConfigError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Corrupted => Self::Corrupted,
            _ => Self::IoError,
        }
    }
}
