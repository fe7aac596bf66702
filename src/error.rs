//! Unified error types for the FeedMix control backend.
//!
//! Every fallible station operation funnels into [`Error`], so the command
//! dispatcher and the console adapter handle failures uniformly.  The four
//! top-level variants map one-to-one onto the outcome classes a caller has
//! to distinguish: bad input, wrong state, missing entity, storage trouble.

use core::fmt;

use crate::app::ports::StorageError;

// ---------------------------------------------------------------------------
// Top-level station error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed or missing input.  No state was mutated.
    Validation(ValidationError),
    /// The operation is not valid in the current state.  No state was mutated.
    Conflict(ConflictError),
    /// A referenced recipe does not exist.
    NotFound(String),
    /// Durable storage could not be read or written.
    Storage(StorageError),
}

impl Error {
    /// Short machine-readable tag used on the console wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::NotFound(_) => "not_found",
            Self::Storage(_) => "storage",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "validation: {e}"),
            Self::Conflict(e) => write!(f, "conflict: {e}"),
            Self::NotFound(name) => write!(f, "recipe '{name}' not found"),
            Self::Storage(e) => write!(f, "storage: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A start request carried no recipe body.
    MissingRecipe,
    /// Recipe name is empty or blank.
    MissingRecipeName,
    /// Recipe name cannot be used as a storage key.
    InvalidRecipeName(String),
    /// Recipe has no ingredients.
    NoIngredients,
    /// An ingredient has an empty or blank name.
    BlankIngredientName,
    /// An ingredient percentage is outside `[0, 100]` or not finite.
    PercentageOutOfRange { ingredient: String, percentage: f64 },
    /// Ingredient percentages do not sum to 100 (carries the actual sum).
    PercentageSum(f64),
    /// Target total weight is zero, negative or not finite.
    NonPositiveTarget(f64),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRecipe => write!(f, "a recipe is required"),
            Self::MissingRecipeName => write!(f, "recipe name is required"),
            Self::InvalidRecipeName(name) => write!(f, "recipe name '{name}' is not allowed"),
            Self::NoIngredients => write!(f, "recipe ingredients are required"),
            Self::BlankIngredientName => write!(f, "every ingredient needs a name"),
            Self::PercentageOutOfRange {
                ingredient,
                percentage,
            } => write!(
                f,
                "ingredient '{ingredient}' percentage {percentage} must be within 0-100"
            ),
            Self::PercentageSum(sum) => {
                write!(f, "ingredient percentages must sum to 100% (currently {sum}%)")
            }
            Self::NonPositiveTarget(w) => {
                write!(f, "total weight must be greater than 0 (got {w})")
            }
        }
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

// ---------------------------------------------------------------------------
// State conflicts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictError {
    /// `start` while a session is already running.
    SessionInProgress,
    /// `stop` or a weight read while idle.
    NoSessionInProgress,
    /// Recipe create/rename onto a name that is already taken.
    RecipeExists(String),
}

impl fmt::Display for ConflictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionInProgress => write!(f, "a session is already in progress"),
            Self::NoSessionInProgress => write!(f, "no session in progress"),
            Self::RecipeExists(name) => write!(f, "a recipe named '{name}' already exists"),
        }
    }
}

impl From<ConflictError> for Error {
    fn from(e: ConflictError) -> Self {
        Self::Conflict(e)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Station-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
