//! Recipe model: a named mixture of ingredients by percentage.
//!
//! Recipes are owned by the recipe store; the session engine only consumes
//! them.  [`Recipe::validate`] is the single boundary check every recipe
//! passes before it is stored or used to open a session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Allowed deviation of the percentage sum from 100.
pub const PERCENTAGE_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    /// Share of the total mixture, 0–100.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier.
    pub name: String,
    /// Ordered ingredient list.
    pub ingredients: Vec<Ingredient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Recipe {
    /// Build an unstamped recipe from `(ingredient, percentage)` pairs.
    pub fn new<'a>(
        name: impl Into<String>,
        ingredients: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Self {
        Self {
            name: name.into(),
            ingredients: ingredients
                .into_iter()
                .map(|(name, percentage)| Ingredient {
                    name: name.to_owned(),
                    percentage,
                })
                .collect(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Sum of all ingredient percentages.
    pub fn percentage_sum(&self) -> f64 {
        self.ingredients.iter().map(|i| i.percentage).sum()
    }

    /// Check name, ingredient list, per-ingredient range and the 100 % sum.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;

        if self.ingredients.is_empty() {
            return Err(ValidationError::NoIngredients);
        }
        for ingredient in &self.ingredients {
            if ingredient.name.trim().is_empty() {
                return Err(ValidationError::BlankIngredientName);
            }
            if !ingredient.percentage.is_finite()
                || !(0.0..=100.0).contains(&ingredient.percentage)
            {
                return Err(ValidationError::PercentageOutOfRange {
                    ingredient: ingredient.name.clone(),
                    percentage: ingredient.percentage,
                });
            }
        }

        let sum = self.percentage_sum();
        if (sum - 100.0).abs() > PERCENTAGE_TOLERANCE {
            return Err(ValidationError::PercentageSum(sum));
        }
        Ok(())
    }
}

/// Recipe names double as storage keys: reject blanks, path separators,
/// dot segments and control characters.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingRecipeName);
    }
    if name == "."
        || name.contains("..")
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_control)
    {
        return Err(ValidationError::InvalidRecipeName(name.to_owned()));
    }
    Ok(())
}
