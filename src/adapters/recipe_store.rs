//! Recipe store backed by a [`StoragePort`].
//!
//! One pretty-printed JSON document per recipe in the `recipes` namespace,
//! keyed by recipe name.  Implements the read-side [`RecipeStore`] port the
//! session engine uses at stop, plus the CRUD operations the console exposes.

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::app::ports::{RecipeStore, StorageError, StoragePort};
use crate::error::{ConflictError, Error, Result};
use crate::recipe::{Recipe, validate_name};

pub const RECIPE_NAMESPACE: &str = "recipes";

pub struct StoredRecipes<S> {
    store: S,
}

impl<S: StoragePort> StoredRecipes<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Every readable recipe, sorted by name.
    pub fn list(&self) -> Result<Vec<Recipe>> {
        let mut recipes = Vec::new();
        for key in self.store.keys(RECIPE_NAMESPACE)? {
            match self.load(&key) {
                Ok(Some(recipe)) => recipes.push(recipe),
                Ok(None) => {}
                Err(e) => warn!("Recipes: skipping unreadable document '{}': {}", key, e),
            }
        }
        recipes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(recipes)
    }

    pub fn get(&self, name: &str) -> Result<Recipe> {
        validate_name(name)?;
        self.load(name)?
            .ok_or_else(|| Error::NotFound(name.to_owned()))
    }

    /// Store a new recipe.  `created_at` is stamped unless supplied.
    pub fn create(&mut self, mut recipe: Recipe, now: DateTime<Utc>) -> Result<Recipe> {
        recipe.validate()?;
        if self.store.exists(RECIPE_NAMESPACE, &recipe.name) {
            return Err(ConflictError::RecipeExists(recipe.name).into());
        }
        recipe.created_at.get_or_insert(now);
        recipe.updated_at = None;

        self.save(&recipe)?;
        info!(
            "Recipes: created '{}' ({} ingredients)",
            recipe.name,
            recipe.ingredients.len()
        );
        Ok(recipe)
    }

    /// Replace recipe `name` with `recipe`, which may carry a new name.
    pub fn update(&mut self, name: &str, mut recipe: Recipe, now: DateTime<Utc>) -> Result<Recipe> {
        let existing = self.get(name)?;
        recipe.validate()?;

        let renamed = recipe.name != name;
        if renamed && self.store.exists(RECIPE_NAMESPACE, &recipe.name) {
            return Err(ConflictError::RecipeExists(recipe.name).into());
        }

        recipe.created_at = existing.created_at;
        recipe.updated_at = Some(now);
        self.save(&recipe)?;
        if renamed {
            self.store.delete(RECIPE_NAMESPACE, name)?;
            info!("Recipes: renamed '{}' -> '{}'", name, recipe.name);
        } else {
            info!("Recipes: updated '{}'", recipe.name);
        }
        Ok(recipe)
    }

    pub fn delete(&mut self, name: &str) -> Result<()> {
        validate_name(name)?;
        if !self.store.exists(RECIPE_NAMESPACE, name) {
            return Err(Error::NotFound(name.to_owned()));
        }
        self.store.delete(RECIPE_NAMESPACE, name)?;
        info!("Recipes: deleted '{}'", name);
        Ok(())
    }

    fn load(&self, name: &str) -> core::result::Result<Option<Recipe>, StorageError> {
        match self.store.read(RECIPE_NAMESPACE, name) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|_| StorageError::Corrupted),
            Err(StorageError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&mut self, recipe: &Recipe) -> core::result::Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(recipe).map_err(|_| StorageError::Corrupted)?;
        self.store.write(RECIPE_NAMESPACE, &recipe.name, &bytes)
    }
}

impl<S: StoragePort> RecipeStore for StoredRecipes<S> {
    fn find(&self, name: &str) -> core::result::Result<Option<Recipe>, StorageError> {
        if validate_name(name).is_err() {
            return Ok(None);
        }
        self.load(name)
    }
}
