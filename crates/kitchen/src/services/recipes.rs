//! Recipe catalogue and suggestions.

use std::sync::Arc;

use mymenu_core::suggest::{OwnedNames, ingredients_to_add, suggest_recipes};
use mymenu_core::{Recipe, RecipeFilter, RecipeId, UserId};
use tracing::{debug, instrument};

use crate::error::AppError;
use crate::store::KitchenStore;

/// A catalogue recipe ranked by how many of its ingredients the user owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedRecipe {
    pub recipe: Recipe,
    pub matches: usize,
}

/// What the user still has to buy for one recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingIngredients {
    pub recipe: Recipe,
    pub missing: Vec<String>,
}

/// Reads the recipe catalogue and matches it against the user's food.
pub struct RecipeService<S> {
    store: Arc<S>,
}

impl<S: KitchenStore> RecipeService<S> {
    /// Create a new recipe service.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The full catalogue, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store call fails.
    #[instrument(skip_all)]
    pub async fn catalogue(&self) -> Result<Vec<Recipe>, AppError> {
        Ok(self.store.fetch_recipes().await?)
    }

    /// Catalogue recipes passing `filter`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store call fails.
    pub async fn search(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>, AppError> {
        let catalogue = self.catalogue().await?;
        Ok(filter.apply(&catalogue).into_iter().cloned().collect())
    }

    /// Names of everything the user owns, across all buckets.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store call fails.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn owned_names(&self, user_id: UserId) -> Result<OwnedNames, AppError> {
        let items = self.store.fetch_food_items(user_id, None).await?;
        Ok(OwnedNames::from_items(&items))
    }

    /// Recipes that use at least one owned ingredient, best match first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if either store call fails.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn suggestions(&self, user_id: UserId) -> Result<Vec<RankedRecipe>, AppError> {
        let owned = self.owned_names(user_id).await?;
        let catalogue = self.catalogue().await?;

        let ranked: Vec<RankedRecipe> = suggest_recipes(&catalogue, &owned)
            .into_iter()
            .map(|s| RankedRecipe {
                recipe: s.recipe.clone(),
                matches: s.matches,
            })
            .collect();
        debug!(
            owned = owned.len(),
            catalogue = catalogue.len(),
            suggested = ranked.len(),
            "Suggestions computed"
        );
        Ok(ranked)
    }

    /// One recipe together with the ingredients the user lacks.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown recipe, or `AppError::Store`
    /// if a store call fails.
    #[instrument(skip_all, fields(user_id = %user_id, recipe_id = %recipe_id))]
    pub async fn missing_ingredients(
        &self,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<MissingIngredients, AppError> {
        let recipe = self.recipe(recipe_id).await?;
        let owned = self.owned_names(user_id).await?;
        let missing = ingredients_to_add(&recipe, &owned);
        Ok(MissingIngredients { recipe, missing })
    }

    /// Look up one recipe.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown recipe, or `AppError::Store`
    /// if the store call fails.
    pub async fn recipe(&self, recipe_id: RecipeId) -> Result<Recipe, AppError> {
        self.catalogue()
            .await?
            .into_iter()
            .find(|r| r.id == recipe_id)
            .ok_or_else(|| AppError::NotFound(format!("recipe {recipe_id}")))
    }
}
