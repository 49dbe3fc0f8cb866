//! Shopping list service.

use std::sync::Arc;

use mymenu_core::suggest::{OwnedNames, ingredients_to_add};
use mymenu_core::{
    FoodItem, MoveToStorage, Recipe, ShoppingItemId, ShoppingListItem, UserId, ValidationError,
    shopping_entry_name,
};
use tracing::{info, instrument, warn};

use crate::error::AppError;
use crate::store::{KitchenStore, StoreError};

/// Result of importing a recipe's missing ingredients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The user already owns every ingredient; nothing was written.
    NothingToAdd,
    /// Every missing ingredient was added, in recipe order.
    Added(Vec<ShoppingListItem>),
}

/// Manages a user's shopping list.
pub struct ShoppingListService<S> {
    store: Arc<S>,
}

impl<S: KitchenStore> ShoppingListService<S> {
    /// Create a new shopping list service.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The user's list, oldest entry first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store call fails.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn list(&self, user_id: UserId) -> Result<Vec<ShoppingListItem>, AppError> {
        Ok(self.store.fetch_shopping_list(user_id).await?)
    }

    /// Add one manually typed entry.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for blank text, or `AppError::Store` if
    /// the insert fails.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn add(&self, user_id: UserId, text: &str) -> Result<ShoppingListItem, AppError> {
        let name = shopping_entry_name(text)?;
        let mut inserted = self.store.insert_shopping_items(user_id, &[name]).await?;
        let item = inserted
            .pop()
            .ok_or_else(|| AppError::Unexpected("insert returned no row".to_string()))?;
        info!(item_id = %item.id, "Shopping list entry added");
        Ok(item)
    }

    /// Add several entries in one all-or-nothing insert.
    ///
    /// Blank names are dropped before the insert.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyBatch` when no name is left, or
    /// `AppError::BatchInsert` if the insert fails; no entry is added then.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn add_many(
        &self,
        user_id: UserId,
        names: &[String],
    ) -> Result<Vec<ShoppingListItem>, AppError> {
        let names: Vec<String> = names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect();
        if names.is_empty() {
            return Err(ValidationError::EmptyBatch.into());
        }
        self.insert_batch(user_id, &names).await
    }

    /// Put every ingredient of `recipe` the user does not own on the list.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BatchInsert` if the insert fails; no entry is added.
    #[instrument(skip_all, fields(user_id = %user_id, recipe_id = %recipe.id))]
    pub async fn import_missing(
        &self,
        user_id: UserId,
        recipe: &Recipe,
        owned: &OwnedNames,
    ) -> Result<ImportOutcome, AppError> {
        let missing = ingredients_to_add(recipe, owned);
        if missing.is_empty() {
            info!("Nothing to add, every ingredient is owned");
            return Ok(ImportOutcome::NothingToAdd);
        }
        let added = self.insert_batch(user_id, &missing).await?;
        Ok(ImportOutcome::Added(added))
    }

    async fn insert_batch(
        &self,
        user_id: UserId,
        names: &[String],
    ) -> Result<Vec<ShoppingListItem>, AppError> {
        let added = self
            .store
            .insert_shopping_items(user_id, names)
            .await
            .map_err(|source| batch_error(names.len(), source))?;
        info!(count = added.len(), "Shopping list entries added");
        Ok(added)
    }

    /// Remove one entry.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the delete fails; the entry stays.
    #[instrument(skip_all, fields(item_id = %id, user_id = %user_id))]
    pub async fn remove(&self, id: ShoppingItemId, user_id: UserId) -> Result<(), AppError> {
        self.store.delete_shopping_item(id, user_id).await?;
        Ok(())
    }

    /// Empty the whole list.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the delete fails; the list is unchanged.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn clear(&self, user_id: UserId) -> Result<(), AppError> {
        self.store.clear_shopping_list(user_id).await?;
        info!("Shopping list cleared");
        Ok(())
    }

    /// Move a purchased entry into storage.
    ///
    /// The food item is inserted first; the list entry is removed only once
    /// that succeeded. If removing the entry fails, the new food item is
    /// deleted again so the move leaves both lists as they were.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if quantity or expiry is missing, or
    /// `AppError::Store` if either store call fails.
    #[instrument(skip_all, fields(item_id = %entry.id, bucket = %request.bucket))]
    pub async fn move_to_storage(
        &self,
        entry: &ShoppingListItem,
        request: &MoveToStorage,
    ) -> Result<FoodItem, AppError> {
        let new_item = request.to_food_item(entry)?;
        let stored = self.store.insert_food_item(&new_item).await?;

        if let Err(e) = self.store.delete_shopping_item(entry.id, entry.user_id).await {
            // Roll back so a retry cannot store the item twice.
            if let Err(rollback) = self.store.delete_food_item(stored.id, entry.user_id).await {
                warn!(
                    food_item_id = %stored.id,
                    error = %rollback,
                    "List entry was not removed and the stored item could not be rolled back"
                );
            }
            return Err(e.into());
        }

        info!(food_item_id = %stored.id, "Shopping list entry moved to storage");
        Ok(stored)
    }
}

fn batch_error(count: usize, source: StoreError) -> AppError {
    warn!(count, error = %source, "Batch insert failed");
    AppError::BatchInsert { count, source }
}
