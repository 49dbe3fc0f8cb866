//! Pantry service: the food items in each storage bucket.

use std::sync::Arc;

use chrono::NaiveDate;
use mymenu_core::expiry::{Urgency, badge_label};
use mymenu_core::types::validation::required_name;
use mymenu_core::{FoodItem, FoodItemId, FoodItemUpdate, NewFoodItem, StorageBucket, UserId};
use tracing::{info, instrument};

use crate::config::KitchenConfig;
use crate::error::AppError;
use crate::store::{KitchenStore, StoreError};

/// A food item with its expiry status as of a given day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PantryEntry {
    pub item: FoodItem,
    pub days_left: Option<i64>,
    pub urgency: Urgency,
    /// `Expired`, `{n}d`, or `None` when expiry is not tracked.
    pub badge: Option<String>,
}

impl PantryEntry {
    fn new(item: FoodItem, today: NaiveDate) -> Self {
        let days_left = item.days_left(today);
        Self {
            urgency: item.urgency(today),
            badge: badge_label(days_left),
            days_left,
            item,
        }
    }
}

/// Lists and edits a user's food items.
pub struct PantryService<S> {
    store: Arc<S>,
    reset_notified_on_expiry_edit: bool,
}

impl<S: KitchenStore> PantryService<S> {
    /// Create a pantry service that never re-arms expiry alerts on edit.
    pub const fn new(store: Arc<S>) -> Self {
        Self {
            store,
            reset_notified_on_expiry_edit: false,
        }
    }

    /// Create a pantry service honouring the configured edit behaviour.
    pub fn from_config(store: Arc<S>, config: &KitchenConfig) -> Self {
        Self::new(store).with_reset_notified_on_expiry_edit(config.reset_notified_on_expiry_edit)
    }

    /// When enabled, an edit that writes a new expiry date also clears
    /// `notified`, so the item can alert again.
    #[must_use]
    pub fn with_reset_notified_on_expiry_edit(mut self, enabled: bool) -> Self {
        self.reset_notified_on_expiry_edit = enabled;
        self
    }

    /// Items in one bucket, soonest expiry first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store call fails.
    #[instrument(skip_all, fields(user_id = %user_id, bucket = %bucket))]
    pub async fn list(
        &self,
        user_id: UserId,
        bucket: StorageBucket,
        today: NaiveDate,
    ) -> Result<Vec<PantryEntry>, AppError> {
        let items = self.store.fetch_food_items(user_id, Some(bucket)).await?;
        Ok(items
            .into_iter()
            .map(|item| PantryEntry::new(item, today))
            .collect())
    }

    /// Add a new item.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for a blank name, or `AppError::Store`
    /// if the insert fails.
    #[instrument(skip_all, fields(user_id = %item.user_id, bucket = %item.bucket))]
    pub async fn add(&self, item: &NewFoodItem) -> Result<FoodItem, AppError> {
        required_name(&item.name)?;
        let stored = self.store.insert_food_item(item).await?;
        info!(item_id = %stored.id, "Food item added");
        Ok(stored)
    }

    /// Apply a user edit.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for a blank name, `AppError::NotFound`
    /// if the item is gone, or `AppError::Store` for other store failures.
    #[instrument(skip_all, fields(item_id = %id))]
    pub async fn edit(&self, id: FoodItemId, update: &FoodItemUpdate) -> Result<FoodItem, AppError> {
        update.validate()?;

        let mut update = update.clone();
        if self.reset_notified_on_expiry_edit
            && update.touches_expiry()
            && update.notified.is_none()
        {
            update.notified = Some(false);
        }

        let stored = self
            .store
            .update_food_item(id, &update)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(what) => AppError::NotFound(what),
                other => AppError::Store(other),
            })?;
        info!(notified = stored.notified, "Food item edited");
        Ok(stored)
    }

    /// Delete one of the user's items.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the delete fails; the item stays.
    #[instrument(skip_all, fields(item_id = %id, user_id = %user_id))]
    pub async fn delete(&self, id: FoodItemId, user_id: UserId) -> Result<(), AppError> {
        self.store.delete_food_item(id, user_id).await?;
        info!("Food item deleted");
        Ok(())
    }
}
