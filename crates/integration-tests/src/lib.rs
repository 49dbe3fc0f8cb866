//! Integration tests for MyMenu.
//!
//! The tests drive the kitchen services end to end against
//! [`InMemoryStore`], so they need no network or hosted backend.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mymenu-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `expiry_scan` - at-most-once alerts across concurrent and repeated scans
//! - `shopping_flow` - list management, imports and moving items into storage
//! - `suggestions` - ranking and missing ingredients over a shared catalogue

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::NaiveDate;
use mymenu_core::expiry::Notification;
use mymenu_core::{
    Difficulty, ExpiryDate, FoodItem, FoodItemId, FoodItemUpdate, NewFoodItem, Recipe, RecipeId,
    RecipeVideo, ShoppingItemId, ShoppingListItem, StorageBucket, UserId,
};
use mymenu_kitchen::{InMemoryStore, KitchenStore, Notifier, StoreError};

/// Notifier that keeps everything it was asked to show.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Notifications shown so far, oldest first.
    pub fn seen(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
    }
}

/// A fixed "today" so day counts do not depend on when tests run.
#[must_use]
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap_or_default()
}

/// Storage form of the date `days` after [`today`].
#[must_use]
pub fn expiry_in(days: i64) -> ExpiryDate {
    ExpiryDate::from(today() + chrono::Duration::days(days))
}

/// Insert one food item for `user_id`.
///
/// # Errors
///
/// Returns the store error if the insert fails.
pub async fn stock(
    store: &InMemoryStore,
    user_id: UserId,
    name: &str,
    expiry: Option<ExpiryDate>,
    bucket: StorageBucket,
) -> Result<FoodItem, StoreError> {
    store
        .insert_food_item(&NewFoodItem {
            user_id,
            name: name.to_string(),
            quantity: Some("1".to_string()),
            expiry_date: expiry,
            bucket,
        })
        .await
}

fn recipe(id: i64, name: &str, ingredients: &str, difficulty: Difficulty) -> Recipe {
    Recipe {
        id: RecipeId::new(id),
        name: name.to_string(),
        ingredients: Some(ingredients.to_string()),
        difficulty: Some(difficulty),
        image_url: None,
        video_url: None,
    }
}

/// A store seeded with a small Spanish recipe catalogue.
#[must_use]
pub fn catalogue_store() -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::with_catalogue(
        vec![
            recipe(1, "Tortilla de patatas", "Huevos, Patatas, Cebolla, Aceite", Difficulty::Medium),
            recipe(2, "Crepes", "Leche, Huevos, Harina, Azúcar", Difficulty::Easy),
            recipe(3, "Paella", "Arroz, Gambas, Azafrán, Pimiento", Difficulty::Hard),
            recipe(4, "Gazpacho", "Tomate, Pimiento, Pepino, Ajo, Aceite", Difficulty::Easy),
        ],
        vec![RecipeVideo {
            recipe_id: RecipeId::new(3),
            url: "https://youtu.be/paella".to_string(),
        }],
    ))
}

/// [`InMemoryStore`] whose food reads and updates wait before touching
/// state, so concurrent callers interleave the way network calls do.
#[derive(Debug)]
pub struct PausingStore {
    inner: InMemoryStore,
    pause: Duration,
}

impl PausingStore {
    #[must_use]
    pub fn new(pause: Duration) -> Self {
        Self {
            inner: InMemoryStore::new(),
            pause,
        }
    }

    /// The wrapped store, for seeding and inspection without pauses.
    #[must_use]
    pub const fn inner(&self) -> &InMemoryStore {
        &self.inner
    }
}

impl KitchenStore for PausingStore {
    async fn fetch_food_items(
        &self,
        user_id: UserId,
        bucket: Option<StorageBucket>,
    ) -> Result<Vec<FoodItem>, StoreError> {
        tokio::time::sleep(self.pause).await;
        self.inner.fetch_food_items(user_id, bucket).await
    }

    async fn update_food_item(
        &self,
        id: FoodItemId,
        update: &FoodItemUpdate,
    ) -> Result<FoodItem, StoreError> {
        tokio::time::sleep(self.pause).await;
        self.inner.update_food_item(id, update).await
    }

    async fn insert_food_item(&self, item: &NewFoodItem) -> Result<FoodItem, StoreError> {
        self.inner.insert_food_item(item).await
    }

    async fn delete_food_item(&self, id: FoodItemId, user_id: UserId) -> Result<(), StoreError> {
        self.inner.delete_food_item(id, user_id).await
    }

    async fn fetch_recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        self.inner.fetch_recipes().await
    }

    async fn fetch_shopping_list(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ShoppingListItem>, StoreError> {
        self.inner.fetch_shopping_list(user_id).await
    }

    async fn insert_shopping_items(
        &self,
        user_id: UserId,
        names: &[String],
    ) -> Result<Vec<ShoppingListItem>, StoreError> {
        self.inner.insert_shopping_items(user_id, names).await
    }

    async fn delete_shopping_item(
        &self,
        id: ShoppingItemId,
        user_id: UserId,
    ) -> Result<(), StoreError> {
        self.inner.delete_shopping_item(id, user_id).await
    }

    async fn clear_shopping_list(&self, user_id: UserId) -> Result<(), StoreError> {
        self.inner.clear_shopping_list(user_id).await
    }
}
