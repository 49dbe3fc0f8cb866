//! Persistence collaborator for food items, recipes and the shopping list.
//!
//! # Tables
//!
//! - `alimentos` - food items per user, one row per item
//! - `recetas` - shared recipe catalogue (read-only)
//! - `videos` - recipe video links, joined to recipes by id
//! - `lista_compra` - shopping list entries per user
//!
//! Writes are plain last-write-wins; nothing here offers compare-and-swap.

mod memory;
mod rows;
mod supabase;

use std::future::Future;

use mymenu_core::{
    FoodItem, FoodItemId, FoodItemUpdate, NewFoodItem, Recipe, ShoppingItemId, ShoppingListItem,
    StorageBucket, UserId,
};
use thiserror::Error;

pub use memory::{FailureMode, InMemoryStore};
pub use supabase::SupabaseStore;

/// Errors returned by a [`KitchenStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response or a stored row.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Row not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Session expired or key rejected.
    #[error("Unauthorized: session expired or API key rejected")]
    Unauthorized,

    /// Backend unreachable or temporarily down.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// The operations the kitchen needs from its persistence layer.
///
/// Bulk inserts are all-or-nothing: an implementation either stores every row
/// or returns an error and stores none.
pub trait KitchenStore: Send + Sync {
    /// A user's food items, soonest expiry first, optionally one bucket only.
    fn fetch_food_items(
        &self,
        user_id: UserId,
        bucket: Option<StorageBucket>,
    ) -> impl Future<Output = Result<Vec<FoodItem>, StoreError>> + Send;

    /// Apply a partial edit to one food item.
    fn update_food_item(
        &self,
        id: FoodItemId,
        update: &FoodItemUpdate,
    ) -> impl Future<Output = Result<FoodItem, StoreError>> + Send;

    /// Insert a food item, returning the stored row.
    fn insert_food_item(
        &self,
        item: &NewFoodItem,
    ) -> impl Future<Output = Result<FoodItem, StoreError>> + Send;

    /// Delete one of the user's food items.
    fn delete_food_item(
        &self,
        id: FoodItemId,
        user_id: UserId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// The recipe catalogue with video links joined in, ordered by name.
    fn fetch_recipes(&self) -> impl Future<Output = Result<Vec<Recipe>, StoreError>> + Send;

    /// A user's shopping list, oldest entry first.
    fn fetch_shopping_list(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<ShoppingListItem>, StoreError>> + Send;

    /// Insert several shopping list entries in one request.
    fn insert_shopping_items(
        &self,
        user_id: UserId,
        names: &[String],
    ) -> impl Future<Output = Result<Vec<ShoppingListItem>, StoreError>> + Send;

    /// Delete one shopping list entry.
    fn delete_shopping_item(
        &self,
        id: ShoppingItemId,
        user_id: UserId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete every shopping list entry the user has.
    fn clear_shopping_list(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
