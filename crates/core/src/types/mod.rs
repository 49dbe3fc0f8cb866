//! Core records for MyMenu.
//!
//! This module provides type-safe wrappers for the kitchen domain: food
//! items, recipes and shopping list entries as the hosted store returns them.

pub mod food;
pub mod id;
pub mod recipe;
pub mod shopping;
pub mod storage;
pub mod validation;

pub use food::{ExpiryDate, FoodItem, FoodItemUpdate, NewFoodItem};
pub use id::*;
pub use recipe::{Recipe, RecipeFilter, RecipeVideo, join_videos};
pub use shopping::{MoveToStorage, ShoppingListItem, shopping_entry_name};
pub use storage::{Difficulty, StorageBucket};
pub use validation::ValidationError;
