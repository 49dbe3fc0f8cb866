//! Business logic services.
//!
//! Each service wraps a shared [`KitchenStore`](crate::store::KitchenStore)
//! and turns store failures into [`AppError`](crate::error::AppError).

pub mod expiry_scan;
pub mod pantry;
pub mod recipes;
pub mod shopping_list;

pub use expiry_scan::{ExpiryScanService, PersistFailure, ScanReport};
pub use pantry::{PantryEntry, PantryService};
pub use recipes::{MissingIngredients, RankedRecipe, RecipeService};
pub use shopping_list::{ImportOutcome, ShoppingListService};
