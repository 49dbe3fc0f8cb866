//! Shopping list commands.

use std::sync::Arc;

use mymenu_core::date::format_typed_date;
use mymenu_core::{MoveToStorage, RecipeId, ShoppingItemId, StorageBucket};
use mymenu_kitchen::AppError;
use mymenu_kitchen::services::{ImportOutcome, RecipeService, ShoppingListService};
use mymenu_kitchen::SupabaseStore;
use tracing::info;

use super::Kitchen;

fn service(kitchen: &Kitchen) -> ShoppingListService<SupabaseStore> {
    ShoppingListService::new(Arc::clone(&kitchen.store))
}

/// Print the list in the order entries were added.
///
/// # Errors
///
/// Returns `AppError::Store` if the list cannot be fetched.
pub async fn list(kitchen: &Kitchen) -> Result<(), AppError> {
    let entries = service(kitchen).list(kitchen.user_id).await?;
    if entries.is_empty() {
        info!("The shopping list is empty");
        return Ok(());
    }
    for entry in &entries {
        info!(id = %entry.id, "{}", entry.name);
    }
    Ok(())
}

/// Add entries; several names go in as one all-or-nothing batch.
///
/// # Errors
///
/// Returns `AppError::Validation` for blank input, or a store error if the
/// insert fails.
pub async fn add(kitchen: &Kitchen, names: &[String]) -> Result<(), AppError> {
    let service = service(kitchen);
    if let [name] = names {
        let entry = service.add(kitchen.user_id, name).await?;
        info!(id = %entry.id, "Added {}", entry.name);
    } else {
        let added = service.add_many(kitchen.user_id, names).await?;
        info!("Added {} entries", added.len());
    }
    Ok(())
}

/// Add the ingredients of a recipe the user does not have.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown recipe, or
/// `AppError::BatchInsert` if nothing could be added.
pub async fn import(kitchen: &Kitchen, recipe_id: RecipeId) -> Result<(), AppError> {
    let recipes = RecipeService::new(Arc::clone(&kitchen.store));
    let recipe = recipes.recipe(recipe_id).await?;
    let owned = recipes.owned_names(kitchen.user_id).await?;

    match service(kitchen)
        .import_missing(kitchen.user_id, &recipe, &owned)
        .await?
    {
        ImportOutcome::NothingToAdd => info!("You already have everything for {}", recipe.name),
        ImportOutcome::Added(added) => {
            for entry in &added {
                info!(id = %entry.id, "Added {}", entry.name);
            }
        }
    }
    Ok(())
}

/// Remove one entry.
///
/// # Errors
///
/// Returns `AppError::Store` if the delete fails.
pub async fn remove(kitchen: &Kitchen, id: ShoppingItemId) -> Result<(), AppError> {
    service(kitchen).remove(id, kitchen.user_id).await?;
    info!(%id, "Removed");
    Ok(())
}

/// Empty the list.
///
/// # Errors
///
/// Returns `AppError::Store` if the delete fails.
pub async fn clear(kitchen: &Kitchen) -> Result<(), AppError> {
    service(kitchen).clear(kitchen.user_id).await
}

/// Move a bought entry into a storage bucket.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the entry is not on the list,
/// `AppError::Validation` for a missing quantity or expiry, or a store error.
pub async fn move_to_storage(
    kitchen: &Kitchen,
    id: ShoppingItemId,
    quantity: String,
    expiry: &str,
    bucket: StorageBucket,
) -> Result<(), AppError> {
    let service = service(kitchen);
    let entry = service
        .list(kitchen.user_id)
        .await?
        .into_iter()
        .find(|entry| entry.id == id)
        .ok_or_else(|| AppError::NotFound(format!("shopping list entry {id}")))?;

    let request = MoveToStorage {
        quantity,
        typed_expiry: format_typed_date(expiry),
        bucket,
    };
    let stored = service.move_to_storage(&entry, &request).await?;
    info!(id = %stored.id, bucket = %stored.bucket, "Moved {} into storage", stored.name);
    Ok(())
}
