//! Food item commands.

use std::sync::Arc;

use mymenu_core::date::{display_date, format_typed_date, local_today, typed_to_storage_date};
use mymenu_core::{FoodItemId, FoodItemUpdate, NewFoodItem, StorageBucket};
use mymenu_kitchen::AppError;
use mymenu_kitchen::services::PantryService;
use tracing::{info, warn};

use super::Kitchen;

/// Fields to change on an existing item; `None` leaves a field alone.
pub struct Edit {
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub expiry: Option<String>,
    pub bucket: Option<StorageBucket>,
}

impl Edit {
    fn into_update(self) -> FoodItemUpdate {
        FoodItemUpdate {
            name: self.name,
            quantity: self.quantity,
            expiry_date: self
                .expiry
                .and_then(|raw| typed_to_storage_date(&format_typed_date(&raw))),
            bucket: self.bucket,
            notified: None,
        }
    }
}

fn service(kitchen: &Kitchen) -> PantryService<mymenu_kitchen::SupabaseStore> {
    PantryService::from_config(Arc::clone(&kitchen.store), &kitchen.config)
}

/// Print one bucket, soonest expiry first.
///
/// # Errors
///
/// Returns `AppError` if the items cannot be fetched.
pub async fn list(kitchen: &Kitchen, bucket: StorageBucket) -> Result<(), AppError> {
    let entries = service(kitchen)
        .list(kitchen.user_id, bucket, local_today())
        .await?;

    info!("{} ({} items)", bucket.label(), entries.len());
    for entry in &entries {
        let expiry = entry
            .item
            .expiry_calendar_date()
            .map_or_else(|| "-".to_string(), display_date);
        info!(
            id = %entry.item.id,
            quantity = entry.item.quantity.as_deref().unwrap_or("-"),
            expiry = %expiry,
            badge = entry.badge.as_deref().unwrap_or(""),
            "{}",
            entry.item.name
        );
    }
    Ok(())
}

/// Add a food item. The expiry may be typed as bare digits.
///
/// # Errors
///
/// Returns `AppError::Validation` for a blank name, or `AppError::Store`
/// if the insert fails.
pub async fn add(
    kitchen: &Kitchen,
    name: &str,
    quantity: Option<&str>,
    expiry: Option<&str>,
    bucket: StorageBucket,
) -> Result<(), AppError> {
    let typed_expiry = expiry.map(format_typed_date).unwrap_or_default();
    let item = NewFoodItem::from_form(
        kitchen.user_id,
        name,
        quantity.unwrap_or_default(),
        &typed_expiry,
        bucket,
    )?;

    let stored = service(kitchen).add(&item).await?;
    info!(id = %stored.id, bucket = %stored.bucket, "Added {}", stored.name);
    Ok(())
}

/// Apply an edit to one item.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the item is gone, or another `AppError`
/// if validation or the update fails.
pub async fn edit(kitchen: &Kitchen, id: FoodItemId, edit: Edit) -> Result<(), AppError> {
    let update = edit.into_update();
    if update.is_empty() {
        warn!(%id, "Nothing to change");
        return Ok(());
    }

    let stored = service(kitchen).edit(id, &update).await?;
    info!(id = %stored.id, notified = stored.notified, "Updated {}", stored.name);
    Ok(())
}

/// Delete one item.
///
/// # Errors
///
/// Returns `AppError::Store` if the delete fails.
pub async fn delete(kitchen: &Kitchen, id: FoodItemId) -> Result<(), AppError> {
    service(kitchen).delete(id, kitchen.user_id).await?;
    info!(%id, "Deleted");
    Ok(())
}
