//! Shopping list entries and moving purchases into storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{ValidationError, required_name};
use super::{NewFoodItem, ShoppingItemId, StorageBucket, UserId};
use crate::date::typed_to_storage_date;

/// One line of a user's shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub id: ShoppingItemId,
    pub user_id: UserId,
    pub name: String,
    /// Present in the backend schema; nothing reads it yet.
    pub is_checked: bool,
    /// Display order is ascending creation time.
    pub created_at: DateTime<Utc>,
}

/// Validate a manually typed shopping list entry.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyName`] if the text is blank.
pub fn shopping_entry_name(text: &str) -> Result<String, ValidationError> {
    required_name(text)
}

/// Details collected when a purchased item is moved into storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveToStorage {
    /// Free-text amount; required.
    pub quantity: String,
    /// `DD/MM/YYYY` as typed; required.
    pub typed_expiry: String,
    pub bucket: StorageBucket,
}

impl MoveToStorage {
    /// Turn a shopping list entry into a new food item.
    ///
    /// Both quantity and expiry must be filled in. The expiry text is
    /// converted but not checked against the calendar.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingQuantity`] or
    /// [`ValidationError::MissingExpiryDate`] when either field is blank.
    pub fn to_food_item(&self, entry: &ShoppingListItem) -> Result<NewFoodItem, ValidationError> {
        if self.quantity.trim().is_empty() {
            return Err(ValidationError::MissingQuantity);
        }
        let expiry_date =
            typed_to_storage_date(&self.typed_expiry).ok_or(ValidationError::MissingExpiryDate)?;

        Ok(NewFoodItem {
            user_id: entry.user_id,
            name: required_name(&entry.name)?,
            quantity: Some(self.quantity.trim().to_owned()),
            expiry_date: Some(expiry_date),
            bucket: self.bucket,
        })
    }
}
