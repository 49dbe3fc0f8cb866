//! Food items tracked in the refrigerator, freezer and pantry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validation::{ValidationError, optional_text, required_name};
use super::{FoodItemId, StorageBucket, UserId};
use crate::date::{parse_storage_date, typed_to_storage_date};
use crate::expiry::{Urgency, classify_urgency, days_until_expiry};

/// An expiry date exactly as stored (`YYYY-MM-DD`).
///
/// The raw text is kept because entry is permissive: a typed date is only
/// checked against the calendar when it is used, via [`Self::calendar_date`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpiryDate(String);

impl ExpiryDate {
    /// Wrap a stored date string without validating it.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The stored text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The local calendar date, or `None` if the text is not a real date.
    #[must_use]
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_storage_date(&self.0)
    }
}

impl From<NaiveDate> for ExpiryDate {
    fn from(date: NaiveDate) -> Self {
        Self(date.format("%Y-%m-%d").to_string())
    }
}

impl std::fmt::Display for ExpiryDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A perishable item owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodItem {
    /// Row ID assigned by the store.
    pub id: FoodItemId,
    /// Owner.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Free-text amount ("2 unidades", "500g").
    pub quantity: Option<String>,
    /// Expiry date; `None` means expiry is not tracked.
    pub expiry_date: Option<ExpiryDate>,
    /// Where the item is kept.
    pub bucket: StorageBucket,
    /// Set once an expiry alert has been raised for this item.
    pub notified: bool,
}

impl FoodItem {
    /// Parsed expiry date, if tracked and valid.
    #[must_use]
    pub fn expiry_calendar_date(&self) -> Option<NaiveDate> {
        self.expiry_date.as_ref().and_then(ExpiryDate::calendar_date)
    }

    /// Whole days until expiry relative to `today`.
    #[must_use]
    pub fn days_left(&self, today: NaiveDate) -> Option<i64> {
        days_until_expiry(self.expiry_calendar_date(), today)
    }

    /// Urgency classification relative to `today`.
    #[must_use]
    pub fn urgency(&self, today: NaiveDate) -> Urgency {
        classify_urgency(self.days_left(today))
    }
}

/// A validated food item ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFoodItem {
    pub user_id: UserId,
    pub name: String,
    pub quantity: Option<String>,
    pub expiry_date: Option<ExpiryDate>,
    pub bucket: StorageBucket,
}

impl NewFoodItem {
    /// Build an item from the add-item form.
    ///
    /// `typed_expiry` is the `DD/MM/YYYY` text from the date field; it is
    /// converted to the stored form but not checked against the calendar.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] if the name is blank.
    pub fn from_form(
        user_id: UserId,
        name: &str,
        quantity: &str,
        typed_expiry: &str,
        bucket: StorageBucket,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            user_id,
            name: required_name(name)?,
            quantity: optional_text(quantity),
            expiry_date: typed_to_storage_date(typed_expiry),
            bucket,
        })
    }

    /// Materialize the stored row once the store has assigned an ID.
    ///
    /// New rows always start with `notified = false`.
    #[must_use]
    pub fn into_item(self, id: FoodItemId) -> FoodItem {
        FoodItem {
            id,
            user_id: self.user_id,
            name: self.name,
            quantity: self.quantity,
            expiry_date: self.expiry_date,
            bucket: self.bucket,
            notified: false,
        }
    }
}

/// A partial edit of a food item. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<ExpiryDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<StorageBucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notified: Option<bool>,
}

impl FoodItemUpdate {
    /// The update written after an expiry alert: `{ notified: true }`.
    #[must_use]
    pub fn mark_notified() -> Self {
        Self {
            notified: Some(true),
            ..Self::default()
        }
    }

    /// Whether this edit writes the expiry date.
    #[must_use]
    pub const fn touches_expiry(&self) -> bool {
        self.expiry_date.is_some()
    }

    /// Whether this edit changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.expiry_date.is_none()
            && self.bucket.is_none()
            && self.notified.is_none()
    }

    /// Reject edits that would blank the item's name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] if a blank name is set.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            required_name(name)?;
        }
        Ok(())
    }

    /// Apply the edit to a stored item.
    pub fn apply_to(&self, item: &mut FoodItem) {
        if let Some(name) = &self.name {
            item.name = name.trim().to_owned();
        }
        if let Some(quantity) = &self.quantity {
            item.quantity = optional_text(quantity);
        }
        if let Some(expiry) = &self.expiry_date {
            item.expiry_date = Some(expiry.clone());
        }
        if let Some(bucket) = self.bucket {
            item.bucket = bucket;
        }
        if let Some(notified) = self.notified {
            item.notified = notified;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(expiry: Option<&str>) -> FoodItem {
        FoodItem {
            id: FoodItemId::new(1),
            user_id: UserId::random(),
            name: "Leche".to_string(),
            quantity: Some("1 L".to_string()),
            expiry_date: expiry.map(ExpiryDate::new),
            bucket: StorageBucket::Refrigerator,
            notified: false,
        }
    }

    #[test]
    fn test_expiry_date_from_naive() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(ExpiryDate::from(date).as_str(), "2025-01-05");
        assert_eq!(ExpiryDate::from(date).calendar_date(), Some(date));
    }

    #[test]
    fn test_days_left_uses_calendar_days() {
        let today = NaiveDate::from_ymd_opt(2025, 12, 20).unwrap();
        assert_eq!(item(Some("2025-12-25")).days_left(today), Some(5));
        assert_eq!(item(Some("2025-12-19")).days_left(today), Some(-1));
        assert_eq!(item(None).days_left(today), None);
    }

    #[test]
    fn test_invalid_stored_date_is_untracked() {
        let today = NaiveDate::from_ymd_opt(2025, 12, 20).unwrap();
        let food = item(Some("9999-02-31"));
        assert_eq!(food.days_left(today), None);
        assert_eq!(food.urgency(today), Urgency::Untracked);
    }

    #[test]
    fn test_new_food_item_from_form() {
        let user = UserId::random();
        let new = NewFoodItem::from_form(
            user,
            "  Yogur ",
            "",
            "01/02/2026",
            StorageBucket::Refrigerator,
        )
        .unwrap();
        assert_eq!(new.name, "Yogur");
        assert_eq!(new.quantity, None);
        assert_eq!(new.expiry_date.as_ref().unwrap().as_str(), "2026-02-01");

        let stored = new.into_item(FoodItemId::new(9));
        assert!(!stored.notified);
        assert_eq!(stored.id, FoodItemId::new(9));
    }

    #[test]
    fn test_new_food_item_requires_name() {
        let result = NewFoodItem::from_form(
            UserId::random(),
            " ",
            "2",
            "",
            StorageBucket::Pantry,
        );
        assert_eq!(result, Err(ValidationError::EmptyName));
    }

    #[test]
    fn test_update_apply_and_flags() {
        let mut food = item(Some("2025-12-25"));
        let update = FoodItemUpdate {
            expiry_date: Some(ExpiryDate::new("2026-01-10")),
            bucket: Some(StorageBucket::Freezer),
            ..FoodItemUpdate::default()
        };
        assert!(update.touches_expiry());
        assert!(!update.is_empty());
        update.apply_to(&mut food);
        assert_eq!(food.expiry_date.unwrap().as_str(), "2026-01-10");
        assert_eq!(food.bucket, StorageBucket::Freezer);
        assert!(!food.notified);
    }

    #[test]
    fn test_mark_notified_serializes_single_field() {
        let json = serde_json::to_value(FoodItemUpdate::mark_notified()).unwrap();
        assert_eq!(json, serde_json::json!({ "notified": true }));
    }

    #[test]
    fn test_update_rejects_blank_name() {
        let update = FoodItemUpdate {
            name: Some("  ".to_string()),
            ..FoodItemUpdate::default()
        };
        assert_eq!(update.validate(), Err(ValidationError::EmptyName));
    }
}
