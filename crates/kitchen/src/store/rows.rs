//! Backend row shapes and their conversion into domain types.
//!
//! Column names follow the hosted schema, which predates the domain model.

use chrono::{DateTime, Utc};
use mymenu_core::{
    Difficulty, ExpiryDate, FoodItem, FoodItemId, FoodItemUpdate, NewFoodItem, Recipe, RecipeId,
    RecipeVideo, ShoppingItemId, ShoppingListItem, StorageBucket, UserId,
};
use mymenu_core::types::validation::optional_text;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StoreError;

/// A row of `alimentos`.
#[derive(Debug, Deserialize)]
pub(super) struct FoodRow {
    id: i64,
    user_id: Uuid,
    nombre: String,
    /// Older rows store a bare number here.
    #[serde(default)]
    cantidad: Option<serde_json::Value>,
    #[serde(default)]
    fecha_caducidad: Option<String>,
    #[serde(default)]
    almacenamiento: Option<String>,
    #[serde(default)]
    notificado: Option<bool>,
}

impl TryFrom<FoodRow> for FoodItem {
    type Error = StoreError;

    fn try_from(row: FoodRow) -> Result<Self, Self::Error> {
        let bucket = match row.almacenamiento.as_deref() {
            None => StorageBucket::default(),
            Some(raw) => raw.parse().map_err(|e: String| {
                StoreError::Parse(format!("alimentos.{}: {e}", row.id))
            })?,
        };

        Ok(Self {
            id: FoodItemId::new(row.id),
            user_id: UserId::new(row.user_id),
            name: row.nombre,
            quantity: row.cantidad.and_then(quantity_text),
            expiry_date: row
                .fecha_caducidad
                .filter(|raw| !raw.trim().is_empty())
                .map(ExpiryDate::new),
            bucket,
            notified: row.notificado.unwrap_or(false),
        })
    }
}

fn quantity_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) if text.trim().is_empty() => None,
        serde_json::Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

/// Insert payload for `alimentos`.
#[derive(Debug, Serialize)]
pub(super) struct NewFoodRow<'a> {
    user_id: Uuid,
    nombre: &'a str,
    cantidad: Option<&'a str>,
    fecha_caducidad: Option<&'a str>,
    almacenamiento: &'static str,
    notificado: bool,
}

impl<'a> From<&'a NewFoodItem> for NewFoodRow<'a> {
    fn from(item: &'a NewFoodItem) -> Self {
        Self {
            user_id: *item.user_id.as_uuid(),
            nombre: &item.name,
            cantidad: item.quantity.as_deref(),
            fecha_caducidad: item.expiry_date.as_ref().map(ExpiryDate::as_str),
            almacenamiento: item.bucket.as_str(),
            notificado: false,
        }
    }
}

/// Partial update payload for `alimentos`. Unset fields are omitted.
#[derive(Debug, Serialize)]
pub(super) struct FoodPatch<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    nombre: Option<&'a str>,
    /// `Some(None)` clears the column.
    #[serde(skip_serializing_if = "Option::is_none")]
    cantidad: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fecha_caducidad: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    almacenamiento: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notificado: Option<bool>,
}

impl<'a> From<&'a FoodItemUpdate> for FoodPatch<'a> {
    fn from(update: &'a FoodItemUpdate) -> Self {
        Self {
            nombre: update.name.as_deref().map(str::trim),
            cantidad: update.quantity.as_deref().map(optional_text),
            fecha_caducidad: update.expiry_date.as_ref().map(ExpiryDate::as_str),
            almacenamiento: update.bucket.map(StorageBucket::as_str),
            notificado: update.notified,
        }
    }
}

/// A row of `recetas`.
#[derive(Debug, Deserialize)]
pub(super) struct RecipeRow {
    id: i64,
    nombre: String,
    #[serde(default)]
    ingredientes: Option<String>,
    #[serde(default)]
    nivel: Option<String>,
    #[serde(default)]
    imagen_url: Option<String>,
    #[serde(default)]
    youtube_url: Option<String>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        // An unknown level only hides the recipe from difficulty filters.
        let difficulty = row
            .nivel
            .as_deref()
            .and_then(|raw| raw.parse::<Difficulty>().ok());

        Self {
            id: RecipeId::new(row.id),
            name: row.nombre,
            ingredients: row.ingredientes,
            difficulty,
            image_url: non_blank(row.imagen_url),
            video_url: non_blank(row.youtube_url),
        }
    }
}

/// A row of `videos`. Both naming schemes for the link columns are in use.
#[derive(Debug, Deserialize)]
pub(super) struct VideoRow {
    #[serde(default)]
    receta_id: Option<i64>,
    #[serde(default)]
    id_receta: Option<i64>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    youtube_url: Option<String>,
}

impl VideoRow {
    /// The video link, or `None` when the row names no recipe or no URL.
    pub(super) fn into_video(self) -> Option<RecipeVideo> {
        let recipe_id = self.receta_id.or(self.id_receta)?;
        let url = non_blank(self.url).or_else(|| non_blank(self.youtube_url))?;
        Some(RecipeVideo {
            recipe_id: RecipeId::new(recipe_id),
            url,
        })
    }
}

/// A row of `lista_compra`.
#[derive(Debug, Deserialize)]
pub(super) struct ShoppingRow {
    id: i64,
    user_id: Uuid,
    name: String,
    #[serde(default)]
    is_checked: Option<bool>,
    created_at: DateTime<Utc>,
}

impl From<ShoppingRow> for ShoppingListItem {
    fn from(row: ShoppingRow) -> Self {
        Self {
            id: ShoppingItemId::new(row.id),
            user_id: UserId::new(row.user_id),
            name: row.name,
            is_checked: row.is_checked.unwrap_or(false),
            created_at: row.created_at,
        }
    }
}

/// Insert payload for `lista_compra`.
#[derive(Debug, Serialize)]
pub(super) struct NewShoppingRow<'a> {
    user_id: Uuid,
    name: &'a str,
    is_checked: bool,
}

impl<'a> NewShoppingRow<'a> {
    pub(super) const fn new(user_id: UserId, name: &'a str) -> Self {
        Self {
            user_id: *user_id.as_uuid(),
            name,
            is_checked: false,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_food_row_conversion() {
        let row: FoodRow = serde_json::from_value(json!({
            "id": 7,
            "user_id": "1b4e28ba-2fa1-11d2-883f-0016d3cca427",
            "nombre": "Leche",
            "cantidad": 2,
            "fecha_caducidad": "2025-06-20",
            "almacenamiento": "nevera",
            "notificado": null
        }))
        .unwrap();

        let item = FoodItem::try_from(row).unwrap();
        assert_eq!(item.id, FoodItemId::new(7));
        assert_eq!(item.quantity.as_deref(), Some("2"));
        assert_eq!(item.expiry_date.unwrap().as_str(), "2025-06-20");
        assert_eq!(item.bucket, StorageBucket::Refrigerator);
        assert!(!item.notified);
    }

    #[test]
    fn test_food_row_unknown_bucket_is_parse_error() {
        let row: FoodRow = serde_json::from_value(json!({
            "id": 1,
            "user_id": "1b4e28ba-2fa1-11d2-883f-0016d3cca427",
            "nombre": "Hielo",
            "almacenamiento": "garaje"
        }))
        .unwrap();
        assert!(matches!(FoodItem::try_from(row), Err(StoreError::Parse(_))));
    }

    #[test]
    fn test_new_food_row_shape() {
        let item = NewFoodItem {
            user_id: UserId::new(Uuid::nil()),
            name: "Guisantes".to_string(),
            quantity: None,
            expiry_date: Some(ExpiryDate::new("2026-01-31")),
            bucket: StorageBucket::Freezer,
        };
        let value = serde_json::to_value(NewFoodRow::from(&item)).unwrap();
        assert_eq!(
            value,
            json!({
                "user_id": "00000000-0000-0000-0000-000000000000",
                "nombre": "Guisantes",
                "cantidad": null,
                "fecha_caducidad": "2026-01-31",
                "almacenamiento": "arcon",
                "notificado": false
            })
        );
    }

    #[test]
    fn test_food_patch_omits_untouched_fields() {
        let value = serde_json::to_value(FoodPatch::from(&FoodItemUpdate::mark_notified())).unwrap();
        assert_eq!(value, json!({ "notificado": true }));
    }

    #[test]
    fn test_food_patch_blank_quantity_clears_column() {
        let update = FoodItemUpdate {
            quantity: Some("   ".to_string()),
            ..FoodItemUpdate::default()
        };
        let value = serde_json::to_value(FoodPatch::from(&update)).unwrap();
        assert_eq!(value, json!({ "cantidad": null }));

        let update = FoodItemUpdate {
            quantity: Some(" 2 kg ".to_string()),
            ..FoodItemUpdate::default()
        };
        let value = serde_json::to_value(FoodPatch::from(&update)).unwrap();
        assert_eq!(value, json!({ "cantidad": "2 kg" }));
    }

    #[test]
    fn test_recipe_row_conversion() {
        let row: RecipeRow = serde_json::from_value(json!({
            "id": 3,
            "nombre": "Crepes",
            "ingredientes": "Leche, Huevos, Harina",
            "nivel": "facil",
            "imagen_url": "",
            "youtube_url": null
        }))
        .unwrap();
        let recipe = Recipe::from(row);
        assert_eq!(recipe.difficulty, Some(Difficulty::Easy));
        assert_eq!(recipe.image_url, None);
        assert_eq!(recipe.video_url, None);
    }

    #[test]
    fn test_video_row_accepts_both_schemes() {
        let legacy: VideoRow =
            serde_json::from_value(json!({ "id_receta": 4, "youtube_url": "https://yt.example/a" }))
                .unwrap();
        assert_eq!(
            legacy.into_video(),
            Some(RecipeVideo {
                recipe_id: RecipeId::new(4),
                url: "https://yt.example/a".to_string(),
            })
        );

        let orphan: VideoRow = serde_json::from_value(json!({ "url": "https://yt.example/b" })).unwrap();
        assert_eq!(orphan.into_video(), None);
    }
}
