//! Supabase store over the `PostgREST` API.
//!
//! # API Reference
//!
//! - Base URL: `<project>/rest/v1/<table>`
//! - Authentication: `apikey: <anon key>` plus `Authorization: Bearer <jwt>`;
//!   row-level security scopes every table to the session's user
//! - Filters are query parameters (`user_id=eq.<uuid>`), ordering via `order=`
//! - `Prefer: return=representation` makes writes echo the affected rows

use std::sync::Arc;

use mymenu_core::expiry::order_by_expiry;
use mymenu_core::{
    FoodItem, FoodItemId, FoodItemUpdate, NewFoodItem, Recipe, RecipeVideo, ShoppingItemId,
    ShoppingListItem, StorageBucket, UserId, join_videos,
};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use super::rows::{FoodPatch, FoodRow, NewFoodRow, NewShoppingRow, RecipeRow, ShoppingRow, VideoRow};
use super::{KitchenStore, StoreError};
use crate::config::SupabaseConfig;

const FOOD_TABLE: &str = "alimentos";
const RECIPE_TABLE: &str = "recetas";
const VIDEO_TABLE: &str = "videos";
const SHOPPING_TABLE: &str = "lista_compra";

const RETURN_REPRESENTATION: &str = "return=representation";

/// Error body returned by `PostgREST`.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

/// [`KitchenStore`] backed by a hosted Supabase project.
#[derive(Clone)]
pub struct SupabaseStore {
    inner: Arc<SupabaseStoreInner>,
}

struct SupabaseStoreInner {
    client: reqwest::Client,
    base_url: Url,
}

impl SupabaseStore {
    /// Create a new Supabase client.
    ///
    /// # Errors
    ///
    /// Returns error if a credential is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &SupabaseConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();

        let api_key = config.api_key.expose_secret();
        headers.insert(
            "apikey",
            HeaderValue::from_str(api_key)
                .map_err(|e| StoreError::Parse(format!("Invalid API key format: {e}")))?,
        );

        // Without a session token the anon key doubles as the bearer token.
        let bearer = config
            .access_token
            .as_ref()
            .map_or(api_key, |token| token.expose_secret());
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {bearer}"))
            .map_err(|e| StoreError::Parse(format!("Invalid access token format: {e}")))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(SupabaseStoreInner {
                client,
                base_url: config.url.clone(),
            }),
        })
    }

    /// `<project>/rest/v1/<table>?<params>`
    fn table_url(&self, table: &str, params: &[(&str, String)]) -> Result<Url, StoreError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                StoreError::Parse(format!("Not a base URL: {}", self.inner.base_url))
            })?
            .pop_if_empty()
            .extend(["rest", "v1", table]);
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    async fn get_rows<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, StoreError> {
        debug!(%url, "GET");
        let response = self.inner.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    async fn post_rows<T, B>(&self, url: Url, body: &B) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
        B: serde::Serialize + Sync + ?Sized,
    {
        debug!(%url, "POST");
        let response = self
            .inner
            .client
            .post(url)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn patch_rows<T, B>(&self, url: Url, body: &B) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
        B: serde::Serialize + Sync + ?Sized,
    {
        debug!(%url, "PATCH");
        let response = self
            .inner
            .client
            .patch(url)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn delete_rows(&self, url: Url) -> Result<(), StoreError> {
        debug!(%url, "DELETE");
        let response = self.inner.client.delete(url).send().await?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::parse_error(response).await)
    }

    /// Handle API response and parse the JSON row array.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Vec<T>, StoreError> {
        if response.status().is_success() {
            return response
                .json()
                .await
                .map_err(|e| StoreError::Parse(format!("Failed to parse response: {e}")));
        }
        Err(Self::parse_error(response).await)
    }

    /// Parse an error response from `PostgREST`.
    async fn parse_error(response: reqwest::Response) -> StoreError {
        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return StoreError::Unauthorized;
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        if matches!(status, 502..=504) {
            return StoreError::Unavailable(body);
        }

        let message = serde_json::from_str::<PostgrestError>(&body).map_or(body, |err| {
            match (err.code, err.details) {
                (Some(code), Some(details)) => format!("{} ({code}): {details}", err.message),
                (Some(code), None) => format!("{} ({code})", err.message),
                (None, _) => err.message,
            }
        });

        if status == 404 {
            return StoreError::NotFound(message);
        }
        StoreError::Api { status, message }
    }

    /// Video links; a failing `videos` table never hides the catalogue.
    async fn fetch_videos(&self) -> Vec<RecipeVideo> {
        let rows = match self.table_url(VIDEO_TABLE, &[("select", "*".to_string())]) {
            Ok(url) => self.get_rows::<VideoRow>(url).await,
            Err(e) => Err(e),
        };
        match rows {
            Ok(rows) => rows.into_iter().filter_map(VideoRow::into_video).collect(),
            Err(e) => {
                warn!(error = %e, "Failed to fetch recipe videos, continuing without them");
                Vec::new()
            }
        }
    }
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

fn food_items_from_rows(rows: Vec<FoodRow>) -> Result<Vec<FoodItem>, StoreError> {
    rows.into_iter().map(FoodItem::try_from).collect()
}

impl KitchenStore for SupabaseStore {
    #[instrument(skip(self), fields(table = FOOD_TABLE))]
    async fn fetch_food_items(
        &self,
        user_id: UserId,
        bucket: Option<StorageBucket>,
    ) -> Result<Vec<FoodItem>, StoreError> {
        let mut params = vec![("select", "*".to_string()), ("user_id", eq(user_id))];
        if let Some(bucket) = bucket {
            params.push(("almacenamiento", eq(bucket.as_str())));
        }
        params.push(("order", "fecha_caducidad.asc.nullslast".to_string()));

        let url = self.table_url(FOOD_TABLE, &params)?;
        let mut items = food_items_from_rows(self.get_rows(url).await?)?;
        // The column is text; unreadable dates must still sort last.
        order_by_expiry(&mut items);
        Ok(items)
    }

    #[instrument(skip(self, update), fields(table = FOOD_TABLE))]
    async fn update_food_item(
        &self,
        id: FoodItemId,
        update: &FoodItemUpdate,
    ) -> Result<FoodItem, StoreError> {
        let url = self.table_url(FOOD_TABLE, &[("id", eq(id))])?;
        let rows: Vec<FoodRow> = self.patch_rows(url, &FoodPatch::from(update)).await?;
        food_items_from_rows(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("food item {id}")))
    }

    #[instrument(skip(self, item), fields(table = FOOD_TABLE, user_id = %item.user_id))]
    async fn insert_food_item(&self, item: &NewFoodItem) -> Result<FoodItem, StoreError> {
        let url = self.table_url(FOOD_TABLE, &[])?;
        let rows: Vec<FoodRow> = self.post_rows(url, &[NewFoodRow::from(item)]).await?;
        food_items_from_rows(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Parse("insert returned no row".to_string()))
    }

    #[instrument(skip(self), fields(table = FOOD_TABLE))]
    async fn delete_food_item(&self, id: FoodItemId, user_id: UserId) -> Result<(), StoreError> {
        let url = self.table_url(FOOD_TABLE, &[("id", eq(id)), ("user_id", eq(user_id))])?;
        self.delete_rows(url).await
    }

    #[instrument(skip(self), fields(table = RECIPE_TABLE))]
    async fn fetch_recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        let url = self.table_url(
            RECIPE_TABLE,
            &[("select", "*".to_string()), ("order", "nombre.asc".to_string())],
        )?;
        let rows: Vec<RecipeRow> = self.get_rows(url).await?;
        let recipes = rows.into_iter().map(Recipe::from).collect();
        Ok(join_videos(recipes, &self.fetch_videos().await))
    }

    #[instrument(skip(self), fields(table = SHOPPING_TABLE))]
    async fn fetch_shopping_list(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ShoppingListItem>, StoreError> {
        let url = self.table_url(
            SHOPPING_TABLE,
            &[
                ("select", "*".to_string()),
                ("user_id", eq(user_id)),
                ("order", "created_at.asc".to_string()),
            ],
        )?;
        let rows: Vec<ShoppingRow> = self.get_rows(url).await?;
        Ok(rows.into_iter().map(ShoppingListItem::from).collect())
    }

    #[instrument(skip(self, names), fields(table = SHOPPING_TABLE, count = names.len()))]
    async fn insert_shopping_items(
        &self,
        user_id: UserId,
        names: &[String],
    ) -> Result<Vec<ShoppingListItem>, StoreError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        // One request, one statement: PostgREST inserts all rows or none.
        let payload: Vec<NewShoppingRow<'_>> = names
            .iter()
            .map(|name| NewShoppingRow::new(user_id, name))
            .collect();
        let url = self.table_url(SHOPPING_TABLE, &[])?;
        let rows: Vec<ShoppingRow> = self.post_rows(url, &payload).await?;
        Ok(rows.into_iter().map(ShoppingListItem::from).collect())
    }

    #[instrument(skip(self), fields(table = SHOPPING_TABLE))]
    async fn delete_shopping_item(
        &self,
        id: ShoppingItemId,
        user_id: UserId,
    ) -> Result<(), StoreError> {
        let url = self.table_url(SHOPPING_TABLE, &[("id", eq(id)), ("user_id", eq(user_id))])?;
        self.delete_rows(url).await
    }

    #[instrument(skip(self), fields(table = SHOPPING_TABLE))]
    async fn clear_shopping_list(&self, user_id: UserId) -> Result<(), StoreError> {
        let url = self.table_url(SHOPPING_TABLE, &[("user_id", eq(user_id))])?;
        self.delete_rows(url).await
    }
}

impl std::fmt::Debug for SupabaseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseStore")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;

    use super::*;

    fn store(base: &str) -> SupabaseStore {
        SupabaseStore::new(&SupabaseConfig {
            url: Url::parse(base).unwrap(),
            api_key: SecretString::from("eyJhbGciOiJIUzI1NiJ9.anon.Zk3q9Lw2Xr7Tn0Pb"),
            access_token: None,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_table_url_with_filters() {
        let store = store("https://project.supabase.co");
        let user = UserId::new(uuid::Uuid::nil());
        let url = store
            .table_url(
                FOOD_TABLE,
                &[
                    ("select", "*".to_string()),
                    ("user_id", eq(user)),
                    ("almacenamiento", eq(StorageBucket::Freezer.as_str())),
                ],
            )
            .unwrap();
        assert_eq!(url.path(), "/rest/v1/alimentos");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("select".to_string(), "*".to_string()),
                (
                    "user_id".to_string(),
                    "eq.00000000-0000-0000-0000-000000000000".to_string()
                ),
                ("almacenamiento".to_string(), "eq.arcon".to_string()),
            ]
        );
    }

    #[test]
    fn test_table_url_respects_base_path() {
        let store = store("http://localhost:54321/");
        let url = store.table_url(SHOPPING_TABLE, &[]).unwrap();
        assert_eq!(url.path(), "/rest/v1/lista_compra");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_debug_hides_credentials() {
        let debug_output = format!("{:?}", store("https://project.supabase.co"));
        assert!(debug_output.contains("project.supabase.co"));
        assert!(!debug_output.contains("Zk3q9Lw2Xr7Tn0Pb"));
    }
}
