//! In-memory store used by tests and local demos.

use chrono::Utc;
use mymenu_core::expiry::order_by_expiry;
use mymenu_core::{
    FoodItem, FoodItemId, FoodItemUpdate, NewFoodItem, Recipe, RecipeVideo, ShoppingItemId,
    ShoppingListItem, StorageBucket, UserId, join_videos,
};
use tokio::sync::RwLock;

use super::{KitchenStore, StoreError};

/// Simulated backend failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// Every call succeeds.
    #[default]
    Healthy,
    /// Every call fails as if the network were down.
    Offline,
    /// Reads succeed, writes are rejected by the backend.
    RejectWrites,
    /// Only removing a single shopping list entry is rejected.
    RejectEntryDeletes,
}

/// A [`KitchenStore`] that keeps every table in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    food: Vec<FoodItem>,
    recipes: Vec<Recipe>,
    videos: Vec<RecipeVideo>,
    shopping: Vec<ShoppingListItem>,
    last_id: i64,
    failure: FailureMode,
}

impl State {
    fn check_read(&self) -> Result<(), StoreError> {
        match self.failure {
            FailureMode::Offline => Err(offline()),
            FailureMode::Healthy | FailureMode::RejectWrites | FailureMode::RejectEntryDeletes => {
                Ok(())
            }
        }
    }

    fn check_write(&self) -> Result<(), StoreError> {
        match self.failure {
            FailureMode::Healthy | FailureMode::RejectEntryDeletes => Ok(()),
            FailureMode::Offline => Err(offline()),
            FailureMode::RejectWrites => Err(rejected()),
        }
    }

    fn check_entry_delete(&self) -> Result<(), StoreError> {
        match self.failure {
            FailureMode::RejectEntryDeletes => Err(rejected()),
            _ => self.check_write(),
        }
    }

    const fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

fn offline() -> StoreError {
    StoreError::Unavailable("store is offline".to_string())
}

fn rejected() -> StoreError {
    StoreError::Api {
        status: 500,
        message: "write rejected".to_string(),
    }
}

impl InMemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store preloaded with a recipe catalogue and its video links.
    #[must_use]
    pub fn with_catalogue(recipes: Vec<Recipe>, videos: Vec<RecipeVideo>) -> Self {
        Self {
            state: RwLock::new(State {
                recipes,
                videos,
                ..State::default()
            }),
        }
    }

    /// Switch the simulated failure mode.
    pub async fn set_failure(&self, mode: FailureMode) {
        self.state.write().await.failure = mode;
    }

    /// Every stored food item, all users, in insertion order.
    pub async fn food_items(&self) -> Vec<FoodItem> {
        self.state.read().await.food.clone()
    }

    /// Every stored shopping list entry, all users, in insertion order.
    pub async fn shopping_items(&self) -> Vec<ShoppingListItem> {
        self.state.read().await.shopping.clone()
    }
}

impl KitchenStore for InMemoryStore {
    async fn fetch_food_items(
        &self,
        user_id: UserId,
        bucket: Option<StorageBucket>,
    ) -> Result<Vec<FoodItem>, StoreError> {
        let state = self.state.read().await;
        state.check_read()?;
        let mut items: Vec<FoodItem> = state
            .food
            .iter()
            .filter(|item| item.user_id == user_id)
            .filter(|item| bucket.is_none_or(|b| item.bucket == b))
            .cloned()
            .collect();
        order_by_expiry(&mut items);
        Ok(items)
    }

    async fn update_food_item(
        &self,
        id: FoodItemId,
        update: &FoodItemUpdate,
    ) -> Result<FoodItem, StoreError> {
        let mut state = self.state.write().await;
        state.check_write()?;
        let item = state
            .food
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("food item {id}")))?;
        update.apply_to(item);
        Ok(item.clone())
    }

    async fn insert_food_item(&self, item: &NewFoodItem) -> Result<FoodItem, StoreError> {
        let mut state = self.state.write().await;
        state.check_write()?;
        let id = FoodItemId::new(state.next_id());
        let stored = item.clone().into_item(id);
        state.food.push(stored.clone());
        Ok(stored)
    }

    async fn delete_food_item(&self, id: FoodItemId, user_id: UserId) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.check_write()?;
        state
            .food
            .retain(|item| !(item.id == id && item.user_id == user_id));
        Ok(())
    }

    async fn fetch_recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        let state = self.state.read().await;
        state.check_read()?;
        let mut recipes = join_videos(state.recipes.clone(), &state.videos);
        recipes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(recipes)
    }

    async fn fetch_shopping_list(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ShoppingListItem>, StoreError> {
        let state = self.state.read().await;
        state.check_read()?;
        let mut items: Vec<ShoppingListItem> = state
            .shopping
            .iter()
            .filter(|item| item.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by_key(|item| (item.created_at, item.id));
        Ok(items)
    }

    async fn insert_shopping_items(
        &self,
        user_id: UserId,
        names: &[String],
    ) -> Result<Vec<ShoppingListItem>, StoreError> {
        let mut state = self.state.write().await;
        state.check_write()?;
        // Mirror the not-null constraint: one bad row fails the whole batch.
        if names.iter().any(|name| name.trim().is_empty()) {
            return Err(StoreError::Api {
                status: 400,
                message: "null value in column \"name\" violates not-null constraint".to_string(),
            });
        }

        let created_at = Utc::now();
        let mut inserted = Vec::with_capacity(names.len());
        for name in names {
            let item = ShoppingListItem {
                id: ShoppingItemId::new(state.next_id()),
                user_id,
                name: name.clone(),
                is_checked: false,
                created_at,
            };
            inserted.push(item);
        }
        state.shopping.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn delete_shopping_item(
        &self,
        id: ShoppingItemId,
        user_id: UserId,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.check_entry_delete()?;
        state
            .shopping
            .retain(|item| !(item.id == id && item.user_id == user_id));
        Ok(())
    }

    async fn clear_shopping_list(&self, user_id: UserId) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.check_write()?;
        state.shopping.retain(|item| item.user_id != user_id);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mymenu_core::{ExpiryDate, RecipeId};

    use super::*;

    fn new_food(user_id: UserId, name: &str, expiry: Option<&str>, bucket: StorageBucket) -> NewFoodItem {
        NewFoodItem {
            user_id,
            name: name.to_string(),
            quantity: None,
            expiry_date: expiry.map(ExpiryDate::new),
            bucket,
        }
    }

    #[tokio::test]
    async fn test_fetch_food_items_filters_and_orders() {
        let store = InMemoryStore::new();
        let user = UserId::random();
        let other = UserId::random();
        store
            .insert_food_item(&new_food(user, "Yogur", Some("2025-07-01"), StorageBucket::Refrigerator))
            .await
            .unwrap();
        store
            .insert_food_item(&new_food(user, "Arroz", None, StorageBucket::Pantry))
            .await
            .unwrap();
        store
            .insert_food_item(&new_food(user, "Leche", Some("2025-06-20"), StorageBucket::Refrigerator))
            .await
            .unwrap();
        store
            .insert_food_item(&new_food(other, "Queso", Some("2025-06-01"), StorageBucket::Refrigerator))
            .await
            .unwrap();

        let all: Vec<_> = store
            .fetch_food_items(user, None)
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.name)
            .collect();
        assert_eq!(all, vec!["Leche", "Yogur", "Arroz"]);

        let fridge = store
            .fetch_food_items(user, Some(StorageBucket::Refrigerator))
            .await
            .unwrap();
        assert_eq!(fridge.len(), 2);
        assert!(fridge.iter().all(|item| !item.notified));
    }

    #[tokio::test]
    async fn test_update_missing_item_is_not_found() {
        let store = InMemoryStore::new();
        let result = store
            .update_food_item(FoodItemId::new(42), &FoodItemUpdate::mark_notified())
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_is_scoped_to_owner() {
        let store = InMemoryStore::new();
        let owner = UserId::random();
        let item = store
            .insert_food_item(&new_food(owner, "Pan", None, StorageBucket::Pantry))
            .await
            .unwrap();

        store.delete_food_item(item.id, UserId::random()).await.unwrap();
        assert_eq!(store.food_items().await.len(), 1);

        store.delete_food_item(item.id, owner).await.unwrap();
        assert!(store.food_items().await.is_empty());
    }

    #[tokio::test]
    async fn test_bulk_insert_is_all_or_nothing() {
        let store = InMemoryStore::new();
        let user = UserId::random();
        let names = vec!["Leche".to_string(), "  ".to_string(), "Harina".to_string()];

        let result = store.insert_shopping_items(user, &names).await;
        assert!(matches!(result, Err(StoreError::Api { status: 400, .. })));
        assert!(store.shopping_items().await.is_empty());

        let names = vec!["Leche".to_string(), "Harina".to_string()];
        let inserted = store.insert_shopping_items(user, &names).await.unwrap();
        assert_eq!(inserted.len(), 2);
        let listed: Vec<_> = store
            .fetch_shopping_list(user)
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.name)
            .collect();
        assert_eq!(listed, vec!["Leche", "Harina"]);
    }

    #[tokio::test]
    async fn test_failure_modes() {
        let store = InMemoryStore::new();
        let user = UserId::random();

        store.set_failure(FailureMode::RejectWrites).await;
        assert!(store.fetch_food_items(user, None).await.is_ok());
        let write = store
            .insert_food_item(&new_food(user, "Pan", None, StorageBucket::Pantry))
            .await;
        assert!(matches!(write, Err(StoreError::Api { status: 500, .. })));

        store.set_failure(FailureMode::Offline).await;
        assert!(matches!(
            store.fetch_recipes().await,
            Err(StoreError::Unavailable(_))
        ));

        store.set_failure(FailureMode::Healthy).await;
        assert!(store.clear_shopping_list(user).await.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_recipes_joins_videos_and_sorts_by_name() {
        let recipe = |id: i64, name: &str| Recipe {
            id: RecipeId::new(id),
            name: name.to_string(),
            ingredients: None,
            difficulty: None,
            image_url: None,
            video_url: None,
        };
        let store = InMemoryStore::with_catalogue(
            vec![recipe(1, "Tortilla"), recipe(2, "Gazpacho")],
            vec![RecipeVideo {
                recipe_id: RecipeId::new(1),
                url: "https://video.example/tortilla".to_string(),
            }],
        );

        let recipes = store.fetch_recipes().await.unwrap();
        assert_eq!(recipes[0].name, "Gazpacho");
        assert_eq!(
            recipes[1].video_url.as_deref(),
            Some("https://video.example/tortilla")
        );
    }
}
