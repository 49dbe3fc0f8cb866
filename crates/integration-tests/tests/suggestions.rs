//! Integration tests for recipe suggestions.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use mymenu_core::suggest::highlight_ingredients;
use mymenu_core::{Difficulty, RecipeFilter, RecipeId, StorageBucket, UserId};
use mymenu_integration_tests::{catalogue_store, stock};
use mymenu_kitchen::AppError;
use mymenu_kitchen::services::RecipeService;

#[tokio::test]
async fn test_catalogue_is_sorted_and_carries_videos() {
    let service = RecipeService::new(catalogue_store());

    let catalogue = service.catalogue().await.unwrap();
    let names: Vec<&str> = catalogue.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Crepes", "Gazpacho", "Paella", "Tortilla de patatas"]);

    let paella = catalogue.iter().find(|r| r.name == "Paella").unwrap();
    assert_eq!(paella.video_url.as_deref(), Some("https://youtu.be/paella"));
    assert!(catalogue.iter().filter(|r| r.name != "Paella").all(|r| r.video_url.is_none()));
}

#[tokio::test]
async fn test_suggestions_rank_by_owned_ingredients() {
    let store = catalogue_store();
    let user = UserId::random();
    for (name, bucket) in [
        ("Aceite", StorageBucket::Pantry),
        ("Pimiento rojo", StorageBucket::Refrigerator),
        ("Pimiento", StorageBucket::Refrigerator),
        ("Tomate", StorageBucket::Refrigerator),
        ("Huevos", StorageBucket::Refrigerator),
    ] {
        stock(&store, user, name, None, bucket).await.unwrap();
    }

    let ranked: Vec<(String, usize)> = RecipeService::new(Arc::clone(&store))
        .suggestions(user)
        .await
        .unwrap()
        .into_iter()
        .map(|r| (r.recipe.name, r.matches))
        .collect();

    assert_eq!(
        ranked,
        vec![
            ("Gazpacho".to_string(), 3),
            ("Tortilla de patatas".to_string(), 2),
            ("Crepes".to_string(), 1),
            ("Paella".to_string(), 1),
        ]
    );
}

#[tokio::test]
async fn test_no_food_means_no_suggestions() {
    let store = catalogue_store();
    let user = UserId::random();
    // Names shorter than three characters never count as owned.
    stock(&store, user, "Té", None, StorageBucket::Pantry)
        .await
        .unwrap();

    let ranked = RecipeService::new(store).suggestions(user).await.unwrap();
    assert!(ranked.is_empty());
}

#[tokio::test]
async fn test_missing_ingredients_and_highlighting() {
    let store = catalogue_store();
    let user = UserId::random();
    stock(&store, user, "leche", None, StorageBucket::Refrigerator)
        .await
        .unwrap();
    stock(&store, user, "HARINA", None, StorageBucket::Pantry)
        .await
        .unwrap();

    let service = RecipeService::new(Arc::clone(&store));
    let result = service
        .missing_ingredients(user, RecipeId::new(2))
        .await
        .unwrap();
    assert_eq!(result.missing, vec!["Huevos", "Azúcar"]);

    let owned = service.owned_names(user).await.unwrap();
    let flags: Vec<(&str, bool)> = highlight_ingredients(&result.recipe, &owned)
        .into_iter()
        .map(|m| (m.text, m.owned))
        .collect();
    assert_eq!(
        flags,
        vec![
            ("Leche", true),
            ("Huevos", false),
            ("Harina", true),
            ("Azúcar", false),
        ]
    );

    let unknown = service.missing_ingredients(user, RecipeId::new(99)).await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_search_filters_by_name_and_difficulty() {
    let service = RecipeService::new(catalogue_store());

    let easy = service
        .search(&RecipeFilter {
            query: String::new(),
            difficulty: Some(Difficulty::Easy),
        })
        .await
        .unwrap();
    let names: Vec<&str> = easy.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Crepes", "Gazpacho"]);

    let by_name = service
        .search(&RecipeFilter {
            query: "TORTI".to_string(),
            difficulty: None,
        })
        .await
        .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].id, RecipeId::new(1));
}
