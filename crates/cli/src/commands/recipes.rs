//! Recipe commands.

use std::sync::Arc;

use mymenu_core::suggest::{highlight_ingredients, ingredients_to_add};
use mymenu_core::{Difficulty, RecipeFilter, RecipeId};
use mymenu_kitchen::AppError;
use mymenu_kitchen::services::RecipeService;
use tracing::info;

use super::Kitchen;

/// Print the catalogue, optionally filtered.
///
/// # Errors
///
/// Returns `AppError::Store` if the catalogue cannot be fetched.
pub async fn list(
    kitchen: &Kitchen,
    query: String,
    difficulty: Option<Difficulty>,
) -> Result<(), AppError> {
    let filter = RecipeFilter { query, difficulty };
    let recipes = RecipeService::new(Arc::clone(&kitchen.store))
        .search(&filter)
        .await?;

    info!("{} recipes", recipes.len());
    for recipe in &recipes {
        info!(
            id = %recipe.id,
            difficulty = recipe.difficulty.map_or("-", Difficulty::label),
            "{}",
            recipe.name
        );
    }
    Ok(())
}

/// Print recipes that use what the user owns, best match first.
///
/// # Errors
///
/// Returns `AppError::Store` if a store call fails.
pub async fn suggest(kitchen: &Kitchen) -> Result<(), AppError> {
    let ranked = RecipeService::new(Arc::clone(&kitchen.store))
        .suggestions(kitchen.user_id)
        .await?;

    if ranked.is_empty() {
        info!("No recipe uses anything you have");
        return Ok(());
    }
    for entry in &ranked {
        info!(
            id = %entry.recipe.id,
            matches = entry.matches,
            "{}",
            entry.recipe.name
        );
    }
    Ok(())
}

/// Print one recipe with each ingredient marked owned or missing.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown recipe, or `AppError::Store`
/// if a store call fails.
pub async fn show(kitchen: &Kitchen, id: RecipeId) -> Result<(), AppError> {
    let service = RecipeService::new(Arc::clone(&kitchen.store));
    let recipe = service.recipe(id).await?;
    let owned = service.owned_names(kitchen.user_id).await?;

    info!(
        id = %recipe.id,
        difficulty = recipe.difficulty.map_or("-", Difficulty::label),
        video = recipe.video_url.as_deref().unwrap_or("-"),
        "{}",
        recipe.name
    );
    for ingredient in highlight_ingredients(&recipe, &owned) {
        let mark = if ingredient.owned { "have" } else { "need" };
        info!("  [{mark}] {}", ingredient.text);
    }

    let missing = ingredients_to_add(&recipe, &owned);
    if !missing.is_empty() {
        info!(
            "Missing {}: run `mymenu shopping import {}` to add them",
            missing.len(),
            recipe.id
        );
    }
    Ok(())
}
