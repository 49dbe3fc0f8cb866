//! Recipe catalogue records.
//!
//! The catalogue is curated outside the application and is read-only here.

use serde::{Deserialize, Serialize};

use super::{Difficulty, RecipeId};

/// A recipe from the shared catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    /// Comma-separated free-text ingredient phrases ("1 Zanahoria, Sal").
    pub ingredients: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub image_url: Option<String>,
    /// Video link, joined in from the separate video record set.
    pub video_url: Option<String>,
}

/// A video link for a recipe, stored apart from the recipe itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeVideo {
    pub recipe_id: RecipeId,
    pub url: String,
}

/// Attach video links to recipes.
///
/// The first video whose `recipe_id` matches wins. Recipes without a video
/// keep whatever link they already carried.
#[must_use]
pub fn join_videos(mut recipes: Vec<Recipe>, videos: &[RecipeVideo]) -> Vec<Recipe> {
    for recipe in &mut recipes {
        if let Some(video) = videos.iter().find(|v| v.recipe_id == recipe.id) {
            recipe.video_url = Some(video.url.clone());
        }
    }
    recipes
}

/// Catalogue search used by the menu screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Case-insensitive substring of the recipe name; empty matches all.
    pub query: String,
    /// Required difficulty; `None` matches all ("Todos").
    pub difficulty: Option<Difficulty>,
}

impl RecipeFilter {
    /// Whether `recipe` passes this filter.
    #[must_use]
    pub fn matches(&self, recipe: &Recipe) -> bool {
        let query = self.query.trim().to_lowercase();
        let name_matches = query.is_empty() || recipe.name.to_lowercase().contains(&query);
        let difficulty_matches = self
            .difficulty
            .is_none_or(|wanted| recipe.difficulty == Some(wanted));
        name_matches && difficulty_matches
    }

    /// Recipes passing this filter, in catalogue order.
    #[must_use]
    pub fn apply<'a>(&self, recipes: &'a [Recipe]) -> Vec<&'a Recipe> {
        recipes.iter().filter(|r| self.matches(r)).collect()
    }
}
