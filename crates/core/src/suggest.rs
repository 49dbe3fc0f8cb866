//! Ingredient matching against what the user already owns.
//!
//! A recipe's ingredient list is one comma-separated string of free-text
//! phrases ("1 Zanahoria grande, Sal"). An ingredient phrase counts as owned
//! when the name of some owned food item appears inside it, ignoring case.
//! Nothing is parsed beyond splitting on commas and trimming.

use crate::types::{FoodItem, Recipe};

/// Owned names shorter than this never match, to avoid noise from tokens like "sa".
pub const MIN_OWNED_NAME_CHARS: usize = 3;

/// Normalized names of the food a user owns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnedNames {
    names: Vec<String>,
}

impl OwnedNames {
    /// Normalize raw names: trim, lowercase, drop names too short to match.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim().to_lowercase();
            if name.chars().count() >= MIN_OWNED_NAME_CHARS && !normalized.contains(&name) {
                normalized.push(name);
            }
        }
        Self { names: normalized }
    }

    /// Owned names taken from a user's food items across all buckets.
    #[must_use]
    pub fn from_items(items: &[FoodItem]) -> Self {
        Self::new(items.iter().map(|item| item.name.as_str()))
    }

    /// Number of usable names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no usable names remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether some owned name occurs inside the ingredient phrase.
    #[must_use]
    pub fn covers(&self, ingredient: &str) -> bool {
        let ingredient = ingredient.trim().to_lowercase();
        self.names.iter().any(|name| ingredient.contains(name.as_str()))
    }
}

impl<S: AsRef<str>> FromIterator<S> for OwnedNames {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Split an ingredient string into trimmed, non-empty phrases.
pub fn ingredient_segments(ingredients: &str) -> impl Iterator<Item = &str> {
    ingredients
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}

fn recipe_segments(recipe: &Recipe) -> impl Iterator<Item = &str> {
    ingredient_segments(recipe.ingredients.as_deref().unwrap_or_default())
}

/// Number of the recipe's ingredient phrases the user already owns.
///
/// A recipe with no ingredients scores zero.
#[must_use]
pub fn match_count(recipe: &Recipe, owned: &OwnedNames) -> usize {
    recipe_segments(recipe)
        .filter(|segment| owned.covers(segment))
        .count()
}

/// A recipe worth suggesting, with its match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion<'a> {
    pub recipe: &'a Recipe,
    pub matches: usize,
}

/// Rank the catalogue by how many ingredients the user owns.
///
/// Recipes with no matches are dropped. Higher scores come first and equal
/// scores keep catalogue order.
#[must_use]
pub fn suggest_recipes<'a>(recipes: &'a [Recipe], owned: &OwnedNames) -> Vec<Suggestion<'a>> {
    let mut suggestions: Vec<Suggestion<'a>> = recipes
        .iter()
        .map(|recipe| Suggestion {
            recipe,
            matches: match_count(recipe, owned),
        })
        .filter(|suggestion| suggestion.matches > 0)
        .collect();
    suggestions.sort_by(|a, b| b.matches.cmp(&a.matches));
    suggestions
}

/// Ingredient phrases the user still has to buy, as written in the recipe.
///
/// An empty result means the user already has everything.
#[must_use]
pub fn ingredients_to_add(recipe: &Recipe, owned: &OwnedNames) -> Vec<String> {
    recipe_segments(recipe)
        .filter(|segment| !owned.covers(segment))
        .map(str::to_owned)
        .collect()
}

/// One ingredient phrase of a recipe card and whether the user owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientMatch<'a> {
    pub text: &'a str,
    pub owned: bool,
}

/// Every ingredient phrase of a recipe, flagged owned or missing.
#[must_use]
pub fn highlight_ingredients<'a>(
    recipe: &'a Recipe,
    owned: &OwnedNames,
) -> Vec<IngredientMatch<'a>> {
    recipe_segments(recipe)
        .map(|text| IngredientMatch {
            text,
            owned: owned.covers(text),
        })
        .collect()
}
