//! # Recipe Suggestion Orchestrator
//!
//! Answers recipe-level queries by composing the optional relational store
//! with the generative adapter, and drives the two-step rewrite pipeline.

use crate::assistant::CulinaryAssistant;
use crate::completion::CompletionClient;
use crate::config::LimitsConfig;
use crate::models::{RecipeDetails, RecipeSuggestion};
use crate::recipe_store::RecipeStore;
use crate::text_parsing::parse_numbered_list;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// User-facing rewrite pipeline failures
///
/// These are structured payloads for the boundary layer, produced only when
/// every fallback is exhausted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum RewriteError {
    /// The detail lookup failed or returned no ingredient text
    IngredientsNotFound { recipe: String },
    /// The rewrite generation itself failed
    RewriteFailed { recipe: String },
}

impl fmt::Display for RewriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteError::IngredientsNotFound { recipe } => {
                write!(f, "Could not find ingredients for recipe '{}'", recipe)
            }
            RewriteError::RewriteFailed { recipe } => {
                write!(f, "Could not rewrite recipe '{}'", recipe)
            }
        }
    }
}

impl std::error::Error for RewriteError {}

/// Orchestrator for recipe-level queries
#[derive(Debug)]
pub struct RecipeService<C> {
    assistant: CulinaryAssistant<C>,
    store: Option<RecipeStore>,
    limits: LimitsConfig,
}

impl<C: CompletionClient> RecipeService<C> {
    pub fn new(
        assistant: CulinaryAssistant<C>,
        store: Option<RecipeStore>,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            assistant,
            store,
            limits,
        }
    }

    /// Recipe suggestions for a set of available ingredients
    ///
    /// The relational store takes precedence when configured: any returned
    /// rows are used directly without consulting the adapter. Zero rows and
    /// transport errors are treated identically as a fall-through to the
    /// generative adapter.
    pub async fn suggestions(
        &self,
        ingredients: &[String],
        max_results: Option<usize>,
    ) -> Vec<RecipeSuggestion> {
        let max_results = max_results.unwrap_or(self.limits.max_recipes);

        if let Some(store) = &self.store {
            match store.search_by_ingredients(ingredients, max_results).await {
                Ok(rows) if !rows.is_empty() => {
                    debug!(row_count = %rows.len(), "Recipe store answered suggestion query");
                    return rows
                        .into_iter()
                        .map(|row| RecipeSuggestion {
                            name: row.name,
                            ingredients: row.ingredients,
                            id: Some(row.id),
                            image_url: row.image_url,
                        })
                        .collect();
                }
                Ok(_) => {
                    debug!("Recipe store had no matching rows, falling back to adapter");
                }
                Err(e) => {
                    warn!(error = %e, "Recipe store query failed, falling back to adapter");
                }
            }
        }

        self.assistant
            .recipe_suggestions(ingredients, max_results)
            .await
    }

    /// Recipes similar to the given one
    pub async fn similar(&self, recipe: &str, max_results: Option<usize>) -> Vec<RecipeSuggestion> {
        let max_results = max_results.unwrap_or(4);
        self.assistant.similar_recipes(recipe, max_results).await
    }

    /// Recipes that must contain every required ingredient
    pub async fn with_required_ingredients(
        &self,
        required_ingredients: &[String],
        recipe_context: Option<&str>,
        max_results: Option<usize>,
    ) -> Vec<RecipeSuggestion> {
        let max_results = max_results.unwrap_or(5);
        self.assistant
            .recipes_with_required_ingredients(required_ingredients, recipe_context, max_results)
            .await
    }

    /// One detailed recipe incorporating substitute ingredients
    pub async fn with_substitutes(
        &self,
        recipe_name: &str,
        substitute_ingredients: &[String],
    ) -> Option<RecipeSuggestion> {
        self.assistant
            .recipe_with_ingredients(recipe_name, substitute_ingredients)
            .await
    }

    /// Detailed ingredients and cooking method for a recipe
    pub async fn details(&self, recipe_name: &str) -> Option<RecipeDetails> {
        self.assistant.recipe_details(recipe_name).await
    }

    /// Rewrite a recipe replacing exactly one ingredient
    ///
    /// Fetches recipe details first; a failed lookup or empty ingredient text
    /// short-circuits with `IngredientsNotFound` before any rewrite call.
    /// Otherwise the ingredient list is flattened to a single comma-joined
    /// string and handed to the rewrite operation.
    pub async fn rewrite(
        &self,
        recipe_name: &str,
        original_ingredient: &str,
        substitute_ingredient: &str,
    ) -> Result<RecipeDetails, RewriteError> {
        let details = self.assistant.recipe_details(recipe_name).await;

        let ingredients_text = match details {
            Some(details) if !details.ingredients.trim().is_empty() => details.ingredients,
            _ => {
                warn!(recipe = %recipe_name, "Detail lookup yielded no ingredients, skipping rewrite");
                return Err(RewriteError::IngredientsNotFound {
                    recipe: recipe_name.to_string(),
                });
            }
        };

        let flattened = parse_numbered_list(&ingredients_text).join(", ");

        self.assistant
            .updated_recipe_with_substitution(
                recipe_name,
                &flattened,
                original_ingredient,
                substitute_ingredient,
            )
            .await
            .ok_or_else(|| RewriteError::RewriteFailed {
                recipe: recipe_name.to_string(),
            })
    }
}
