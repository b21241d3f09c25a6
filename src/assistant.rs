//! # Culinary Assistant
//!
//! Generative-text adapter for the suggestion pipeline. Each operation builds
//! a deterministic system/user prompt pair, invokes the opaque completion
//! service, and parses the free-text reply into typed values.
//!
//! ## Failure policy
//!
//! The completion service is best-effort by nature, so every operation here
//! is infallible from the caller's point of view: transport failures are
//! logged and surfaced as empty results, and parse failures fall back to an
//! explicit synthesized value. Callers must check `is_available` semantics
//! only through the empty results they receive.

use crate::completion::CompletionClient;
use crate::models::{ContextAttributes, RecipeDetails, RecipeSuggestion, Source, SuggestionResult};
use crate::text_parsing::{
    parse_labeled_pair, parse_numbered_list, split_name_reason, strip_list_marker,
};
use serde::Deserialize;
use tracing::{debug, warn};

// Fallback vocabularies for natural-language context extraction when the
// structured reply cannot be parsed
const TASTE_KEYWORDS: &[&str] = &[
    "sour", "sweet", "salty", "bitter", "umami", "spicy", "tangy", "mild",
];
const TEXTURE_KEYWORDS: &[&str] = &[
    "crunchy", "soft", "crispy", "creamy", "chewy", "smooth", "firm", "tender",
];
const COLOR_KEYWORDS: &[&str] = &[
    "red", "green", "yellow", "orange", "white", "brown", "purple", "black",
];
const COOKING_METHOD_KEYWORDS: &[&str] = &[
    "fried", "boiled", "grilled", "baked", "raw", "steamed", "roasted",
];

/// Structured reply shape for natural-language context extraction
#[derive(Debug, Deserialize)]
struct ParsedContextReply {
    taste: Option<String>,
    texture: Option<String>,
    color: Option<String>,
    cooking_method: Option<String>,
}

/// Generative-text adapter over an opaque completion client
#[derive(Debug, Clone)]
pub struct CulinaryAssistant<C> {
    client: C,
}

impl<C: CompletionClient> CulinaryAssistant<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Whether the underlying completion service is configured
    pub fn is_available(&self) -> bool {
        self.client.is_available()
    }

    /// Issue a completion request, mapping every failure to `None`
    async fn request(&self, system: &str, user: &str, max_tokens: u32) -> Option<String> {
        if !self.client.is_available() {
            return None;
        }
        match self.client.complete(system, user, max_tokens).await {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Completion request failed");
                None
            }
        }
    }

    /// Substitute ingredients for a target ingredient within a recipe
    pub async fn substitutes(
        &self,
        ingredient: &str,
        recipe: &str,
        max_results: usize,
        with_reasoning: bool,
    ) -> SuggestionResult {
        let system = if with_reasoning {
            format!(
                "You are a culinary expert. Provide up to {} substitutes \
                 for the ingredient with brief reasons. Format each line as: \
                 'Ingredient - reason'. No extra text.",
                max_results
            )
        } else {
            format!(
                "You are a culinary expert. Provide up to {} substitute \
                 ingredients for the target ingredient in the given recipe. \
                 Respond as a numbered list with only ingredient names.",
                max_results
            )
        };
        let user = format!("Ingredient: {}\nRecipe: {}", ingredient, recipe);

        let Some(reply) = self.request(&system, &user, 200).await else {
            return SuggestionResult::none();
        };

        if with_reasoning {
            let mut items = Vec::new();
            let mut reasons = Vec::new();
            for line in parse_numbered_list(&reply) {
                let (name, reason) = split_name_reason(&line);
                if !name.is_empty() {
                    items.push(name);
                    reasons.push(reason);
                }
            }
            items.truncate(max_results);
            reasons.truncate(max_results);
            SuggestionResult::with_reasoning(items, Source::Gpt, reasons)
        } else {
            let mut items = parse_numbered_list(&reply);
            items.truncate(max_results);
            SuggestionResult::new(items, Source::Gpt)
        }
    }

    /// Recipe suggestions for a set of available ingredients
    pub async fn recipe_suggestions(
        &self,
        ingredients: &[String],
        max_results: usize,
    ) -> Vec<RecipeSuggestion> {
        let system = format!(
            "You are a concise culinary assistant. Suggest up to {} \
             recipes as a numbered list. Each item must be in the form: \
             Recipe: <name> | Ingredients: <comma-separated list>. No extra commentary.",
            max_results
        );
        let user = format!("Available ingredients: {}", ingredients.join(", "));

        let Some(reply) = self.request(&system, &user, 400).await else {
            return Vec::new();
        };

        let mut results = parse_recipe_lines(&reply);
        results.truncate(max_results);
        results
    }

    /// Recipes similar to a given one
    pub async fn similar_recipes(
        &self,
        original_recipe: &str,
        max_results: usize,
    ) -> Vec<RecipeSuggestion> {
        let system = format!(
            "You are a concise culinary assistant. Suggest up to {} \
             recipes that are similar to the given recipe. Each item must be in the form: \
             Recipe: <name> | Ingredients: <comma-separated list>. No extra commentary.",
            max_results
        );
        let user = format!("Original recipe: {}", original_recipe);

        let Some(reply) = self.request(&system, &user, 400).await else {
            return Vec::new();
        };

        let mut results = parse_recipe_lines(&reply);
        results.truncate(max_results);
        results
    }

    /// Recipes that must contain every required ingredient
    ///
    /// Parsed candidates whose ingredient text does not case-insensitively
    /// contain every required ingredient are dropped even when they matched
    /// the reply pattern.
    pub async fn recipes_with_required_ingredients(
        &self,
        required_ingredients: &[String],
        recipe_context: Option<&str>,
        max_results: usize,
    ) -> Vec<RecipeSuggestion> {
        let required_text = required_ingredients.join(", ");
        let context_text = recipe_context
            .map(|c| format!(" similar to {}", c))
            .unwrap_or_default();

        let system = format!(
            "You are a concise culinary assistant. Suggest up to {} \
             recipes that MUST include ALL of these ingredients: {}. \
             Each recipe suggestion must be in the form: \
             Recipe: <name> | Ingredients: <comma-separated list>. \
             Ensure every suggested recipe includes all the required ingredients. No extra commentary.",
            max_results, required_text
        );
        let user = format!(
            "Required ingredients that MUST be in every recipe: {}{}",
            required_text, context_text
        );

        let Some(reply) = self.request(&system, &user, 500).await else {
            return Vec::new();
        };

        let mut results: Vec<RecipeSuggestion> = parse_recipe_lines(&reply)
            .into_iter()
            .filter(|recipe| contains_all_ingredients(&recipe.ingredients, required_ingredients))
            .collect();
        results.truncate(max_results);
        results
    }

    /// One detailed recipe incorporating substitute ingredients
    ///
    /// On parse failure, synthesizes a placeholder suggestion instead of
    /// failing; `None` only signals a completion failure.
    pub async fn recipe_with_ingredients(
        &self,
        recipe_name: &str,
        substitute_ingredients: &[String],
    ) -> Option<RecipeSuggestion> {
        let substitutes_text = if substitute_ingredients.is_empty() {
            "none".to_string()
        } else {
            substitute_ingredients.join(", ")
        };

        let system = "You are a culinary expert. Provide the detailed recipe with complete ingredient list. \
                      If substitute ingredients are provided, incorporate them into the recipe. \
                      Format as: Recipe: <name> | Ingredients: <comma-separated list>. No extra commentary.";
        let user = format!(
            "Recipe: {}\nSubstitute ingredients to include: {}",
            recipe_name, substitutes_text
        );

        let reply = self.request(system, &user, 300).await?;

        let line = strip_list_marker(reply.trim());
        if let Some((name, ingredients)) = parse_labeled_pair(&line, "Recipe", "Ingredients") {
            return Some(RecipeSuggestion::new(name, ingredients));
        }

        debug!(recipe = %recipe_name, "Recipe reply did not match pair format, synthesizing placeholder");
        Some(RecipeSuggestion::new(
            recipe_name,
            format!(
                "Recipe details for {} with substitutes: {}",
                recipe_name, substitutes_text
            ),
        ))
    }

    /// Detailed ingredients-with-quantities and cooking method for a recipe
    ///
    /// On parse failure, the whole reply becomes the cooking method.
    pub async fn recipe_details(&self, recipe_name: &str) -> Option<RecipeDetails> {
        let system = "You are a culinary expert. Provide a detailed recipe with specific ingredients list (including quantities) and cooking method. \
                      Format your response as: 'Ingredients: <ingredient list with quantities> | Cooking Method: <detailed steps>'. \
                      Be comprehensive but concise. Use standard measurements and be specific about quantities.";
        let user = format!("Recipe name: {}", recipe_name);

        let reply = self.request(system, &user, 500).await?;

        if let Some((ingredients, cooking_method)) =
            parse_labeled_pair(&reply, "Ingredients", "Cooking Method")
        {
            return Some(RecipeDetails {
                ingredients,
                cooking_method,
            });
        }

        debug!(recipe = %recipe_name, "Details reply did not match pair format, using whole reply as method");
        Some(RecipeDetails {
            ingredients: format!(
                "Ingredients for {} (see cooking method for details)",
                recipe_name
            ),
            cooking_method: reply.trim().to_string(),
        })
    }

    /// Minimally-edited recipe replacing exactly one ingredient
    pub async fn updated_recipe_with_substitution(
        &self,
        recipe_name: &str,
        original_ingredients: &str,
        original_ingredient: &str,
        substitute_ingredient: &str,
    ) -> Option<RecipeDetails> {
        let system = "You are a culinary expert. Update the given recipe by making MINIMAL changes - ONLY substitute the specified ingredient. \
                      Keep ALL other ingredients exactly the same with same quantities and descriptions. \
                      IMPORTANT: Provide the COMPLETE updated ingredients list and COMPLETE cooking method, but only change the specific ingredient being substituted. \
                      Only modify cooking instructions if the substitute ingredient requires different handling (different cooking time, temperature, or preparation). \
                      Format your response as: 'Updated Ingredients: <COMPLETE updated ingredient list with all original ingredients except the substituted one> | Updated Cooking Method: <COMPLETE detailed cooking steps>'. \
                      Show the full recipe details, not just a brief summary.";
        let user = format!(
            "Recipe: {}\nOriginal ingredients: {}\nReplace ONLY '{}' with '{}' - keep everything else identical but show the complete updated recipe",
            recipe_name, original_ingredients, original_ingredient, substitute_ingredient
        );

        let reply = self.request(system, &user, 800).await?;

        if let Some((ingredients, cooking_method)) =
            parse_labeled_pair(&reply, "Updated Ingredients", "Updated Cooking Method")
        {
            return Some(RecipeDetails {
                ingredients,
                cooking_method,
            });
        }

        debug!(recipe = %recipe_name, "Rewrite reply did not match pair format, using fallback");
        Some(RecipeDetails {
            ingredients: format!(
                "Updated ingredients for {} (substituting {} with {})\n{}",
                recipe_name,
                original_ingredient,
                substitute_ingredient,
                reply.trim()
            ),
            cooking_method: format!(
                "Please refer to the updated ingredients section above for the complete recipe details with {} substituted for {}.",
                substitute_ingredient, original_ingredient
            ),
        })
    }

    /// Ingredient names matching free-text context constraints
    pub async fn context_ingredients(
        &self,
        context: &ContextAttributes,
        recipe_title: Option<&str>,
        max_results: usize,
    ) -> SuggestionResult {
        let mut constraints = Vec::new();
        if let Some(taste) = &context.taste {
            constraints.push(format!("Taste: {}", taste));
        }
        if let Some(texture) = &context.texture {
            constraints.push(format!("Texture: {}", texture));
        }
        if let Some(color) = &context.color {
            constraints.push(format!("Color: {}", color));
        }
        if let Some(method) = &context.cooking_method {
            constraints.push(format!("Cooking method: {}", method));
        }
        if let Some(title) = recipe_title {
            constraints.push(format!("Recipe: {}", title));
        }

        let constraint_text = if constraints.is_empty() {
            "No constraints".to_string()
        } else {
            constraints.join(" | ")
        };

        let system = format!(
            "You are a concise culinary assistant. Suggest up to {} \
             ingredient names that match the given context and optionally the recipe. \
             Return a numbered list of ingredient names only.",
            max_results
        );
        let user = format!("Context: {}", constraint_text);

        let Some(reply) = self.request(&system, &user, 300).await else {
            return SuggestionResult::none();
        };

        let mut items = parse_numbered_list(&reply);
        items.truncate(max_results);
        SuggestionResult::new(items, Source::Gpt)
    }

    /// Extract taste/texture/color/cooking-method facets from free text
    ///
    /// Tries the structured JSON reply first, then falls back to matching
    /// fixed per-attribute vocabularies against the reply text.
    pub async fn parse_natural_language_context(&self, description: &str) -> ContextAttributes {
        if description.trim().is_empty() {
            return ContextAttributes::default();
        }

        let system = "You are a culinary expert that analyzes food descriptions. \
                      Parse the given description and extract taste/flavor, texture, color, and cooking method. \
                      Return ONLY a JSON object with keys: taste, texture, color, cooking_method. \
                      Use null for missing information. Be concise with single words or short phrases.";
        let user = format!("Description: {}", description);

        let Some(reply) = self.request(system, &user, 150).await else {
            return ContextAttributes::default();
        };

        match serde_json::from_str::<ParsedContextReply>(strip_code_fences(&reply)) {
            Ok(parsed) => ContextAttributes {
                taste: parsed.taste,
                texture: parsed.texture,
                color: parsed.color,
                cooking_method: parsed.cooking_method,
            },
            Err(e) => {
                debug!(error = %e, "Context reply was not valid JSON, falling back to keywords");
                let lower = reply.to_lowercase();
                ContextAttributes {
                    taste: extract_keyword(&lower, TASTE_KEYWORDS),
                    texture: extract_keyword(&lower, TEXTURE_KEYWORDS),
                    color: extract_keyword(&lower, COLOR_KEYWORDS),
                    cooking_method: extract_keyword(&lower, COOKING_METHOD_KEYWORDS),
                }
            }
        }
    }
}

/// Parse per-line `Recipe: <name> | Ingredients: <list>` replies
fn parse_recipe_lines(reply: &str) -> Vec<RecipeSuggestion> {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(strip_list_marker)
        .filter_map(|line| {
            parse_labeled_pair(&line, "Recipe", "Ingredients")
                .map(|(name, ingredients)| RecipeSuggestion::new(name, ingredients))
        })
        .collect()
}

/// Case-insensitive check that every required ingredient appears in the text
fn contains_all_ingredients(ingredients_text: &str, required: &[String]) -> bool {
    let haystack = ingredients_text.to_lowercase();
    required
        .iter()
        .all(|ingredient| haystack.contains(&ingredient.to_lowercase()))
}

/// Strip markdown code fences some models wrap JSON replies in
fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let trimmed = trimmed.strip_prefix("```json").unwrap_or(trimmed);
    let trimmed = trimmed.strip_prefix("```").unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed);
    trimmed.trim()
}

fn extract_keyword(text: &str, keywords: &[&str]) -> Option<String> {
    keywords
        .iter()
        .find(|keyword| text.contains(*keyword))
        .map(|keyword| keyword.to_string())
}
