//! # Ingredient Suggestion Orchestrator
//!
//! Combines the local dataset and the generative adapter into ingredient
//! answers with a fixed precedence, deduplication and provenance-labeling
//! policy.

use crate::assistant::CulinaryAssistant;
use crate::completion::CompletionClient;
use crate::config::LimitsConfig;
use crate::dataset::DatasetService;
use crate::models::{ContextAttributes, Source, SuggestionResult};
use crate::text_parsing::normalize_text;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Orchestrator for ingredient-level queries
#[derive(Debug)]
pub struct IngredientService<C> {
    assistant: CulinaryAssistant<C>,
    dataset: Arc<DatasetService>,
    limits: LimitsConfig,
}

impl<C: CompletionClient> IngredientService<C> {
    pub fn new(
        assistant: CulinaryAssistant<C>,
        dataset: Arc<DatasetService>,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            assistant,
            dataset,
            limits,
        }
    }

    /// Substitutes for an ingredient within a recipe
    ///
    /// Tries the direct substitute query first, then the generic context
    /// query against the recipe title relabeled `gpt_context`. The dataset is
    /// not consulted: substitution needs a target ingredient, which the
    /// dataset scorer does not index on name.
    pub async fn substitutes(
        &self,
        ingredient: &str,
        recipe: Option<&str>,
        max_results: Option<usize>,
        include_reasoning: bool,
    ) -> SuggestionResult {
        let recipe = recipe.unwrap_or("General Recipe");
        let max_results = max_results.unwrap_or(self.limits.max_substitutes);

        let direct = self
            .assistant
            .substitutes(ingredient, recipe, max_results, include_reasoning)
            .await;
        if !direct.is_empty() {
            return direct;
        }

        debug!(ingredient = %ingredient, "Direct substitute query empty, trying context fallback");
        let fallback = self
            .assistant
            .context_ingredients(&ContextAttributes::default(), Some(recipe), max_results)
            .await;
        if !fallback.is_empty() {
            return fallback.relabel(Source::GptContext);
        }

        SuggestionResult::none()
    }

    /// Ingredients matching context attributes, merging dataset and adapter
    ///
    /// When a natural-language description is supplied (and the adapter is
    /// available) it is parsed into the four attributes first; explicitly
    /// supplied attributes take precedence over parsed ones. The dataset is
    /// queried first and returned unmodified when it alone satisfies the
    /// requested count; otherwise adapter items not already present
    /// (case-insensitive, trimmed) are appended up to the count.
    pub async fn context_suggestions(
        &self,
        context: ContextAttributes,
        recipe_title: Option<&str>,
        natural_description: Option<&str>,
        max_results: Option<usize>,
    ) -> SuggestionResult {
        let max_results = max_results.unwrap_or(self.limits.max_ingredients);

        let context = match natural_description {
            Some(description) if self.assistant.is_available() => {
                let parsed = self.assistant.parse_natural_language_context(description).await;
                context.or(parsed)
            }
            _ => context,
        };

        let dataset_result = self.dataset.lookup_by_context(&context, max_results);
        if dataset_result.items.len() >= max_results {
            debug!("Dataset satisfied context query, adapter skipped");
            return dataset_result;
        }

        if !self.assistant.is_available() {
            return dataset_result;
        }

        let gpt_result = self
            .assistant
            .context_ingredients(&context, recipe_title, max_results)
            .await;
        if gpt_result.is_empty() {
            return dataset_result;
        }

        merge_results(dataset_result, gpt_result, max_results)
    }
}

/// Merge dataset items with adapter items, dataset order first, skipping
/// case-insensitive duplicates, up to `max_results`
fn merge_results(
    dataset: SuggestionResult,
    gpt: SuggestionResult,
    max_results: usize,
) -> SuggestionResult {
    let has_dataset = !dataset.items.is_empty();
    let has_gpt = !gpt.items.is_empty();

    let mut merged = dataset.items;
    let mut seen: HashSet<String> = merged.iter().map(|item| normalize_text(item)).collect();

    for item in gpt.items {
        if merged.len() >= max_results {
            break;
        }
        if seen.insert(normalize_text(&item)) {
            merged.push(item);
        }
    }
    merged.truncate(max_results);

    let source = match (has_dataset, has_gpt) {
        (true, true) => Source::DatasetGpt,
        (false, true) => Source::Gpt,
        (true, false) => Source::Dataset,
        (false, false) => Source::None,
    };

    SuggestionResult::new(merged, source)
}
