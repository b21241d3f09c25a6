//! # Data Models
//!
//! Value types shared by the suggestion pipeline: dataset entries, recipe
//! suggestions, provenance-labeled results and request-scoped context
//! attributes. All of these are plain owned values; nothing here is mutated
//! after creation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Provenance label identifying where a suggestion result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Local ingredient dataset
    Dataset,
    /// Generative completion service
    Gpt,
    /// Secondary generative context query (substitute fallback)
    GptContext,
    /// Merged dataset and generative results
    #[serde(rename = "dataset+gpt")]
    DatasetGpt,
    /// No source produced any items
    None,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Source::Dataset => "dataset",
            Source::Gpt => "gpt",
            Source::GptContext => "gpt_context",
            Source::DatasetGpt => "dataset+gpt",
            Source::None => "none",
        };
        write!(f, "{}", label)
    }
}

/// An ingredient entry from the local dataset
///
/// `canonical_name` is the deduplication key; the attribute lists hold the
/// raw values from the dataset file and are casefolded only at query time.
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientEntry {
    pub canonical_name: String,
    pub other_names: Vec<String>,
    pub flavors: Vec<String>,
    pub textures: Vec<String>,
    pub colors: Vec<String>,
    pub cook_methods: Vec<String>,
}

/// A recipe suggestion with its ingredients as free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSuggestion {
    pub name: String,
    /// Comma-separated ingredient text, not a structured list
    pub ingredients: String,
    /// Row identifier when the suggestion came from the relational store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Image reference when the suggestion came from the relational store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl RecipeSuggestion {
    /// Create a suggestion parsed from generative output (no row metadata)
    pub fn new(name: impl Into<String>, ingredients: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ingredients: ingredients.into(),
            id: None,
            image_url: None,
        }
    }
}

/// Ordered suggestion items with a provenance label
///
/// Invariants: `reasoning`, when present, has the same length as `items`;
/// `source` is `Source::None` exactly when `items` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionResult {
    pub items: Vec<String>,
    pub source: Source,
    /// Parallel per-item reasoning lines, only populated when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<Vec<String>>,
}

impl SuggestionResult {
    /// Build a result, forcing `Source::None` when there are no items
    pub fn new(items: Vec<String>, source: Source) -> Self {
        let source = if items.is_empty() { Source::None } else { source };
        Self {
            items,
            source,
            reasoning: None,
        }
    }

    /// Build a result with parallel reasoning lines
    pub fn with_reasoning(items: Vec<String>, source: Source, reasoning: Vec<String>) -> Self {
        debug_assert_eq!(items.len(), reasoning.len());
        let source = if items.is_empty() { Source::None } else { source };
        let reasoning = if items.is_empty() { None } else { Some(reasoning) };
        Self {
            items,
            source,
            reasoning,
        }
    }

    /// The canonical empty result
    pub fn none() -> Self {
        Self {
            items: Vec::new(),
            source: Source::None,
            reasoning: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Relabel a non-empty result; empty results keep `Source::None`
    pub fn relabel(mut self, source: Source) -> Self {
        if !self.items.is_empty() {
            self.source = source;
        }
        self
    }
}

/// Detailed recipe information: ingredient list and cooking method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetails {
    pub ingredients: String,
    pub cooking_method: String,
}

/// Request-scoped taste/texture/color/cooking-method facets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextAttributes {
    pub taste: Option<String>,
    pub texture: Option<String>,
    pub color: Option<String>,
    pub cooking_method: Option<String>,
}

impl ContextAttributes {
    pub fn is_empty(&self) -> bool {
        self.taste.is_none()
            && self.texture.is_none()
            && self.color.is_none()
            && self.cooking_method.is_none()
    }

    /// Fill unset attributes from another set; explicit values win
    pub fn or(mut self, fallback: ContextAttributes) -> Self {
        self.taste = self.taste.or(fallback.taste);
        self.texture = self.texture.or(fallback.texture);
        self.color = self.color.or(fallback.color);
        self.cooking_method = self.cooking_method.or(fallback.cooking_method);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_items_force_none_source() {
        let result = SuggestionResult::new(Vec::new(), Source::Gpt);
        assert_eq!(result.source, Source::None);
        assert!(result.is_empty());
    }

    #[test]
    fn test_relabel_keeps_none_for_empty() {
        let result = SuggestionResult::none().relabel(Source::GptContext);
        assert_eq!(result.source, Source::None);

        let result =
            SuggestionResult::new(vec!["tofu".to_string()], Source::Gpt).relabel(Source::GptContext);
        assert_eq!(result.source, Source::GptContext);
    }

    #[test]
    fn test_source_labels() {
        assert_eq!(Source::Dataset.to_string(), "dataset");
        assert_eq!(Source::GptContext.to_string(), "gpt_context");
        assert_eq!(Source::DatasetGpt.to_string(), "dataset+gpt");
    }

    #[test]
    fn test_context_attributes_precedence() {
        let explicit = ContextAttributes {
            taste: Some("sweet".to_string()),
            ..Default::default()
        };
        let parsed = ContextAttributes {
            taste: Some("sour".to_string()),
            texture: Some("creamy".to_string()),
            ..Default::default()
        };

        let merged = explicit.or(parsed);
        assert_eq!(merged.taste.as_deref(), Some("sweet"));
        assert_eq!(merged.texture.as_deref(), Some("creamy"));
        assert!(merged.color.is_none());
    }
}
