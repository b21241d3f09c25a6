//! # recipe-suggest
//!
//! Backend core for recipe and ingredient questions. Combines a local
//! structured ingredient dataset with an opaque text-completion service and
//! merges the two sources under a deterministic precedence and provenance
//! labeling scheme.

pub mod assistant;
pub mod completion;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod ingredients;
pub mod models;
pub mod observability;
pub mod recipe_store;
pub mod recipes;
pub mod text_parsing;

// Re-export types for easier access
pub use models::{
    ContextAttributes, IngredientEntry, RecipeDetails, RecipeSuggestion, Source, SuggestionResult,
};
