//! # Ingredient Dataset Service
//!
//! Loads the local ingredient catalog once per process and answers
//! context-attribute queries against it with a deterministic scoring scheme.
//!
//! The catalog is a JSON document keyed by category, then ingredient name,
//! with list-valued attribute properties. Loading fails soft: a missing or
//! malformed file logs a warning and yields an empty catalog, never an error.

use crate::config::DatasetConfig;
use crate::models::{ContextAttributes, IngredientEntry, Source, SuggestionResult};
use crate::text_parsing::to_casefold_set;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// On-disk shape of one ingredient's properties
#[derive(Debug, Deserialize)]
struct IngredientProps {
    #[serde(default, rename = "hasOtherNames")]
    has_other_names: Vec<String>,
    #[serde(default, rename = "hasFlavor")]
    has_flavor: Vec<String>,
    #[serde(default, rename = "hasTexture")]
    has_texture: Vec<String>,
    #[serde(default, rename = "hasColor")]
    has_color: Vec<String>,
    #[serde(default, rename = "canCook")]
    can_cook: Vec<String>,
}

/// Ingredient catalog with a process-lifetime, load-once cache
///
/// Construct one per process and hand out references; tests construct their
/// own instances against synthetic files.
#[derive(Debug)]
pub struct DatasetService {
    config: DatasetConfig,
    entries: OnceLock<Vec<IngredientEntry>>,
}

impl DatasetService {
    pub fn new(config: DatasetConfig) -> Self {
        Self {
            config,
            entries: OnceLock::new(),
        }
    }

    /// Entries, loading the catalog on first access
    ///
    /// `OnceLock` guarantees at most one load under concurrent first access.
    fn entries(&self) -> &[IngredientEntry] {
        self.entries.get_or_init(|| self.load_entries())
    }

    fn load_entries(&self) -> Vec<IngredientEntry> {
        let content = match fs::read_to_string(&self.config.path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %self.config.path, error = %e, "Dataset file not readable");
                return Vec::new();
            }
        };

        let data: HashMap<String, HashMap<String, IngredientProps>> =
            match serde_json::from_str(&content) {
                Ok(data) => data,
                Err(e) => {
                    warn!(path = %self.config.path, error = %e, "Invalid dataset format");
                    return Vec::new();
                }
            };

        let mut entries: Vec<IngredientEntry> = data
            .into_values()
            .flatten()
            .filter_map(|(name, props)| {
                let canonical_name = name.trim().to_string();
                if canonical_name.is_empty() {
                    return None;
                }
                Some(IngredientEntry {
                    canonical_name,
                    other_names: trim_all(props.has_other_names),
                    flavors: trim_all(props.has_flavor),
                    textures: trim_all(props.has_texture),
                    colors: trim_all(props.has_color),
                    cook_methods: trim_all(props.can_cook),
                })
            })
            .collect();

        // JSON map iteration order is unspecified; fix it so dedup and
        // tie-breaks are stable across runs
        entries.sort_by(|a, b| a.canonical_name.cmp(&b.canonical_name));

        info!(
            path = %self.config.path,
            entry_count = %entries.len(),
            "Loaded ingredient dataset"
        );
        entries
    }

    /// Score the catalog against context attributes and return the top matches
    ///
    /// Each present attribute awards +1 when its casefolded value appears in
    /// the entry's corresponding attribute set. Entries scoring 0 are
    /// discarded, duplicates by canonical name keep the first occurrence, and
    /// output is ordered by descending score then ascending name.
    pub fn lookup_by_context(
        &self,
        context: &ContextAttributes,
        max_results: usize,
    ) -> SuggestionResult {
        let entries = self.entries();
        if entries.is_empty() {
            return SuggestionResult::none();
        }

        let taste_q = normalized_query(&context.taste);
        let texture_q = normalized_query(&context.texture);
        let color_q = normalized_query(&context.color);
        let method_q = normalized_query(&context.cooking_method);

        let mut scored: Vec<(usize, &str)> = Vec::new();
        let mut seen: std::collections::HashSet<&str> = std::collections::HashSet::new();

        for entry in entries {
            let mut score = 0;
            if attribute_matches(&taste_q, &entry.flavors) {
                score += 1;
            }
            if attribute_matches(&texture_q, &entry.textures) {
                score += 1;
            }
            if attribute_matches(&color_q, &entry.colors) {
                score += 1;
            }
            if attribute_matches(&method_q, &entry.cook_methods) {
                score += 1;
            }

            if score == 0 {
                continue;
            }

            let name = entry.canonical_name.as_str();
            if seen.insert(name) {
                scored.push((score, name));
            }
        }

        // Descending score, ascending name for deterministic output
        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));

        let items: Vec<String> = scored
            .into_iter()
            .take(max_results)
            .map(|(_, name)| name.to_string())
            .collect();

        debug!(result_count = %items.len(), "Dataset context lookup complete");
        SuggestionResult::new(items, Source::Dataset)
    }
}

fn trim_all(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn normalized_query(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

fn attribute_matches(query: &Option<String>, values: &[String]) -> bool {
    match query {
        Some(q) => to_casefold_set(values).iter().any(|v| v == q),
        None => false,
    }
}
