//! # Relational Recipe Store
//!
//! Optional Postgres-backed lookup over a table of recipe rows. When no
//! database is configured the store is simply absent and callers fall back
//! to the generative adapter.

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use std::time::Duration;
use tracing::{debug, info};

/// A recipe row from the relational store
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeRow {
    pub id: i64,
    pub name: String,
    pub ingredients: String,
    pub image_url: Option<String>,
}

/// Postgres-backed recipe lookup
#[derive(Debug, Clone)]
pub struct RecipeStore {
    pool: PgPool,
}

impl RecipeStore {
    /// Connect to the configured database
    ///
    /// Returns `None` when no URL is configured; connection failures are
    /// real errors so misconfiguration surfaces at startup.
    pub async fn connect(config: &DatabaseConfig) -> Result<Option<Self>> {
        let Some(url) = &config.url else {
            info!("No database configured, relational recipe lookup disabled");
            return Ok(None);
        };

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(url)
            .await
            .context("Failed to connect to recipe database")?;

        info!("Connected to recipe database");
        Ok(Some(Self { pool }))
    }

    /// Wrap an existing pool (used by tests)
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Initialize the recipe table schema
    pub async fn init_schema(&self) -> Result<()> {
        info!("Initializing recipe store schema");

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS recipes (
                id BIGSERIAL PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                ingredients TEXT NOT NULL,
                image_url TEXT
            )",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create recipes table")?;

        Ok(())
    }

    /// Insert a recipe row, returning its id
    pub async fn insert_recipe(
        &self,
        name: &str,
        ingredients: &str,
        image_url: Option<&str>,
    ) -> Result<i64> {
        let row = sqlx::query(
            "INSERT INTO recipes (name, ingredients, image_url) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(name)
        .bind(ingredients)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert recipe row")?;

        Ok(row.get(0))
    }

    /// Find rows where any listed ingredient appears as a case-insensitive
    /// substring of the row's ingredient text
    pub async fn search_by_ingredients(
        &self,
        ingredients: &[String],
        max_results: usize,
    ) -> Result<Vec<RecipeRow>> {
        if ingredients.is_empty() {
            return Ok(Vec::new());
        }

        debug!(ingredient_count = %ingredients.len(), "Searching recipe rows");

        // OR'ed ILIKE patterns over the ingredients column
        let conditions: Vec<String> = (1..=ingredients.len())
            .map(|i| format!("ingredients ILIKE ${}", i))
            .collect();
        let sql = format!(
            "SELECT id, name, ingredients, image_url FROM recipes WHERE {} ORDER BY id LIMIT {}",
            conditions.join(" OR "),
            max_results as i64
        );

        let mut query = sqlx::query(&sql);
        for ingredient in ingredients {
            query = query.bind(format!("%{}%", ingredient.trim()));
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .context("Failed to search recipe rows")?;

        let results = rows
            .into_iter()
            .map(|row| RecipeRow {
                id: row.get(0),
                name: row.get(1),
                ingredients: row.get(2),
                image_url: row.get(3),
            })
            .collect();

        Ok(results)
    }
}
