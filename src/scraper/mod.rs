pub mod schema_org;

pub use schema_org::{extract_recipe_from_html, SchemaOrgScraper};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::PlannerError;
use crate::planner::MenuPlanner;
use crate::recipe::Recipe;
use crate::recipe_parser::normalize_recipe;
use crate::session::RecipeSession;
use crate::store::RecipeStore;

/// Recipe fields as published by a web page, before any normalization.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct RawRecipe {
    pub title: String,
    /// Yield text such as "Serves 4".
    pub yields: Option<String>,
    pub total_time_minutes: Option<u32>,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub image_url: Option<String>,
    pub url: String,
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("No recipe data found at {0}. The page may not contain schema.org Recipe data or is from an unsupported site.")]
    NotFound(String),

    #[error("Failed to fetch recipe: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to fetch recipe from {url}: HTTP {status}")]
    Http {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Unusable recipe data: {0}")]
    Malformed(String),
}

/// Anything that can turn a URL into raw recipe fields.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RawRecipe, ScraperError>;
}

/// Fetches a recipe, normalizes it and parks it in the session. Fetch errors are
/// returned as they come from the source.
pub async fn import_recipe<S: RecipeStore>(
    source: &dyn RecipeSource,
    planner: &MenuPlanner<S>,
    session: &mut RecipeSession,
    url: &str,
) -> Result<Recipe, PlannerError> {
    let raw = source.fetch(url).await?;
    planner.add_temp_recipe(session, normalize_recipe(&raw, 0))
}
