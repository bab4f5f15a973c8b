use thiserror::Error;

use crate::scraper::ScraperError;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid recipe: {0}")]
    RecipeValidation(String),

    #[error("Recipe '{0}' already exists")]
    DuplicateRecipe(String),

    #[error("No recipes available to plan from")]
    EmptyPool,

    #[error(transparent)]
    Scraper(#[from] ScraperError),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl PlannerError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        PlannerError::InvalidInput(message.into())
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        PlannerError::RecipeValidation(message.into())
    }
}

pub type Result<T, E = PlannerError> = std::result::Result<T, E>;
