//! Runtime settings for the planner.
//!
//! Resolution chain: CLI flag > environment variable > default. `.env` files are
//! loaded by the binary before this runs, so their values count as environment.

use std::path::PathBuf;

pub const RECIPES_PATH_ENV_VAR: &str = "MENU_PLANNER_RECIPES";
pub const PLAN_PATH_ENV_VAR: &str = "MENU_PLANNER_PLAN";
pub const MODEL_ENV_VAR: &str = "MENU_PLANNER_MODEL";

pub const DEFAULT_RECIPES_PATH: &str = "recipes.json";
pub const DEFAULT_PLAN_PATH: &str = "last_plan.json";
pub const DEFAULT_API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";
pub const DEFAULT_ASSISTANT_MODEL: &str = "google/gemini-2.5-flash";

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub recipes_path: PathBuf,
    pub plan_path: PathBuf,
    /// Name of the environment variable holding the chat API key.
    pub api_key_env_var: String,
    pub assistant_model: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            recipes_path: PathBuf::from(DEFAULT_RECIPES_PATH),
            plan_path: PathBuf::from(DEFAULT_PLAN_PATH),
            api_key_env_var: DEFAULT_API_KEY_ENV_VAR.to_string(),
            assistant_model: DEFAULT_ASSISTANT_MODEL.to_string(),
        }
    }
}

impl PlannerConfig {
    /// Applies CLI overrides on top of the environment.
    pub fn with_overrides(recipes_path: Option<PathBuf>, plan_path: Option<PathBuf>) -> Self {
        Self::resolve(recipes_path, plan_path, |name| std::env::var(name).ok())
    }

    fn resolve(
        recipes_path: Option<PathBuf>,
        plan_path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let defaults = Self::default();
        let from_env = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            recipes_path: recipes_path
                .or_else(|| from_env(RECIPES_PATH_ENV_VAR).map(PathBuf::from))
                .unwrap_or(defaults.recipes_path),
            plan_path: plan_path
                .or_else(|| from_env(PLAN_PATH_ENV_VAR).map(PathBuf::from))
                .unwrap_or(defaults.plan_path),
            api_key_env_var: defaults.api_key_env_var,
            assistant_model: from_env(MODEL_ENV_VAR).unwrap_or(defaults.assistant_model),
        }
    }
}
