pub mod api_connection;
pub mod assistant;
pub mod cli;
pub mod config;
pub mod error;
pub mod planner;
pub mod recipe;
pub mod recipe_aggregator;
pub mod recipe_parser;
pub mod recipe_validator;
pub mod scraper;
pub mod session;
pub mod store;

pub use error::PlannerError;
pub use planner::{GeneratedPlan, MenuPlanner, Plan, PlanRequest};
pub use recipe::{CookingPreference, CookingTime, Ingredient, Recipe, ScaledRecipe};
pub use session::RecipeSession;
