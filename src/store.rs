use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::PlannerError;
use crate::planner::Plan;
use crate::recipe::Recipe;

/// Durable home of the permanent recipe collection.
///
/// `save` replaces the whole collection. There is no locking: two writers racing
/// on the same store end up with whichever wrote last.
pub trait RecipeStore {
    fn load(&self) -> Result<Vec<Recipe>, PlannerError>;
    fn save(&self, recipes: &[Recipe]) -> Result<(), PlannerError>;
}

/// Recipes kept as a pretty-printed JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonRecipeStore {
    path: PathBuf,
}

impl JsonRecipeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecipeStore for JsonRecipeStore {
    fn load(&self) -> Result<Vec<Recipe>, PlannerError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "recipe file not found, starting empty");
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let recipes: Vec<Recipe> = serde_json::from_str(&content)?;
        tracing::debug!(path = %self.path.display(), count = recipes.len(), "loaded recipes");
        Ok(recipes)
    }

    fn save(&self, recipes: &[Recipe]) -> Result<(), PlannerError> {
        let content = serde_json::to_string_pretty(recipes)?;
        std::fs::write(&self.path, content)?;
        tracing::debug!(path = %self.path.display(), count = recipes.len(), "saved recipes");
        Ok(())
    }
}

/// Store that only lives as long as the value, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryRecipeStore {
    recipes: Mutex<Vec<Recipe>>,
}

impl MemoryRecipeStore {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: Mutex::new(recipes),
        }
    }

    pub fn snapshot(&self) -> Vec<Recipe> {
        self.recipes.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl RecipeStore for MemoryRecipeStore {
    fn load(&self) -> Result<Vec<Recipe>, PlannerError> {
        Ok(self.snapshot())
    }

    fn save(&self, recipes: &[Recipe]) -> Result<(), PlannerError> {
        let mut stored = self
            .recipes
            .lock()
            .map_err(|_| PlannerError::Io(std::io::Error::other("recipe store lock poisoned")))?;
        *stored = recipes.to_vec();
        Ok(())
    }
}

/// Writes a plan as pretty JSON, replacing any previous plan at `path`.
pub fn save_plan(path: &Path, plan: &Plan) -> Result<(), PlannerError> {
    let content = serde_json::to_string_pretty(plan)?;
    std::fs::write(path, content)?;
    tracing::debug!(path = %path.display(), nights = plan.menu.len(), "saved plan");
    Ok(())
}

pub fn load_plan(path: &Path) -> Result<Plan, PlannerError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
