use crate::error::PlannerError;
use crate::recipe::Recipe;
use crate::recipe_validator;

/// Imported recipes waiting for a save or discard decision.
///
/// A session is owned by whoever drives the planner and passed in explicitly, so two
/// callers never see each other's imports.
#[derive(Debug, Default, Clone)]
pub struct RecipeSession {
    temp_recipes: Vec<Recipe>,
}

impl RecipeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids must be unique within the session. Use `MenuPlanner::add_temp_recipe` to
    /// get an id that is also clear of the permanent collection.
    pub fn add_temp_recipe(&mut self, recipe: Recipe) -> Result<(), PlannerError> {
        recipe_validator::validate(&recipe)?;
        if self.temp_recipes.iter().any(|r| r.id == recipe.id) {
            let message = format!("recipe id {} is already pending", recipe.id);
            return Err(PlannerError::invalid(message));
        }
        self.temp_recipes.push(recipe);
        Ok(())
    }

    pub fn list_temp_recipes(&self) -> &[Recipe] {
        &self.temp_recipes
    }

    pub fn clear_temp_recipes(&mut self) {
        self.temp_recipes.clear();
    }

    pub fn len(&self) -> usize {
        self.temp_recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temp_recipes.is_empty()
    }

    pub(crate) fn max_id(&self) -> Option<u32> {
        self.temp_recipes.iter().map(|r| r.id).max()
    }
}
