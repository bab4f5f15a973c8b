use crate::error::PlannerError;
use crate::recipe::{round_amount, Recipe, ScaledRecipe};

/// Scales a recipe's ingredient amounts from its base servings to `household_size`.
///
/// Always works from the stored recipe, so repeated calls never compound.
pub fn scale_recipe(recipe: &Recipe, household_size: u32) -> Result<ScaledRecipe, PlannerError> {
    if household_size == 0 {
        return Err(PlannerError::invalid("household size must be at least 1"));
    }
    if recipe.servings == 0 {
        return Err(PlannerError::invalid(format!(
            "recipe '{}' has no base servings to scale from",
            recipe.name
        )));
    }

    let factor = household_size as f64 / recipe.servings as f64;
    let mut scaled = recipe.clone();
    for ingredient in &mut scaled.ingredients {
        ingredient.amount = round_amount(ingredient.amount * factor);
    }

    Ok(ScaledRecipe {
        recipe: scaled,
        scaled_servings: household_size,
    })
}
