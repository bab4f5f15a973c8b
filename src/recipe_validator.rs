use crate::error::PlannerError;
use crate::recipe::Recipe;

/// Checks that a recipe is complete enough to be planned with and stored.
///
/// The cooking-time domain is carried by the `CookingTime` type, so only the
/// value-level rules remain here.
pub fn validate(recipe: &Recipe) -> Result<(), PlannerError> {
    if recipe.name.trim().is_empty() {
        return Err(PlannerError::validation("Recipe name must not be empty"));
    }

    if recipe.servings == 0 {
        return Err(PlannerError::validation(format!(
            "Recipe '{}': servings must be a positive number",
            recipe.name
        )));
    }

    if recipe.ingredients.is_empty() {
        return Err(PlannerError::validation(format!(
            "Recipe '{}' must have at least one ingredient",
            recipe.name
        )));
    }

    for (i, ingredient) in recipe.ingredients.iter().enumerate() {
        if ingredient.name.trim().is_empty() {
            return Err(PlannerError::validation(format!(
                "Recipe '{}': ingredient {} has an empty name",
                recipe.name,
                i + 1
            )));
        }
        if !ingredient.amount.is_finite() || ingredient.amount < 0.0 {
            return Err(PlannerError::validation(format!(
                "Recipe '{}': ingredient '{}' has an invalid amount {}",
                recipe.name, ingredient.name, ingredient.amount
            )));
        }
    }

    if recipe.steps.is_empty() {
        return Err(PlannerError::validation(format!(
            "Recipe '{}' must have at least one cooking step",
            recipe.name
        )));
    }

    if let Some(i) = recipe.steps.iter().position(|step| step.trim().is_empty()) {
        return Err(PlannerError::validation(format!(
            "Recipe '{}': cooking step {} must be a non-empty string",
            recipe.name,
            i + 1
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{CookingTime, Ingredient};

    fn valid_recipe() -> Recipe {
        Recipe {
            id: 1,
            name: "Omelette".to_string(),
            cooking_time: CookingTime::Quick,
            servings: 1,
            ingredients: vec![Ingredient::new("egg", 2.0, "item")],
            steps: vec!["Whisk".to_string(), "Fry".to_string()],
            source_url: None,
            image_url: None,
        }
    }

    fn assert_rejected(recipe: &Recipe, fragment: &str) {
        match validate(recipe) {
            Err(PlannerError::RecipeValidation(msg)) => {
                assert!(msg.contains(fragment), "unexpected message: {}", msg)
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_recipe_passes() {
        assert!(validate(&valid_recipe()).is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut recipe = valid_recipe();
        recipe.name = "   ".to_string();
        assert_rejected(&recipe, "name must not be empty");
    }

    #[test]
    fn test_zero_servings_rejected() {
        let mut recipe = valid_recipe();
        recipe.servings = 0;
        assert_rejected(&recipe, "servings");
    }

    #[test]
    fn test_ingredient_rules() {
        let mut recipe = valid_recipe();
        recipe.ingredients.clear();
        assert_rejected(&recipe, "at least one ingredient");

        let mut recipe = valid_recipe();
        recipe.ingredients[0].amount = -1.0;
        assert_rejected(&recipe, "invalid amount");

        let mut recipe = valid_recipe();
        recipe.ingredients[0].amount = f64::NAN;
        assert_rejected(&recipe, "invalid amount");

        let mut recipe = valid_recipe();
        recipe.ingredients[0].name = String::new();
        assert_rejected(&recipe, "ingredient 1 has an empty name");
    }

    #[test]
    fn test_zero_amount_is_allowed() {
        let mut recipe = valid_recipe();
        recipe.ingredients[0].amount = 0.0;
        assert!(validate(&recipe).is_ok());
    }

    #[test]
    fn test_step_rules() {
        let mut recipe = valid_recipe();
        recipe.steps.clear();
        assert_rejected(&recipe, "at least one cooking step");

        let mut recipe = valid_recipe();
        recipe.steps[1] = " \n".to_string();
        assert_rejected(&recipe, "cooking step 2");
    }
}
