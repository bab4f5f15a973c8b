use crate::recipe::{CookingPreference, Recipe};

/// Keeps the recipes whose cooking time matches the preference. Mixed keeps everything.
pub fn filter_recipes<'a>(pool: &[&'a Recipe], preference: CookingPreference) -> Vec<&'a Recipe> {
    match preference.cooking_time() {
        None => pool.to_vec(),
        Some(wanted) => pool
            .iter()
            .copied()
            .filter(|recipe| recipe.cooking_time == wanted)
            .collect(),
    }
}
