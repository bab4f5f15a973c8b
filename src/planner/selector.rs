use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::PlannerError;
use crate::recipe::Recipe;

pub const MIN_NIGHTS: u8 = 1;
pub const MAX_NIGHTS: u8 = 7;

#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub recipes: Vec<&'a Recipe>,
    /// How many recipes had to come from outside the filtered pool.
    pub filled_from_other: usize,
    /// Nights left unplanned because the whole pool ran out.
    pub shortfall: usize,
}

pub fn validate_nights(nights: u8) -> Result<(), PlannerError> {
    if (MIN_NIGHTS..=MAX_NIGHTS).contains(&nights) {
        Ok(())
    } else {
        Err(PlannerError::invalid(format!(
            "number of nights must be between {} and {}, got {}",
            MIN_NIGHTS, MAX_NIGHTS, nights
        )))
    }
}

/// Draws `nights` distinct recipes from `filtered`, topping up from the rest of `pool`
/// when the filtered pool is too small.
pub fn select_recipes<'a, R: Rng + ?Sized>(
    filtered: &[&'a Recipe],
    pool: &[&'a Recipe],
    nights: u8,
    rng: &mut R,
) -> Result<Selection<'a>, PlannerError> {
    validate_nights(nights)?;
    if pool.is_empty() {
        return Err(PlannerError::EmptyPool);
    }

    let wanted = nights as usize;
    if filtered.len() >= wanted {
        let mut recipes: Vec<&Recipe> = filtered.choose_multiple(rng, wanted).copied().collect();
        recipes.shuffle(rng);
        return Ok(Selection {
            recipes,
            filled_from_other: 0,
            shortfall: 0,
        });
    }

    let mut recipes: Vec<&Recipe> = filtered.to_vec();
    recipes.shuffle(rng);

    let remaining: Vec<&Recipe> = pool
        .iter()
        .copied()
        .filter(|candidate| !recipes.iter().any(|chosen| std::ptr::eq(*chosen, *candidate)))
        .collect();

    let missing = wanted - recipes.len();
    let mut extra: Vec<&Recipe> = remaining
        .choose_multiple(rng, missing.min(remaining.len()))
        .copied()
        .collect();
    extra.shuffle(rng);
    let filled_from_other = extra.len();
    recipes.extend(extra);

    Ok(Selection {
        shortfall: wanted - recipes.len(),
        recipes,
        filled_from_other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{CookingTime, Ingredient};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn recipe(id: u32, cooking_time: CookingTime) -> Recipe {
        Recipe {
            id,
            name: format!("Recipe {}", id),
            cooking_time,
            servings: 2,
            ingredients: vec![Ingredient::new("onion", 1.0, "item")],
            steps: vec!["Chop".to_string()],
            source_url: None,
            image_url: None,
        }
    }

    #[test]
    fn test_enough_recipes_selects_distinct() {
        let recipes: Vec<Recipe> = (1..=10).map(|id| recipe(id, CookingTime::Quick)).collect();
        let pool: Vec<&Recipe> = recipes.iter().collect();
        let mut rng = StdRng::seed_from_u64(7);

        for nights in MIN_NIGHTS..=MAX_NIGHTS {
            let selection = select_recipes(&pool, &pool, nights, &mut rng).unwrap();
            let ids: HashSet<u32> = selection.recipes.iter().map(|r| r.id).collect();
            assert_eq!(selection.recipes.len(), nights as usize);
            assert_eq!(ids.len(), nights as usize);
            assert_eq!(selection.filled_from_other, 0);
            assert_eq!(selection.shortfall, 0);
        }
    }

    #[test]
    fn test_fallback_fills_from_other_category() {
        let recipes = vec![
            recipe(1, CookingTime::Quick),
            recipe(2, CookingTime::Quick),
            recipe(3, CookingTime::Long),
            recipe(4, CookingTime::Long),
        ];
        let pool: Vec<&Recipe> = recipes.iter().collect();
        let filtered: Vec<&Recipe> = vec![&recipes[0], &recipes[1]];
        let mut rng = StdRng::seed_from_u64(42);

        let selection = select_recipes(&filtered, &pool, 3, &mut rng).unwrap();
        let ids: HashSet<u32> = selection.recipes.iter().map(|r| r.id).collect();
        assert_eq!(selection.recipes.len(), 3);
        assert!(ids.contains(&1) && ids.contains(&2));
        assert_eq!(selection.filled_from_other, 1);
        assert_eq!(selection.shortfall, 0);
    }

    #[test]
    fn test_small_pool_returns_everything_with_shortfall() {
        let recipes = vec![recipe(1, CookingTime::Quick), recipe(2, CookingTime::Long)];
        let pool: Vec<&Recipe> = recipes.iter().collect();
        let filtered: Vec<&Recipe> = vec![&recipes[0]];
        let mut rng = StdRng::seed_from_u64(1);

        let selection = select_recipes(&filtered, &pool, 5, &mut rng).unwrap();
        assert_eq!(selection.recipes.len(), 2);
        assert_eq!(selection.filled_from_other, 1);
        assert_eq!(selection.shortfall, 3);
    }

    #[test]
    fn test_nights_out_of_range() {
        let recipes = vec![recipe(1, CookingTime::Quick)];
        let pool: Vec<&Recipe> = recipes.iter().collect();
        let mut rng = StdRng::seed_from_u64(0);

        assert!(matches!(
            select_recipes(&pool, &pool, 0, &mut rng),
            Err(PlannerError::InvalidInput(_))
        ));
        assert!(matches!(
            select_recipes(&pool, &pool, 8, &mut rng),
            Err(PlannerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_pool() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            select_recipes(&[], &[], 3, &mut rng),
            Err(PlannerError::EmptyPool)
        ));
    }

    #[test]
    fn test_same_seed_same_selection() {
        let recipes: Vec<Recipe> = (1..=12).map(|id| recipe(id, CookingTime::Long)).collect();
        let pool: Vec<&Recipe> = recipes.iter().collect();

        let first: Vec<u32> = select_recipes(&pool, &pool, 5, &mut StdRng::seed_from_u64(99))
            .unwrap()
            .recipes
            .iter()
            .map(|r| r.id)
            .collect();
        let second: Vec<u32> = select_recipes(&pool, &pool, 5, &mut StdRng::seed_from_u64(99))
            .unwrap()
            .recipes
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(first, second);
    }
}
