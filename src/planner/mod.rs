pub mod filter;
pub mod scaler;
pub mod selector;

pub use filter::filter_recipes;
pub use scaler::scale_recipe;
pub use selector::{select_recipes, Selection, MAX_NIGHTS, MIN_NIGHTS};

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::PlannerError;
use crate::recipe::{CookingPreference, Recipe, ScaledRecipe};
use crate::recipe_aggregator::{aggregate_shopping_list, ShoppingList};
use crate::recipe_validator;
use crate::session::RecipeSession;
use crate::store::RecipeStore;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Preferences {
    pub household_size: u32,
    pub nights: u8,
    pub cooking_time_preference: CookingPreference,
}

/// The persisted record of one planning run.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Plan {
    pub preferences: Preferences,
    pub menu: Vec<ScaledRecipe>,
    pub shopping_list: ShoppingList,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPlan {
    pub plan: Plan,
    /// Human-readable notes for the caller; never persisted with the plan.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub household_size: u32,
    pub nights: u8,
    pub preference: CookingPreference,
    /// Recipes picked by hand. When non-empty, random selection is skipped.
    pub recipe_ids: Option<Vec<u32>>,
}

impl PlanRequest {
    pub fn new(household_size: u32, nights: u8, preference: CookingPreference) -> Self {
        Self {
            household_size,
            nights,
            preference,
            recipe_ids: None,
        }
    }

    pub fn with_recipe_ids(mut self, ids: Vec<u32>) -> Self {
        self.recipe_ids = Some(ids);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecipe {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Default, Clone)]
pub struct SaveReport {
    pub saved: Vec<Recipe>,
    pub skipped: Vec<SkippedRecipe>,
}

impl SaveReport {
    pub fn saved_count(&self) -> usize {
        self.saved.len()
    }
}

pub struct MenuPlanner<S: RecipeStore> {
    store: S,
    recipes: Vec<Recipe>,
}

impl<S: RecipeStore> MenuPlanner<S> {
    pub fn new(store: S) -> Result<Self, PlannerError> {
        let recipes = store.load()?;
        Ok(Self { store, recipes })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn list_recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// One past the highest id among permanent and pending recipes, or 1 when both are empty.
    pub fn next_recipe_id(&self, session: &RecipeSession) -> u32 {
        let permanent = self.recipes.iter().map(|r| r.id).max();
        permanent.max(session.max_id()).map_or(1, |id| id + 1)
    }

    pub fn generate_plan<R: Rng + ?Sized>(
        &self,
        session: &RecipeSession,
        request: &PlanRequest,
        rng: &mut R,
    ) -> Result<GeneratedPlan, PlannerError> {
        if request.household_size == 0 {
            return Err(PlannerError::invalid("household size must be at least 1"));
        }
        selector::validate_nights(request.nights)?;

        let pool: Vec<&Recipe> = self
            .recipes
            .iter()
            .chain(session.list_temp_recipes())
            .collect();
        let mut seen_ids = HashSet::with_capacity(pool.len());
        if let Some(dup) = pool.iter().find(|r| !seen_ids.insert(r.id)) {
            return Err(PlannerError::invalid(format!(
                "recipe id {} is used by more than one recipe",
                dup.id
            )));
        }
        let mut warnings = Vec::new();

        let chosen: Vec<&Recipe> = match request.recipe_ids.as_deref() {
            Some(ids) if !ids.is_empty() => ids
                .iter()
                .map(|id| {
                    pool.iter()
                        .copied()
                        .find(|r| r.id == *id)
                        .ok_or_else(|| PlannerError::invalid(format!("unknown recipe id {}", id)))
                })
                .collect::<Result<_, _>>()?,
            _ => {
                let filtered = filter_recipes(&pool, request.preference);
                let selection = select_recipes(&filtered, &pool, request.nights, rng)?;

                if selection.filled_from_other > 0 {
                    if let Some(wanted) = request.preference.cooking_time() {
                        warnings.push(format!(
                            "Only {} {} recipes available, added {} {} recipes to fill your plan",
                            filtered.len(),
                            wanted,
                            selection.filled_from_other,
                            wanted.other()
                        ));
                    }
                }
                if selection.shortfall > 0 {
                    warnings.push(format!(
                        "Only {} recipes available, planned {} of {} requested nights",
                        selection.recipes.len(),
                        selection.recipes.len(),
                        request.nights
                    ));
                }
                selection.recipes
            }
        };

        let menu = chosen
            .into_iter()
            .map(|recipe| scale_recipe(recipe, request.household_size))
            .collect::<Result<Vec<_>, _>>()?;
        let shopping_list = aggregate_shopping_list(&menu);

        Ok(GeneratedPlan {
            plan: Plan {
                preferences: Preferences {
                    household_size: request.household_size,
                    nights: request.nights,
                    cooking_time_preference: request.preference,
                },
                menu,
                shopping_list,
            },
            warnings,
        })
    }

    /// Parks a recipe in the session under the next free id and returns it as stored.
    pub fn add_temp_recipe(
        &self,
        session: &mut RecipeSession,
        mut recipe: Recipe,
    ) -> Result<Recipe, PlannerError> {
        recipe.id = self.next_recipe_id(session);
        session.add_temp_recipe(recipe.clone())?;
        Ok(recipe)
    }

    /// Moves pending recipes into the permanent collection and persists it.
    ///
    /// Invalid recipes and name duplicates (ignoring case) are skipped and reported.
    /// If persisting fails nothing changes: the collection is restored and the
    /// session keeps its recipes.
    pub fn save_temp_recipes(
        &mut self,
        session: &mut RecipeSession,
    ) -> Result<SaveReport, PlannerError> {
        let mut report = SaveReport::default();
        if session.is_empty() {
            return Ok(report);
        }

        let before = self.recipes.len();
        for pending in session.list_temp_recipes() {
            if let Err(e) = recipe_validator::validate(pending) {
                report.skipped.push(SkippedRecipe {
                    name: pending.name.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
            if self.recipes.iter().any(|r| r.has_name(&pending.name)) {
                report.skipped.push(SkippedRecipe {
                    name: pending.name.clone(),
                    reason: PlannerError::DuplicateRecipe(pending.name.clone()).to_string(),
                });
                continue;
            }

            let mut recipe = pending.clone();
            recipe.id = self.max_permanent_id().map_or(1, |id| id + 1);
            self.recipes.push(recipe.clone());
            report.saved.push(recipe);
        }

        if !report.saved.is_empty() {
            if let Err(e) = self.store.save(&self.recipes) {
                self.recipes.truncate(before);
                return Err(e);
            }
        }

        session.clear_temp_recipes();
        Ok(report)
    }

    /// Adds a single hand-entered recipe to the permanent collection and returns its id.
    pub fn add_recipe(&mut self, mut recipe: Recipe) -> Result<u32, PlannerError> {
        recipe_validator::validate(&recipe)?;
        if self.recipes.iter().any(|r| r.has_name(&recipe.name)) {
            return Err(PlannerError::DuplicateRecipe(recipe.name));
        }

        recipe.id = self.max_permanent_id().map_or(1, |id| id + 1);
        let id = recipe.id;
        self.recipes.push(recipe);
        if let Err(e) = self.store.save(&self.recipes) {
            self.recipes.pop();
            return Err(e);
        }
        Ok(id)
    }

    fn max_permanent_id(&self) -> Option<u32> {
        self.recipes.iter().map(|r| r.id).max()
    }
}
