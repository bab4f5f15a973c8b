use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PlannerError;

/// Recipes taking this many minutes or fewer count as quick.
pub const QUICK_THRESHOLD_MINUTES: u32 = 30;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CookingTime {
    Quick,
    Long,
}

impl CookingTime {
    pub fn from_minutes(minutes: u32) -> Self {
        if minutes <= QUICK_THRESHOLD_MINUTES {
            CookingTime::Quick
        } else {
            CookingTime::Long
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CookingTime::Quick => "quick",
            CookingTime::Long => "long",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            CookingTime::Quick => CookingTime::Long,
            CookingTime::Long => CookingTime::Quick,
        }
    }
}

impl fmt::Display for CookingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CookingTime {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quick" => Ok(CookingTime::Quick),
            "long" => Ok(CookingTime::Long),
            other => Err(PlannerError::invalid(format!(
                "cooking time must be 'quick' or 'long', got '{}'",
                other
            ))),
        }
    }
}

/// What the household asked for when planning. `Mixed` accepts either category.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CookingPreference {
    Quick,
    Long,
    Mixed,
}

impl CookingPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            CookingPreference::Quick => "quick",
            CookingPreference::Long => "long",
            CookingPreference::Mixed => "mixed",
        }
    }

    /// The single category this preference asks for, or `None` for mixed.
    pub fn cooking_time(&self) -> Option<CookingTime> {
        match self {
            CookingPreference::Quick => Some(CookingTime::Quick),
            CookingPreference::Long => Some(CookingTime::Long),
            CookingPreference::Mixed => None,
        }
    }
}

impl fmt::Display for CookingPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CookingPreference {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quick" => Ok(CookingPreference::Quick),
            "long" => Ok(CookingPreference::Long),
            "mixed" => Ok(CookingPreference::Mixed),
            other => Err(PlannerError::invalid(format!(
                "cooking time preference must be 'quick', 'long' or 'mixed', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, amount: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount,
            unit: unit.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Recipe {
    pub id: u32,
    pub name: String,
    pub cooking_time: CookingTime,
    /// Base yield the ingredient amounts are written for.
    pub servings: u32,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Recipe {
    /// Builds a recipe and runs it through the validator before handing it out.
    pub fn new(
        id: u32,
        name: impl Into<String>,
        cooking_time: CookingTime,
        servings: u32,
        ingredients: Vec<Ingredient>,
        steps: Vec<String>,
    ) -> Result<Self, PlannerError> {
        let recipe = Self {
            id,
            name: name.into(),
            cooking_time,
            servings,
            ingredients,
            steps,
            source_url: None,
            image_url: None,
        };
        crate::recipe_validator::validate(&recipe)?;
        Ok(recipe)
    }

    pub fn has_name(&self, other: &str) -> bool {
        self.name.to_lowercase() == other.to_lowercase()
    }
}

/// A menu entry: the recipe with its ingredients adjusted to `scaled_servings`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ScaledRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub scaled_servings: u32,
}

/// Rounds a quantity to one decimal place.
pub fn round_amount(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
