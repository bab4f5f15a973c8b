use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::planner::{MAX_NIGHTS, MIN_NIGHTS};
use crate::recipe::{CookingPreference, CookingTime};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Plan a week of dinners and the shopping list to go with it",
    long_about = None
)]
pub struct Cli {
    /// Recipe collection file (overrides MENU_PLANNER_RECIPES)
    #[arg(long, global = true)]
    pub recipes: Option<PathBuf>,

    /// Where the last generated plan is kept (overrides MENU_PLANNER_PLAN)
    #[arg(long, global = true)]
    pub plan_file: Option<PathBuf>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a meal plan and shopping list
    Plan(PlanArgs),
    /// List the saved recipe collection
    Recipes,
    /// Add a recipe by hand
    Add(AddArgs),
    /// Show the last saved plan
    LastPlan,
    /// Ask the assistant for recipe ideas
    Chat,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Number of people to cook for
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub household_size: u32,

    /// Nights to plan
    #[arg(
        long,
        value_parser = clap::value_parser!(u8).range(MIN_NIGHTS as i64..=MAX_NIGHTS as i64)
    )]
    pub nights: u8,

    #[arg(long, value_enum, default_value_t = CookingPreference::Mixed)]
    pub preference: CookingPreference,

    /// Use exactly these recipes instead of a random pick
    #[arg(long = "recipe-id")]
    pub recipe_ids: Vec<u32>,

    /// Import a recipe page for this plan (repeatable)
    #[arg(long = "import")]
    pub import_urls: Vec<String>,

    /// Keep imported recipes in the collection afterwards
    #[arg(long)]
    pub save_imports: bool,

    /// Seed for a repeatable selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Also write the shopping list as CSV
    #[arg(long)]
    pub shopping_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value_t = 4)]
    pub servings: u32,

    /// quick or long
    #[arg(long, value_parser = parse_cooking_time)]
    pub cooking_time: CookingTime,

    /// Ingredient line such as "2 cups flour" (repeatable)
    #[arg(long = "ingredient", required = true)]
    pub ingredients: Vec<String>,

    /// Cooking step, in order (repeatable)
    #[arg(long = "step", required = true)]
    pub steps: Vec<String>,
}

fn parse_cooking_time(s: &str) -> Result<CookingTime, String> {
    s.parse::<CookingTime>().map_err(|e| e.to_string())
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plan_command() {
        let cli = Cli::try_parse_from([
            "menu_planner", "--recipes", "my.json", "plan",
            "--household-size", "3", "--nights", "5", "--preference", "quick",
            "--recipe-id", "2", "--recipe-id", "9",
            "--import", "https://www.bbcgoodfood.com/recipes/chicken-curry",
            "--seed", "7",
        ])
        .unwrap();
        assert_eq!(cli.recipes, Some(PathBuf::from("my.json")));
        match cli.command {
            Command::Plan(args) => {
                assert_eq!(args.household_size, 3);
                assert_eq!(args.nights, 5);
                assert_eq!(args.preference, CookingPreference::Quick);
                assert_eq!(args.recipe_ids, vec![2, 9]);
                assert_eq!(args.import_urls.len(), 1);
                assert_eq!(args.seed, Some(7));
                assert!(!args.save_imports);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_plan_rejects_out_of_range_values() {
        assert!(Cli::try_parse_from(["menu_planner", "plan", "--household-size", "0", "--nights", "3"]).is_err());
        assert!(Cli::try_parse_from(["menu_planner", "plan", "--household-size", "2", "--nights", "8"]).is_err());
        assert!(Cli::try_parse_from([
            "menu_planner", "plan", "--household-size", "2", "--nights", "3", "--preference", "slow",
        ])
        .is_err());
    }

    #[test]
    fn test_parse_add_command() {
        let cli = Cli::try_parse_from([
            "menu_planner", "add", "--name", "Beans on toast", "--cooking-time", "quick",
            "--ingredient", "1 tin baked beans", "--ingredient", "2 slices bread",
            "--step", "Heat the beans", "--step", "Toast the bread",
        ])
        .unwrap();
        match cli.command {
            Command::Add(args) => {
                assert_eq!(args.servings, 4);
                assert_eq!(args.cooking_time, CookingTime::Quick);
                assert_eq!(args.ingredients.len(), 2);
                assert_eq!(args.steps.len(), 2);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
