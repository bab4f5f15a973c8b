use anyhow::{Context, Result};
use menu_planner::api_connection::{ApiConnectionError, ChatMessage};
use menu_planner::assistant::ChatAssistant;
use menu_planner::cli::{parse_args, AddArgs, Command, PlanArgs};
use menu_planner::config::PlannerConfig;
use menu_planner::planner::{MenuPlanner, Plan, PlanRequest};
use menu_planner::recipe::Recipe;
use menu_planner::recipe_aggregator::write_shopping_list_csv;
use menu_planner::recipe_parser::parse_ingredients;
use menu_planner::scraper::schema_org::SchemaOrgScraper;
use menu_planner::scraper::import_recipe;
use menu_planner::session::RecipeSession;
use menu_planner::store::{load_plan, save_plan, JsonRecipeStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "menu_planner=debug" } else { "menu_planner=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_planner(config: &PlannerConfig) -> Result<MenuPlanner<JsonRecipeStore>> {
    MenuPlanner::new(JsonRecipeStore::new(&config.recipes_path))
        .with_context(|| format!("Failed to load recipes from '{}'", config.recipes_path.display()))
}

fn print_plan(plan: &Plan) {
    println!(
        "\nMenu for {} people ({} nights, {} preference):",
        plan.preferences.household_size,
        plan.menu.len(),
        plan.preferences.cooking_time_preference
    );
    for (night, scaled) in plan.menu.iter().enumerate() {
        println!(
            "  Night {}: {} [{}] (serves {})",
            night + 1,
            scaled.recipe.name,
            scaled.recipe.cooking_time,
            scaled.scaled_servings
        );
    }

    println!("\nShopping list:");
    for (name, item) in &plan.shopping_list {
        println!("  - {}: {} {}", name, item.amount, item.unit);
    }
}

async fn run_plan(config: &PlannerConfig, args: PlanArgs) -> Result<()> {
    let mut planner = open_planner(config)?;
    let mut session = RecipeSession::new();

    if !args.import_urls.is_empty() {
        let scraper = SchemaOrgScraper::new();
        for url in &args.import_urls {
            println!("Importing {}...", url);
            match import_recipe(&scraper, &planner, &mut session, url).await {
                Ok(recipe) => println!(
                    "   -> Added '{}' ({} ingredients, {})",
                    recipe.name,
                    recipe.ingredients.len(),
                    recipe.cooking_time
                ),
                Err(e) => println!("   -> Could not import {}: {}", url, e),
            }
        }
    }

    let mut request = PlanRequest::new(args.household_size, args.nights, args.preference);
    if !args.recipe_ids.is_empty() {
        request = request.with_recipe_ids(args.recipe_ids.clone());
    }
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let generated = planner
        .generate_plan(&session, &request, &mut rng)
        .context("Failed to generate a meal plan")?;

    for warning in &generated.warnings {
        println!("Warning: {}", warning);
    }
    print_plan(&generated.plan);

    save_plan(&config.plan_path, &generated.plan)
        .with_context(|| format!("Failed to save plan to '{}'", config.plan_path.display()))?;
    println!("\nPlan saved to {}", config.plan_path.display());

    if let Some(csv_path) = &args.shopping_csv {
        let file = std::fs::File::create(csv_path)
            .with_context(|| format!("Failed to create '{}'", csv_path.display()))?;
        write_shopping_list_csv(&generated.plan.shopping_list, file)
            .with_context(|| format!("Failed to write shopping list to '{}'", csv_path.display()))?;
        println!("Shopping list written to {}", csv_path.display());
    }

    if session.is_empty() {
        return Ok(());
    }
    if args.save_imports {
        let report = planner
            .save_temp_recipes(&mut session)
            .context("Failed to save imported recipes")?;
        println!("Saved {} imported recipe(s).", report.saved_count());
        for skipped in &report.skipped {
            println!("   -> Skipped '{}': {}", skipped.name, skipped.reason);
        }
    } else {
        println!(
            "Discarding {} imported recipe(s); pass --save-imports to keep them.",
            session.len()
        );
        session.clear_temp_recipes();
    }
    Ok(())
}

fn run_recipes(config: &PlannerConfig) -> Result<()> {
    let planner = open_planner(config)?;
    let recipes = planner.list_recipes();
    if recipes.is_empty() {
        println!("No recipes in {} yet.", config.recipes_path.display());
        return Ok(());
    }
    for recipe in recipes {
        println!(
            "{:>4}  {} [{}] serves {}, {} ingredients",
            recipe.id,
            recipe.name,
            recipe.cooking_time,
            recipe.servings,
            recipe.ingredients.len()
        );
    }
    Ok(())
}

fn run_add(config: &PlannerConfig, args: AddArgs) -> Result<()> {
    let mut planner = open_planner(config)?;
    let recipe = Recipe::new(
        0,
        args.name.trim(),
        args.cooking_time,
        args.servings,
        parse_ingredients(&args.ingredients),
        args.steps,
    )
    .context("Recipe is not valid")?;

    let name = recipe.name.clone();
    let id = planner.add_recipe(recipe).context("Failed to add recipe")?;
    println!("Added '{}' with id {}", name, id);
    Ok(())
}

fn run_last_plan(config: &PlannerConfig) -> Result<()> {
    let plan = load_plan(&config.plan_path)
        .with_context(|| format!("Failed to read plan from '{}'", config.plan_path.display()))?;
    print_plan(&plan);
    Ok(())
}

async fn run_chat(config: &PlannerConfig) -> Result<()> {
    let assistant = match ChatAssistant::from_config(config) {
        Ok(assistant) => assistant,
        Err(ApiConnectionError::MissingApiKey(var)) => {
            println!("assistant unavailable: set {} to enable recipe suggestions", var);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Ask for dinner ideas. An empty line or 'quit' exits.");
    let mut history: Vec<ChatMessage> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else { break };
        let message = line.trim();
        if message.is_empty() || message.eq_ignore_ascii_case("quit") {
            break;
        }

        match assistant.respond(message, &history).await {
            Ok(answer) => {
                println!("\n{}\n", answer.reply);
                if !answer.recipe_urls.is_empty() {
                    println!("Suggested recipes (import with `plan --import URL`):");
                    for url in &answer.recipe_urls {
                        println!("  {}", url);
                    }
                    println!();
                }
                history.push(ChatMessage::user(message));
                history.push(ChatMessage::assistant(answer.reply));
            }
            Err(e) => eprintln!("\nAssistant error: {}", e),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = parse_args();
    init_logging(cli.verbose);
    let config = PlannerConfig::with_overrides(cli.recipes, cli.plan_file);
    tracing::debug!(?config, "resolved configuration");

    match cli.command {
        Command::Plan(args) => run_plan(&config, args).await,
        Command::Recipes => run_recipes(&config),
        Command::Add(args) => run_add(&config, args),
        Command::LastPlan => run_last_plan(&config),
        Command::Chat => run_chat(&config).await,
    }
}
