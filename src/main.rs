use chrono::Weekday;
use clap::{Parser, Subcommand};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use meal_planner::model::MealCandidate;
use meal_planner::{Planner, PlannerConfig, SelectedMeals, SourceKind, UserProfile};

#[derive(Parser)]
#[command(name = "meal-planner", version, about = "Weekly meal plans and shopping lists")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the recipe proxy
    Serve {
        #[arg(long, env = "HOST")]
        host: Option<String>,
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },
    /// List meal candidates for a profile
    Candidates {
        /// Profile JSON file
        #[arg(long)]
        profile: PathBuf,
        /// content-api, proxy or generative
        #[arg(long, default_value = "content-api")]
        source: SourceKind,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Generate a 7-day meal plan
    Plan {
        #[arg(long)]
        profile: PathBuf,
        /// JSON array of selected candidates
        #[arg(long)]
        meals: Option<PathBuf>,
        /// First day of the week, e.g. monday
        #[arg(long)]
        start_day: Option<Weekday>,
    },
    /// Generate a shopping list for the selected meals
    ShoppingList {
        #[arg(long)]
        profile: PathBuf,
        #[arg(long)]
        meals: Option<PathBuf>,
    },
    /// Describe how to cook one meal
    Details { name: String },
}

fn read_profile(path: &Path) -> Result<UserProfile, Box<dyn std::error::Error>> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn read_meals(path: Option<&Path>) -> Result<SelectedMeals, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(SelectedMeals::new());
    };
    let raw = fs::read_to_string(path)?;
    let meals: Vec<MealCandidate> = serde_json::from_str(&raw)?;
    Ok(meals.into_iter().collect())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let mut config = PlannerConfig::load()?;

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            meal_planner::server::serve(&config).await?;
        }
        Command::Candidates {
            profile,
            source,
            limit,
        } => {
            let profile = read_profile(&profile)?;
            let limit = limit.unwrap_or(config.candidate_limit);
            let planner = Planner::builder().config(config).source(source).build()?;
            info!("Using {} for candidates", planner.source_name());
            let candidates = planner.candidates_with_limit(&profile, limit).await?;
            println!("{}", serde_json::to_string_pretty(&candidates)?);
        }
        Command::Plan {
            profile,
            meals,
            start_day,
        } => {
            let profile = read_profile(&profile)?;
            let selected = read_meals(meals.as_deref())?;
            let planner = Planner::builder().config(config).build()?;
            let plan = planner.plan(&profile, &selected, start_day).await?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Command::ShoppingList { profile, meals } => {
            let profile = read_profile(&profile)?;
            let selected = read_meals(meals.as_deref())?;
            let planner = Planner::builder().config(config).build()?;
            let list = planner.shopping_list(&profile, &selected).await?;
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
        Command::Details { name } => {
            let planner = Planner::builder().config(config).build()?;
            println!("{}", planner.meal_details(&name).await?);
        }
    }

    Ok(())
}
