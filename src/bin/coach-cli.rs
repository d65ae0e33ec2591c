// ABOUTME: Command-line interface for the adaptive health coaching agent
// ABOUTME: Runs evaluation cycles and renders the stored plan and progress history
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Coach CLI.
//!
//! Usage:
//! ```bash
//! # Run one evaluation cycle (replans via the LLM when needed)
//! DATABASE_URL=sqlite:coach.sqlite COACH_LLM_API_KEY=... coach-cli run
//!
//! # Show the active plan
//! DATABASE_URL=sqlite:coach.sqlite coach-cli show-plan
//!
//! # Print the synthetic 12-week progress series
//! DATABASE_URL=sqlite:coach.sqlite coach-cli history --weeks 12
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use coach_agent::agent::AdaptiveController;
use coach_agent::config::ServerConfig;
use coach_agent::database_plugins::factory::Database;
use coach_agent::database_plugins::PlanStore;
use coach_agent::formatters::{format_history, format_plan};
use coach_agent::llm::OpenAiCompatibleProvider;
use coach_agent::logging::LoggingConfig;
use coach_agent::providers::{generate_weight_history, SyntheticLogProvider};

#[derive(Parser)]
#[command(
    name = "coach-cli",
    about = "Adaptive health coaching agent",
    long_about = "Evaluates daily health logs against the stored plan and replans via an LLM when needed"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one evaluation cycle for the configured user
    Run,
    /// Print the user's active plan
    ShowPlan,
    /// Print the synthetic weekly weight history
    History {
        /// Number of weeks to generate
        #[arg(long, default_value = "12")]
        weeks: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    LoggingConfig::from_env().init()?;
    let config = ServerConfig::from_env()?;

    let database = Database::new(&config.database_url).await?;
    database.migrate().await?;
    info!("Storage ready: {}", database.backend_info());

    match cli.command {
        Commands::Run => run_cycle(&database, &config).await,
        Commands::ShowPlan => show_plan(&database, &config).await,
        Commands::History { weeks } => {
            let history = generate_weight_history(
                &config.profile.user_id,
                config.profile.initial_weight_kg,
                weeks,
            );
            println!("{}", format_history(&history));
            Ok(())
        }
    }
}

async fn run_cycle(database: &Database, config: &ServerConfig) -> Result<()> {
    let planner = OpenAiCompatibleProvider::from_env()?;
    let log_provider = SyntheticLogProvider::new(config.profile.initial_weight_kg);

    let controller =
        AdaptiveController::new(database, &log_provider, &planner, config.profile.clone());
    let outcome = controller.run().await;

    println!("{}", outcome.progress_report);
    if outcome.new_plan.is_some() {
        println!("\nA new plan was generated and saved.");
        if let Some(stored) = database.load_active_plan(&config.profile.user_id).await? {
            println!("\n{}", format_plan(&stored));
        }
    } else {
        println!("\nNo new plan was generated.");
    }
    Ok(())
}

async fn show_plan(database: &Database, config: &ServerConfig) -> Result<()> {
    match database.load_active_plan(&config.profile.user_id).await? {
        Some(stored) => println!("{}", format_plan(&stored)),
        None => println!("No active plan found. Run `coach-cli run` to generate one."),
    }
    Ok(())
}
