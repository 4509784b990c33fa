use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pondforge_core::evaluator;
use pondforge_schemas::parameters::WaterParameters;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod clock;
mod config;
mod plotting;
mod workflow;

#[derive(Debug, Parser)]
#[command(
    name = "pondforge",
    version,
    about = "Water-quality measurement ledger for aquaculture ponds"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, default_value = "pondforge.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay a session script against a fresh ledger.
    Replay { session: PathBuf },
    /// Print the thresholds the ledger would start with.
    Thresholds,
    /// Classify one reading (raw fixed-point units) without recording it.
    Evaluate {
        #[arg(long, allow_hyphen_values = true)]
        temperature: i32,
        #[arg(long, allow_hyphen_values = true)]
        ph: i32,
        #[arg(long)]
        dissolved_oxygen: u32,
        #[arg(long)]
        ammonia: u32,
        #[arg(long)]
        nitrite: u32,
        #[arg(long)]
        nitrate: u32,
        #[arg(long, default_value_t = 0)]
        turbidity: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::AppConfig::load(&cli.config)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Command::Replay { session } => {
            println!("--- Pondforge Session Replay ---");
            workflow::run_replay(&config, &session)?;
        }
        Command::Thresholds => {
            let thresholds = config.initial_thresholds()?;
            let yaml = serde_yaml::to_string(&thresholds)
                .context("Failed to render thresholds as YAML")?;
            print!("{}", yaml);
        }
        Command::Evaluate {
            temperature,
            ph,
            dissolved_oxygen,
            ammonia,
            nitrite,
            nitrate,
            turbidity,
        } => {
            let params = WaterParameters {
                temperature,
                ph,
                dissolved_oxygen,
                ammonia,
                nitrite,
                nitrate,
                turbidity,
            };
            let thresholds = config.initial_thresholds()?;
            if evaluator::is_critical(&params, &thresholds) {
                println!("critical");
                for breach in evaluator::breaches(&params, &thresholds) {
                    println!("  - {}", breach.describe());
                }
            } else {
                println!("normal");
            }
        }
    }

    Ok(())
}
