//! Evo Drive - headless CLI.
//!
//! Evolves networks on the built-in oval track and logs one line per
//! generation.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use evo_drive::simulation::driver::EvaluationDriver;
use evo_drive::simulation::stats::BestFitness;
use evo_drive::simulation::track::Track;
use evo_drive::{Config, EvolutionEngine};

#[derive(Parser)]
#[command(name = "evo-drive")]
#[command(version)]
#[command(about = "Evolve neural networks that steer a car around a track")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (JSON); defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Number of generations to evolve
    #[arg(short, long, default_value = "10")]
    generations: u32,

    /// Log level, overriding the configuration file
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "evo-drive.json")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Commands::Init { output }) = cli.command {
        Config::default().save(&output)?;
        println!("Wrote default configuration to {}", output.display());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.log_level.clone());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    log::info!(
        "evolving {} generations of {} networks",
        cli.generations,
        config.evolution.population_size
    );

    let engine = EvolutionEngine::new(config.evolution.clone())?;
    let best = BestFitness::new();
    let mut driver = EvaluationDriver::new(engine, Track::default(), config.driver, best.clone())?;

    for _ in 0..cli.generations {
        driver.run_generation()?;
    }

    log::info!(
        "finished at generation {}, best fitness so far {:.2}",
        driver.engine().generation(),
        best.get()
    );
    Ok(())
}
