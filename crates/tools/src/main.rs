use anyhow::{Context, Result};
use bandits_core::{
    Battle, Faction, PowerOverrides, Scenario, SearchStrategy, find_minimal_winning_power,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod config;

use config::ToolConfig;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML file with [rules] and [search] tables
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the map once and report the score
    Run {
        map: PathBuf,
        #[arg(long)]
        elf_power: Option<i32>,
        #[arg(long)]
        goblin_power: Option<i32>,
        /// Print every battle event and the final map
        #[arg(long)]
        trace: bool,
    },
    /// Find the smallest attack power that wins without losses
    Search {
        map: PathBuf,
        #[arg(short, long, default_value = "elf")]
        faction: Faction,
        #[arg(long)]
        max_power: Option<i32>,
        #[arg(long)]
        strategy: Option<SearchStrategy>,
    },
}

#[derive(Serialize)]
struct RunReport {
    score: i64,
    #[serde(flatten)]
    outcome: bandits_core::Outcome,
}

#[derive(Serialize)]
struct SearchReport {
    power: i32,
    score: i64,
    #[serde(flatten)]
    outcome: bandits_core::Outcome,
}

fn load_scenario(path: &Path, config: &ToolConfig) -> Result<Scenario> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read map file: {}", path.display()))?;
    Scenario::parse(&text, &config.rules)
        .with_context(|| format!("Failed to parse map file: {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bandits=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ToolConfig::load_or_default(cli.config.as_deref())?;
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Run { map, elf_power, goblin_power, trace } => {
            let scenario = load_scenario(&map, &config)?;
            let overrides = PowerOverrides { elf: elf_power, goblin: goblin_power };
            let mut battle = Battle::new(&scenario, &overrides)
                .with_context(|| format!("Invalid battle setup for {}", map.display()))?;
            let result = battle.run_to_end();

            if trace {
                for event in battle.log() {
                    println!("{event:?}");
                }
                print!("{}", battle.draw());
            }
            let outcome = result.context("Battle did not finish")?;

            if cli.json {
                let report = RunReport { score: outcome.score(), outcome };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{} win after {} full rounds with {} hit points left",
                    outcome.winner, outcome.rounds_completed, outcome.remaining_hit_points
                );
                println!("Score: {}", outcome.score());
            }
        }
        Commands::Search { map, faction, max_power, strategy } => {
            let scenario = load_scenario(&map, &config)?;
            let mut search = config.search;
            if let Some(max_power) = max_power {
                search.max_power = max_power;
            }
            if let Some(strategy) = strategy {
                search.strategy = strategy;
            }

            let found = find_minimal_winning_power(&scenario, faction, &search)
                .with_context(|| format!("Power search failed for {}", map.display()))?;

            if cli.json {
                let report = SearchReport {
                    power: found.power,
                    score: found.outcome.score(),
                    outcome: found.outcome,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{faction} win flawlessly at attack power {} after {} full rounds",
                    found.power, found.outcome.rounds_completed
                );
                println!("Score: {}", found.outcome.score());
            }
        }
    }

    Ok(())
}
