#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Podfield levels headlessly.

mod campaign;

use std::{fs, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use podfield_core::{
    FieldConfig, GameLevel, RoundOutcome, DEFAULT_COLUMNS, DEFAULT_ROWS, DEFAULT_SEED,
    MAX_MOVES_PER_ROUND, WELCOME_BANNER,
};
use tracing_subscriber::EnvFilter;

use campaign::{play_level, select_levels, AiStrategy};

/// Command-line arguments accepted by the `podfield` binary.
#[derive(Debug, Parser)]
#[command(author, version, about = "Plays Podfield levels with pathfinding drives")]
struct Cli {
    /// One-based index of the level to play.
    #[arg(long, default_value_t = 1)]
    level: usize,
    /// Plays every level in order.
    #[arg(long)]
    all_levels: bool,
    /// JSON file holding a list of levels to use instead of the presets.
    #[arg(long)]
    level_file: Option<PathBuf>,
    /// Seed for the first level; later levels use consecutive seeds.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Maximum number of ticks per round.
    #[arg(long, default_value_t = MAX_MOVES_PER_ROUND)]
    max_moves: u32,
    /// Overrides the sensor range of every level.
    #[arg(long)]
    sensor_range: Option<u32>,
    /// Number of grid columns.
    #[arg(long, default_value_t = DEFAULT_COLUMNS)]
    columns: u32,
    /// Number of grid rows.
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: u32,
    /// Behaviour of the AI drives. Parked drives never leave their spawn
    /// tile and may block a goal for the whole round.
    #[arg(long, value_enum, default_value_t = AiStrategy::Planner)]
    ai_strategy: AiStrategy,
}

/// Entry point for the Podfield command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    println!("{WELCOME_BANNER}");

    let levels = match &cli.level_file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read level file {}", path.display()))?;
            GameLevel::parse_list(&text)
                .with_context(|| format!("failed to parse level file {}", path.display()))?
        }
        None => GameLevel::presets(),
    };
    let available = levels.len();
    let selected = select_levels(levels, cli.level, cli.all_levels)
        .ok_or_else(|| anyhow!("level {} does not exist ({available} available)", cli.level))?;

    let mut won = 0;
    let played = selected.len();
    for (offset, mut level) in selected.into_iter().enumerate() {
        if cli.sensor_range.is_some() {
            level.sensor_range = cli.sensor_range;
        }
        let base = FieldConfig {
            columns: cli.columns,
            rows: cli.rows,
            seed: cli.seed.wrapping_add(offset as u64),
            ..FieldConfig::default()
        };
        let report = play_level(&base, &level, cli.max_moves, cli.ai_strategy)
            .with_context(|| format!("failed to set up {}", level.name))?;
        if report.outcome == RoundOutcome::Won {
            won += 1;
        }
        println!("{}: {:?} ({})", report.name, report.outcome, report.summary);
    }
    println!("won {won} of {played} levels");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
