#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs maze chase sessions headlessly.

mod report;

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use maze_chase_core::InputState;
use maze_chase_simulation::{GameConfig, Simulation};
use maze_chase_world::World;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::report::{Format, Summary};

/// Headless runner for the maze chase simulation.
#[derive(Debug, Parser)]
#[command(name = "maze-chase", version, about)]
struct Cli {
    /// Tracing filter, taking precedence over `RUST_LOG`.
    #[arg(long, global = true, value_name = "FILTER")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Runs a session without input and prints periodic snapshots.
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Maze text file; the classic maze is used when omitted.
    #[arg(long, value_name = "FILE")]
    maze: Option<PathBuf>,
    /// TOML file holding a game configuration.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Ticks to simulate at most.
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,
    /// Level to start at.
    #[arg(long)]
    level: Option<u32>,
    /// Seed of every random walk.
    #[arg(long)]
    seed: Option<u64>,
    /// Steer Pac-Man with a random walk.
    #[arg(long)]
    autopilot: bool,
    /// Keep each ghost's planned route in the snapshots.
    #[arg(long)]
    route_preview: bool,
    /// Print a snapshot every N ticks.
    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u64).range(1..))]
    every: u64,
    /// Print JSON lines instead of text.
    #[arg(long)]
    json: bool,
}

/// Entry point for the maze chase command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;
    match cli.command {
        CliCommand::Run(args) => run(&args),
    }
}

fn init_tracing(filter: Option<&str>) -> Result<()> {
    let filter = match filter {
        Some(filter) => {
            EnvFilter::try_new(filter).with_context(|| format!("invalid log filter `{filter}`"))?
        }
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
    Ok(())
}

fn run(args: &RunArgs) -> Result<()> {
    let config = session_config(args)?;
    let world = load_world(args.maze.as_deref())?;
    let mut simulation = Simulation::new(world, config).context("failed to start session")?;
    let format = if args.json { Format::Json } else { Format::Text };
    let mut out = io::stdout().lock();
    let mut summary = Summary::default();

    for tick in 1..=args.ticks {
        if simulation.is_game_over() {
            break;
        }
        if simulation.is_waiting_for_reset() {
            simulation.reset_after_death()?;
        }
        if simulation.is_level_complete() {
            let next = simulation.level() + 1;
            summary.record(&simulation.start_level(next)?);
        }
        summary.record(&simulation.update(InputState::default())?);
        summary.ticks = tick;
        if tick % args.every == 0 {
            report::write_snapshot(&mut out, format, &simulation.snapshot())?;
        }
    }

    summary.level = simulation.level();
    summary.score = simulation.score();
    summary.lives = simulation.lives();
    summary.game_over = simulation.is_game_over();
    info!(
        ticks = summary.ticks,
        score = summary.score,
        level = summary.level,
        "session finished"
    );
    report::write_summary(&mut out, format, &summary)?;
    out.flush()?;
    Ok(())
}

/// Configuration file values with command-line overrides applied.
fn session_config(args: &RunArgs) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GameConfig::default(),
    };
    if let Some(level) = args.level {
        config.start_level = level;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.autopilot |= args.autopilot;
    config.route_preview |= args.route_preview;
    Ok(config)
}

fn load_config(path: &Path) -> Result<GameConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn load_world(path: Option<&Path>) -> Result<World> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read maze {}", path.display()))?;
            World::from_text(&text).with_context(|| format!("invalid maze {}", path.display()))
        }
        None => World::classic().context("built-in maze is malformed"),
    }
}
