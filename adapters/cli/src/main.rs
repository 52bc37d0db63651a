#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Maze Chase headlessly.

mod input;
mod layout_transfer;
mod levels;
mod session;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use maze_chase_system_bootstrap::Bootstrap;
use maze_chase_world::World;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    input::{Autopilot, InputSource, Script, Wander},
    levels::LevelPack,
    session::Session,
};

/// Command-line arguments accepted by the Maze Chase simulator.
#[derive(Debug, Parser)]
#[command(name = "maze-chase", about = "Headless Maze Chase simulator")]
struct CliArgs {
    /// TOML level pack to play instead of the built-in campaign.
    #[arg(long, value_name = "PATH")]
    levels: Option<PathBuf>,

    /// Maximum number of ticks to simulate at 60 ticks per second.
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Where avatar input comes from.
    #[arg(long, value_enum, default_value_t = InputMode::Autopilot)]
    input: InputMode,

    /// Whitespace separated `<DIR>[*<ticks>]` tokens used by `--input script`.
    #[arg(long, value_name = "TOKENS", default_value = "")]
    script: String,

    /// Seed for `--input wander`.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Print the transfer string of the level at INDEX and exit.
    #[arg(long, value_name = "INDEX", conflicts_with = "import_level")]
    export_level: Option<usize>,

    /// Play a single level decoded from a transfer string.
    #[arg(long, value_name = "STRING")]
    import_level: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum InputMode {
    /// Replay `--script`.
    Script,
    /// Follow the shortest path to the next key or the exit.
    Autopilot,
    /// Random walk seeded by `--seed`.
    Wander,
}

/// Entry point for the Maze Chase command-line interface.
fn main() -> Result<()> {
    init_tracing();
    run(CliArgs::parse())
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

fn run(args: CliArgs) -> Result<()> {
    let mut pack = match &args.levels {
        Some(path) => LevelPack::load(path)?,
        None => LevelPack::builtin(),
    };

    if let Some(index) = args.export_level {
        let level = pack
            .levels
            .get(index)
            .with_context(|| format!("level pack has no level {index}"))?;
        println!("{}", layout_transfer::encode(level));
        return Ok(());
    }

    if let Some(encoded) = &args.import_level {
        let level = layout_transfer::decode(encoded).context("failed to import level")?;
        info!(name = %level.name, "level_imported");
        pack.levels = vec![level];
    }

    let world = World::with_levels(pack.tuning.clone(), &pack.levels)
        .context("failed to build world from level pack")?;

    let bootstrap = Bootstrap;
    println!("{}", bootstrap.welcome_banner(&world));
    let summary = bootstrap.level_summary(&world);
    info!(
        level = %summary.name,
        number = summary.number,
        total = summary.total,
        columns = summary.columns,
        rows = summary.rows,
        keys = summary.keys,
        pursuers = summary.pursuers,
        gate = summary.has_gate,
        "session_started"
    );

    let input: Box<dyn InputSource> = match args.input {
        InputMode::Script => {
            let script = Script::parse(&args.script).context("invalid --script")?;
            info!(ticks = script.len(), "script_loaded");
            Box::new(script)
        }
        InputMode::Autopilot => Box::new(Autopilot),
        InputMode::Wander => Box::new(Wander::new(args.seed)),
    };

    let outcome = Session::new(world, input).run(args.ticks);
    let json = serde_json::to_string_pretty(&outcome).context("failed to encode session summary")?;
    println!("{json}");
    Ok(())
}
