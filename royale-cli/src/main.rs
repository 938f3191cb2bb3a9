//! Royale CLI - Command-line interface
//!
//! Commands:
//! - run: Simulate tournaments and persist careers and season
//! - season: Show the current season standings
//! - career: Show one player's career
//! - config: Show or edit settings, load templates
//! - mods: List, enable or disable extensions

mod config_cmd;
mod report;
mod run_cmd;
mod season_cmd;
mod store;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config_cmd::{ConfigCommand, ModsCommand};
use run_cmd::RunArgs;
use store::DataStore;

#[derive(Parser)]
#[command(name = "royale")]
#[command(about = "Battle royale tournament simulator")]
struct Cli {
    /// Directory holding config, mods, careers and seasons
    #[arg(long, global = true, default_value = "royale_data")]
    data_dir: PathBuf,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one or more tournaments
    Run(RunArgs),
    /// Show the current season
    Season,
    /// Show a player's career
    Career { name: String },
    /// Show or edit settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Manage mods
    Mods {
        #[command(subcommand)]
        command: ModsCommand,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = DataStore::open(&cli.data_dir)?;
    match cli.command {
        Commands::Run(args) => run_cmd::run(args, &store),
        Commands::Season => season_cmd::run_season(&store),
        Commands::Career { name } => season_cmd::run_career(&name, &store),
        Commands::Config { command } => config_cmd::run_config(command, &store),
        Commands::Mods { command } => config_cmd::run_mods(command, &store),
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
