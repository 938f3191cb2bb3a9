//! Config and mods commands - inspect and edit the stored settings

use anyhow::{bail, Context, Result};
use clap::Subcommand;

use royale_tournament::TournamentConfig;

use crate::store::DataStore;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print every setting
    Show,
    /// Change one setting
    Set { key: String, value: String },
    /// Load a tournament template (CASH_CUP, ELITE_SERIES, FNCS, LAN, VICTORY_CUP, RELOAD)
    Template { name: String },
}

#[derive(Subcommand)]
pub enum ModsCommand {
    /// List bundled mods and whether they are active
    List,
    /// Turn a mod on
    Enable { name: String },
    /// Turn a mod off
    Disable { name: String },
}

pub fn run_config(command: ConfigCommand, store: &DataStore) -> Result<()> {
    let mut config = store.load_config();
    match command {
        ConfigCommand::Show => {
            print_config(&config);
            return Ok(());
        }
        ConfigCommand::Set { key, value } => {
            config
                .set(&key, &value)
                .with_context(|| format!("Cannot set {} to {}", key, value))?;
            println!("{} = {}", key, value);
        }
        ConfigCommand::Template { name } => {
            config
                .apply_template(&name)
                .with_context(|| format!("Cannot apply template {}", name))?;
            println!("Applied template {}", name.to_uppercase());
            print_config(&config);
        }
    }
    store.save_config(&config)
}

pub fn run_mods(command: ModsCommand, store: &DataStore) -> Result<()> {
    let mut extensions = store.load_extensions();
    match command {
        ModsCommand::List => {
            for (name, description, enabled) in extensions.list() {
                let mark = if enabled { "x" } else { " " };
                println!("[{}] {:<22} {}", mark, name, description);
            }
            return Ok(());
        }
        ModsCommand::Enable { name } => {
            if !extensions.enable(&name) {
                bail!("Unknown mod: {}", name);
            }
            println!("Enabled {}", name);
        }
        ModsCommand::Disable { name } => {
            if !extensions.disable(&name) {
                bail!("Unknown mod: {}", name);
            }
            println!("Disabled {}", name);
        }
    }
    store.save_extensions(&extensions)
}

fn print_config(config: &TournamentConfig) {
    for (key, value) in config.entries() {
        println!("{:<20} {}", key, value);
    }
}
