//! Season and career commands - read-only views of the stored history

use anyhow::{bail, Result};

use crate::report;
use crate::store::DataStore;

/// Show the current season for the configured region
pub fn run_season(store: &DataStore) -> Result<()> {
    let region = store.load_config().region;
    let season = store.load_season(&region);
    report::print_season(&season, &region);
    Ok(())
}

/// Show one player's career. Names match case-insensitively.
pub fn run_career(name: &str, store: &DataStore) -> Result<()> {
    let region = store.load_config().region;
    let careers = store.load_careers(&region);

    let found = careers
        .get_key_value(name)
        .or_else(|| careers.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)));
    match found {
        Some((name, stats)) => {
            report::print_career(name, stats);
            Ok(())
        }
        None => bail!("No career recorded for {} in region {}", name, region),
    }
}
