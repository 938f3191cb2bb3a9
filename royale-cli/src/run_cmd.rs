//! Run command - simulate one or more tournaments and persist the results
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: prepare_config(), run_one(), persist()
//! - Level 3: run_seeded() - one tournament from its stored seed

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use royale_core::CareerBook;
use royale_tournament::{
    run_tournament_observed, MatchOutcome, SimContext, TournamentConfig, TournamentReport, TournamentRun,
};

use crate::report;
use crate::store::DataStore;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct RunArgs {
    /// Apply a tournament template before running (e.g. FNCS, RELOAD)
    #[arg(long)]
    pub template: Option<String>,

    /// Seed for this run instead of the stored one
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of tournaments to run back to back
    #[arg(long, default_value = "1")]
    pub tournaments: u32,

    /// Print reports as JSON
    #[arg(long)]
    pub json: bool,

    /// Only print final standings
    #[arg(long)]
    pub quiet: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run the simulation
///
/// 1. Load config, apply template and seed overrides
/// 2. Load careers, season and active mods for the configured region
/// 3. Run each tournament from the stored seed, persisting state and the next seed after every one
/// 4. Report
pub fn run(args: RunArgs, store: &DataStore) -> Result<()> {
    let config = prepare_config(&args, store)?;
    let region = config.region.clone();

    let mut careers = store.load_careers(&region);
    let mut ctx = SimContext::new(config, Local::now().date_naive())
        .with_season(store.load_season(&region))
        .with_extensions(store.load_extensions());

    tracing::info!(
        "Running {} tournament(s) in {} with seed {} (mods: {})",
        args.tournaments,
        region,
        ctx.config.random_seed,
        mod_summary(&ctx)
    );

    let mut reports = Vec::with_capacity(args.tournaments as usize);
    for _ in 0..args.tournaments {
        let (report, updated) = run_one(&mut ctx, &careers, &args)?;
        careers = updated;
        persist(store, &ctx, &careers)?;

        if args.json {
            reports.push(report);
        } else {
            report::print_tournament(&report, args.quiet);
        }
    }

    if args.json {
        let json = serde_json::to_string_pretty(&reports).context("Failed to serialize reports")?;
        println!("{}", json);
    }
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn prepare_config(args: &RunArgs, store: &DataStore) -> Result<TournamentConfig> {
    let mut config = store.load_config();
    if let Some(template) = &args.template {
        config
            .apply_template(template)
            .with_context(|| format!("Cannot apply template {}", template))?;
    }
    if let Some(seed) = args.seed {
        config.random_seed = seed;
    }
    Ok(config)
}

fn run_one(
    ctx: &mut SimContext,
    careers: &CareerBook,
    args: &RunArgs,
) -> Result<(TournamentReport, CareerBook)> {
    let bar = if args.json || args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(ctx.config.matches as u64)
    };
    bar.set_style(
        ProgressStyle::default_bar()
            .template("  [{bar:30}] match {pos}/{len} {msg}")
            .context("Invalid progress template")?
            .progress_chars("=> "),
    );

    let run = run_seeded(ctx, careers, |outcome| {
        if let Some(report) = outcome.report() {
            bar.set_message(report.winner_name.clone());
        }
        bar.inc(1);
    })?;
    bar.finish_and_clear();

    Ok((run.report, run.careers))
}

/// Save careers and season for the region, and the config with its advanced seed
fn persist(store: &DataStore, ctx: &SimContext, careers: &CareerBook) -> Result<()> {
    let region = &ctx.config.region;
    store.save_careers(region, careers)?;
    store.save_season(region, &ctx.season)?;
    store.save_config(&ctx.config)
}

// ============================================================================
// LEVEL 3 - SEEDED TOURNAMENT
// ============================================================================

/// Run one tournament from `ctx.config.random_seed`, then store the seed for the next one.
///
/// Every tournament starts from a fresh generator, so tournament k of a run replays exactly
/// from the seed saved after tournament k - 1.
fn run_seeded<F>(ctx: &mut SimContext, careers: &CareerBook, on_match: F) -> Result<TournamentRun>
where
    F: FnMut(&MatchOutcome),
{
    let mut rng = ChaCha8Rng::seed_from_u64(ctx.config.random_seed);
    let run = run_tournament_observed(ctx, careers, &mut rng, on_match).context("Tournament failed")?;
    ctx.config.random_seed = rng.gen();
    Ok(run)
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn mod_summary(ctx: &SimContext) -> String {
    let names = ctx.extensions.enabled_names();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}
