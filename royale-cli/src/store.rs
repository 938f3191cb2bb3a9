//! On-disk state - config, active mods, per-region career book and season
//!
//! Layout under the data directory:
//!
//! ```text
//! config.json
//! mods.json
//! eu/career_stats.json
//! eu/season_data.json
//! backups/career_stats_eu_20250601_120000_000.json
//! ```
//!
//! Missing files load as defaults. Corrupt files also load as defaults, with a warning, and are
//! left on disk untouched until the next save backs them up.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use royale_core::CareerBook;
use royale_tournament::{ExtensionSet, SeasonState, TournamentConfig};

/// Backups kept per file prefix
pub const BACKUPS_KEPT: usize = 20;

const CONFIG_FILE: &str = "config.json";
const MODS_FILE: &str = "mods.json";
const CAREER_FILE: &str = "career_stats";
const SEASON_FILE: &str = "season_data";
const BACKUP_DIR: &str = "backups";

/// Active mod names, as persisted
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModsFile {
    pub active: Vec<String>,
}

pub struct DataStore {
    root: PathBuf,
}

impl DataStore {
    /// Open (and create if needed) a data directory
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).with_context(|| format!("Failed to create data directory: {}", root.display()))?;
        Ok(Self { root })
    }

    // ------------------------------------------------------------------------
    // Config and mods
    // ------------------------------------------------------------------------

    pub fn load_config(&self) -> TournamentConfig {
        load_or_default(&self.root.join(CONFIG_FILE))
    }

    pub fn save_config(&self, config: &TournamentConfig) -> Result<()> {
        write_json(&self.root.join(CONFIG_FILE), config)
    }

    pub fn load_mods(&self) -> ModsFile {
        load_or_default(&self.root.join(MODS_FILE))
    }

    pub fn save_mods(&self, mods: &ModsFile) -> Result<()> {
        write_json(&self.root.join(MODS_FILE), mods)
    }

    /// Bundled extensions with the persisted ones switched on
    pub fn load_extensions(&self) -> ExtensionSet {
        let mut extensions = ExtensionSet::bundled();
        let unknown = extensions.enable_only(&self.load_mods().active);
        for name in unknown {
            tracing::warn!("Ignoring unknown mod in {}: {}", MODS_FILE, name);
        }
        extensions
    }

    pub fn save_extensions(&self, extensions: &ExtensionSet) -> Result<()> {
        let active = extensions.enabled_names().into_iter().map(str::to_string).collect();
        self.save_mods(&ModsFile { active })
    }

    // ------------------------------------------------------------------------
    // Per-region state
    // ------------------------------------------------------------------------

    pub fn load_careers(&self, region: &str) -> CareerBook {
        load_or_default(&self.region_file(region, CAREER_FILE))
    }

    /// Save the career book, backing up the previous copy first
    pub fn save_careers(&self, region: &str, careers: &CareerBook) -> Result<()> {
        self.save_with_backup(region, CAREER_FILE, careers)
    }

    pub fn load_season(&self, region: &str) -> SeasonState {
        load_or_default(&self.region_file(region, SEASON_FILE))
    }

    /// Save the season state, backing up the previous copy first
    pub fn save_season(&self, region: &str, season: &SeasonState) -> Result<()> {
        self.save_with_backup(region, SEASON_FILE, season)
    }

    /// Backups on disk for one region file, oldest first
    #[cfg(test)]
    pub fn backups(&self, region: &str, stem: &str) -> Result<Vec<PathBuf>> {
        list_backups(&self.root.join(BACKUP_DIR), &backup_prefix(region, stem))
    }

    fn region_dir(&self, region: &str) -> PathBuf {
        self.root.join(region.to_lowercase())
    }

    fn region_file(&self, region: &str, stem: &str) -> PathBuf {
        self.region_dir(region).join(format!("{}.json", stem))
    }

    fn save_with_backup<T: Serialize>(&self, region: &str, stem: &str, value: &T) -> Result<()> {
        let dir = self.region_dir(region);
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create region directory: {}", dir.display()))?;

        let path = self.region_file(region, stem);
        if path.exists() {
            self.backup(&path, &backup_prefix(region, stem))?;
        }
        write_json(&path, value)
    }

    fn backup(&self, path: &Path, prefix: &str) -> Result<()> {
        let dir = self.root.join(BACKUP_DIR);
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create backup directory: {}", dir.display()))?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S_%3f");
        let target = dir.join(format!("{}_{}.json", prefix, stamp));
        fs::copy(path, &target).with_context(|| format!("Failed to back up {} to {}", path.display(), target.display()))?;

        let removed = prune_backups(&dir, prefix, BACKUPS_KEPT)?;
        if removed > 0 {
            tracing::debug!("Pruned {} old {} backups", removed, prefix);
        }
        Ok(())
    }
}

// ============================================================================
// Level 4 - Utilities
// ============================================================================

fn backup_prefix(region: &str, stem: &str) -> String {
    format!("{}_{}", stem, region.to_lowercase())
}

/// Read a JSON file, falling back to the default when it is missing or unreadable
fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
        Err(e) => {
            tracing::warn!("Could not read {}: {}; using defaults", path.display(), e);
            return T::default();
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Corrupt data in {}: {}; using defaults", path.display(), e);
            T::default()
        }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize state")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// Backups whose file name starts with `prefix_`, oldest first.
///
/// Timestamps sort lexically, so name order is age order.
fn list_backups(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let marker = format!("{}_", prefix);
    let mut found = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.starts_with(&marker) && n.ends_with(".json"));
        if matches {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// Delete all but the newest `keep` backups for `prefix`, returning how many were removed
fn prune_backups(dir: &Path, prefix: &str, keep: usize) -> Result<usize> {
    let backups = list_backups(dir, prefix)?;
    let excess = backups.len().saturating_sub(keep);
    for old in &backups[..excess] {
        fs::remove_file(old).with_context(|| format!("Failed to remove old backup {}", old.display()))?;
    }
    Ok(excess)
}

#[cfg(test)]
mod tests {
    use super::*;
    use royale_core::CareerStats;

    fn store() -> (tempfile::TempDir, DataStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_files_load_defaults() {
        let (_dir, store) = store();
        assert_eq!(store.load_config(), TournamentConfig::default());
        assert!(store.load_careers("EU").is_empty());
        assert_eq!(store.load_season("EU"), SeasonState::default());
        assert!(store.load_mods().active.is_empty());
    }

    #[test]
    fn test_corrupt_files_load_defaults() {
        let (dir, store) = store();
        fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        fs::create_dir_all(dir.path().join("eu")).unwrap();
        fs::write(dir.path().join("eu/career_stats.json"), "[1, 2, 3]").unwrap();

        assert_eq!(store.load_config(), TournamentConfig::default());
        assert!(store.load_careers("EU").is_empty());
    }

    #[test]
    fn test_career_round_trip_is_per_region() {
        let (_dir, store) = store();
        let mut book = CareerBook::new();
        book.insert(
            "Swizzy".to_string(),
            CareerStats {
                earnings: 12_000,
                tournaments: 3,
                ..Default::default()
            },
        );
        store.save_careers("EU", &book).unwrap();

        assert_eq!(store.load_careers("EU"), book);
        assert!(store.load_careers("NA").is_empty());
    }

    #[test]
    fn test_config_round_trip() {
        let (_dir, store) = store();
        let mut config = TournamentConfig::default();
        config.set("matches", "9").unwrap();
        config.set("region", "NA").unwrap();
        store.save_config(&config).unwrap();
        assert_eq!(store.load_config(), config);
    }

    #[test]
    fn test_extensions_round_trip_skips_unknown() {
        let (_dir, store) = store();
        store
            .save_mods(&ModsFile {
                active: vec!["ping difference".to_string(), "Low Gravity".to_string()],
            })
            .unwrap();

        let extensions = store.load_extensions();
        assert_eq!(extensions.enabled_names(), vec!["Ping Difference"]);

        store.save_extensions(&extensions).unwrap();
        assert_eq!(store.load_mods().active, vec!["Ping Difference".to_string()]);
    }

    #[test]
    fn test_saves_back_up_previous_copy() {
        let (_dir, store) = store();
        let season = SeasonState::default();
        store.save_season("EU", &season).unwrap();
        assert!(store.backups("EU", SEASON_FILE).unwrap().is_empty());

        store.save_season("EU", &season).unwrap();
        assert_eq!(store.backups("EU", SEASON_FILE).unwrap().len(), 1);
        assert!(store.backups("EU", CAREER_FILE).unwrap().is_empty());
    }

    #[test]
    fn test_prune_keeps_newest() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..25 {
            fs::write(dir.path().join(format!("season_data_eu_2025010{}_{:06}.json", i % 2, i)), "{}").unwrap();
        }
        fs::write(dir.path().join("career_stats_eu_20250101_000000.json"), "{}").unwrap();

        let removed = prune_backups(dir.path(), "season_data_eu", BACKUPS_KEPT).unwrap();
        assert_eq!(removed, 5);
        assert_eq!(list_backups(dir.path(), "season_data_eu").unwrap().len(), BACKUPS_KEPT);
        assert_eq!(list_backups(dir.path(), "career_stats_eu").unwrap().len(), 1);
    }
}
