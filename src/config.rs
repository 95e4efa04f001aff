use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Looked up in the working directory at start-up.
pub const CONFIG_FILE: &str = "funding-lens.json";

// ---------------------------------------------------------------------------
// DashboardConfig
// ---------------------------------------------------------------------------

/// Tunables for loading and the chart pipelines. Every field has a default,
/// so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Dataset opened at start-up.
    pub data_path: PathBuf,
    /// "Recent funding" counts events after `reference_date - recent_years`.
    pub reference_date: NaiveDate,
    pub recent_years: u32,
    /// Fast-growing companies: at least this many rounds ...
    pub fast_growth_min_rounds: i64,
    /// ... raised within this many days.
    pub fast_growth_max_days: i64,
    pub top_companies: usize,
    pub top_markets: usize,
    pub top_recent: usize,
    pub top_cities: usize,
    pub top_regions: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("Investment_df_cleaned.csv.csv"),
            reference_date: NaiveDate::from_ymd_opt(2014, 12, 31).unwrap_or_default(),
            recent_years: 3,
            fast_growth_min_rounds: 3,
            fast_growth_max_days: 730,
            top_companies: 10,
            top_markets: 10,
            top_recent: 50,
            top_cities: 20,
            top_regions: 20,
        }
    }
}

impl DashboardConfig {
    /// Read a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Read `path` if it exists; fall back to defaults otherwise or when the
    /// file is malformed.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            Err(e) => {
                log::warn!("Ignoring config: {e:#}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = DashboardConfig::load_or_default(&dir.path().join(CONFIG_FILE));
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(cfg.reference_date.to_string(), "2014-12-31");
    }

    #[test]
    fn partial_file_overrides_only_its_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"recent_years": 5, "reference_date": "2013-06-30"}"#).unwrap();

        let cfg = DashboardConfig::load(&path).unwrap();
        assert_eq!(cfg.recent_years, 5);
        assert_eq!(cfg.reference_date, NaiveDate::from_ymd_opt(2013, 6, 30).unwrap());
        assert_eq!(cfg.top_recent, 50);
    }

    #[test]
    fn malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        assert!(DashboardConfig::load(&path).is_err());
        assert_eq!(DashboardConfig::load_or_default(&path), DashboardConfig::default());
    }
}
