use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::controls::{FilterControls, option_label};
use crate::data::record::InvestmentDataset;
use crate::view::{DashboardView, render};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until a file loads).
    pub dataset: Option<InvestmentDataset>,

    /// File the dataset came from.
    pub source: Option<PathBuf>,

    /// Sidebar selections; present whenever `dataset` is.
    pub controls: Option<FilterControls>,

    /// Derived view for the current controls (cached).
    pub view: Option<DashboardView>,

    /// One colour per market, shared by every panel.
    pub market_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            dataset: None,
            source: None,
            controls: None,
            view: None,
            market_colors: ColorMap::default(),
            status_message: None,
        }
    }

    /// Load a dataset file. On failure the current dataset stays and the
    /// error is shown in the status line.
    pub fn open(&mut self, path: &Path) {
        match InvestmentDataset::open(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} records with columns {:?}",
                    dataset.len(),
                    dataset.columns
                );
                self.set_dataset(dataset, Some(path.to_path_buf()));
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset, reset filters and colours.
    pub fn set_dataset(&mut self, dataset: InvestmentDataset, source: Option<PathBuf>) {
        self.controls = Some(FilterControls::for_dataset(&dataset));
        self.market_colors = ColorMap::new(dataset.market_options.iter().map(option_label));
        self.dataset = Some(dataset);
        self.source = source;
        self.status_message = None;
        self.refresh();
    }

    /// Recompute `view` after a control change.
    pub fn refresh(&mut self) {
        self.view = match (&self.dataset, &self.controls) {
            (Some(ds), Some(controls)) => Some(render(controls, ds, &self.config)),
            _ => None,
        };
    }

    /// Move the recent-funding reference date.
    pub fn set_reference_date(&mut self, date: NaiveDate) {
        if self.config.reference_date != date {
            self.config.reference_date = date;
            self.refresh();
        }
    }

    /// Put every control back to "select all" and the full year range.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.controls = Some(FilterControls::for_dataset(ds));
            self.refresh();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::InvestmentRecord;

    fn state_with(records: Vec<InvestmentRecord>) -> AppState {
        let mut state = AppState::default();
        state.set_dataset(InvestmentDataset::from_records(records, Vec::new(), false), None);
        state
    }

    fn rec(market: &str, year: i32, usd: f64) -> InvestmentRecord {
        InvestmentRecord {
            name: Some(format!("{market}-{year}")),
            market: Some(market.into()),
            country_code: Some("USA".into()),
            status: Some("operating".into()),
            founded_year: Some(year),
            funding_total_usd: Some(usd),
            ..Default::default()
        }
    }

    #[test]
    fn loading_builds_a_view() {
        let state = state_with(vec![rec("Software", 2005, 2e6), rec("Games", 2010, 1e6)]);
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.visible_rows, 2);
        assert_eq!(state.market_colors.len(), 2);
    }

    #[test]
    fn control_change_then_refresh_narrows_view() {
        let mut state = state_with(vec![rec("Software", 2005, 2e6), rec("Games", 2010, 1e6)]);
        if let Some(c) = state.controls.as_mut() {
            c.sector.set_select_all(false);
            c.sector.set_chosen(&Some("Games".into()), true);
        }
        state.refresh();
        assert_eq!(state.view.as_ref().unwrap().visible_rows, 1);

        state.reset_filters();
        assert_eq!(state.view.as_ref().unwrap().visible_rows, 2);
    }

    #[test]
    fn failed_open_keeps_previous_dataset() {
        let mut state = state_with(vec![rec("Software", 2005, 2e6)]);
        state.open(Path::new("/nonexistent/investments.csv"));
        assert!(state.dataset.is_some());
        assert!(state.status_message.as_deref().unwrap_or("").starts_with("Error"));
    }
}
