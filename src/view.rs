use chrono::NaiveDate;

use crate::config::DashboardConfig;
use crate::controls::FilterControls;
use crate::data::record::InvestmentDataset;
use crate::metrics::aggregate::{
    self, Availability, CompanyTotal, FastGrowth, LabelTotal, RecentFunding, RoundCount,
    YearTotal,
};
use crate::metrics::kpi::Kpis;

// ---------------------------------------------------------------------------
// DashboardView – everything the UI draws
// ---------------------------------------------------------------------------

/// One render cycle's worth of derived data. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub total_rows: usize,
    pub visible_rows: usize,
    pub kpis: Kpis,
    pub funding_by_year: Vec<YearTotal>,
    pub top_companies: Vec<CompanyTotal>,
    pub top_markets: Vec<LabelTotal>,
    pub round_distribution: Vec<RoundCount>,
    pub fast_growing: Vec<FastGrowth>,
    /// Start date shown in the recent-funding panel title.
    pub recent_since: NaiveDate,
    pub recent_funding: Vec<RecentFunding>,
    pub top_cities: Vec<LabelTotal>,
    pub top_regions: Availability<Vec<LabelTotal>>,
}

/// Build the view from the current controls. Pure: the same controls,
/// dataset and config always give the same view.
pub fn render(
    controls: &FilterControls,
    dataset: &InvestmentDataset,
    config: &DashboardConfig,
) -> DashboardView {
    let selection = controls.selection();
    let filtered = selection.apply(&dataset.records);
    let cutoff = aggregate::recent_cutoff(config.reference_date, config.recent_years);

    DashboardView {
        total_rows: dataset.len(),
        visible_rows: filtered.len(),
        kpis: Kpis::compute(&filtered),
        funding_by_year: aggregate::funding_by_year(&filtered),
        top_companies: aggregate::top_companies(&filtered, config.top_companies),
        top_markets: aggregate::top_markets(&filtered, config.top_markets),
        round_distribution: aggregate::round_distribution(&filtered),
        fast_growing: aggregate::fast_growing(
            &filtered,
            config.fast_growth_min_rounds,
            config.fast_growth_max_days,
        ),
        recent_since: cutoff.date(),
        recent_funding: aggregate::recent_funding(&filtered, cutoff, config.top_recent),
        top_cities: aggregate::top_cities(&filtered, config.top_cities),
        top_regions: aggregate::top_regions(&filtered, dataset.has_region, config.top_regions),
    }
}
