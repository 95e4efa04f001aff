use chrono::{Datelike, NaiveDate, NaiveDateTime};
use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points, Polygon};

use crate::color::{ColorMap, normalized, sequential};
use crate::config::DashboardConfig;
use crate::metrics::aggregate::{Availability, LabelTotal};
use crate::view::DashboardView;

const CHART_HEIGHT: f32 = 320.0;
const WIDE_CHART_HEIGHT: f32 = 360.0;

// ---------------------------------------------------------------------------
// Panel layout (central panel)
// ---------------------------------------------------------------------------

/// Draw the eight chart panels in their fixed layout.
pub fn chart_panels(
    ui: &mut Ui,
    view: &DashboardView,
    markets: &ColorMap,
    config: &DashboardConfig,
) {
    section(ui, "Funding Trends Over Time", |ui| funding_trend(ui, view));

    ui.columns(2, |cols| {
        let title = format!("Top {} Companies by Funding", config.top_companies);
        section(&mut cols[0], &title, |ui| top_companies(ui, view, markets));
        let title = format!("Top {} Markets by Total Funding", config.top_markets);
        section(&mut cols[1], &title, |ui| market_pie(ui, view, markets));
    });

    ui.columns(2, |cols| {
        section(
            &mut cols[0],
            "Distribution of Funding Rounds for Multi-Round Companies",
            |ui| round_distribution(ui, view),
        );
        section(
            &mut cols[1],
            "Timeline of Funding Rounds for Fast-Growing Companies",
            |ui| fast_growing(ui, view),
        );
    });

    let recent_title = format!(
        "Top {} Companies with Recent Funding (after {})",
        config.top_recent,
        view.recent_since.format("%Y-%m-%d")
    );
    section(ui, &recent_title, |ui| recent_funding(ui, view, markets));

    ui.columns(2, |cols| {
        section(
            &mut cols[0],
            "Geographical Distribution of Investments by City",
            |ui| {
                ui.label(format!("Top {} Cities by Total Funding", config.top_cities));
                location_bars(ui, "city_funding", &view.top_cities)
            },
        );
        section(
            &mut cols[1],
            "Geographical Distribution of Investments by Region",
            |ui| match &view.top_regions {
                Availability::Ready(regions) => {
                    ui.label(format!("Top {} Regions by Total Funding", config.top_regions));
                    location_bars(ui, "region_funding", regions)
                }
                Availability::Unavailable(notice) => {
                    ui.label(RichText::new(notice).color(Color32::from_rgb(230, 160, 40)));
                }
            },
        );
    });
}

fn section(ui: &mut Ui, title: &str, body: impl FnOnce(&mut Ui)) {
    ui.add_space(8.0);
    ui.heading(title);
    body(ui);
}

fn no_data(ui: &mut Ui) {
    ui.label(RichText::new("No data for the current filters.").italics());
}

/// Fractional year for a date axis, e.g. 2010-07-02 → ~2010.5.
fn decimal_year(dt: &NaiveDateTime) -> f64 {
    let days_in_year = NaiveDate::from_ymd_opt(dt.year(), 12, 31)
        .map(|d| d.ordinal() as f64)
        .unwrap_or(365.0);
    dt.year() as f64 + dt.ordinal0() as f64 / days_in_year
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

fn funding_trend(ui: &mut Ui, view: &DashboardView) {
    if view.funding_by_year.is_empty() {
        return no_data(ui);
    }
    let points: PlotPoints = view
        .funding_by_year
        .iter()
        .map(|p| [p.year as f64, p.total_usd])
        .collect();

    Plot::new("funding_trend")
        .height(CHART_HEIGHT)
        .x_axis_label("founded_year")
        .y_axis_label("funding_total_usd")
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name("Total funding")
                    .color(Color32::LIGHT_BLUE)
                    .width(2.0),
            );
        });
}

fn top_companies(ui: &mut Ui, view: &DashboardView, markets: &ColorMap) {
    if view.top_companies.is_empty() {
        return no_data(ui);
    }
    let bars: Vec<(String, Bar)> = view
        .top_companies
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let bar = Bar::new(i as f64, c.total_usd)
                .name(format!("{} ({})", c.name, c.status))
                .fill(markets.color_for(&c.market));
            (c.market.clone(), bar)
        })
        .collect();

    Plot::new("top_companies")
        .height(WIDE_CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("funding_total_usd")
        .show(ui, |plot_ui| {
            for chart in bars_by_market(bars, markets) {
                plot_ui.bar_chart(chart);
            }
        });
}

fn market_pie(ui: &mut Ui, view: &DashboardView, markets: &ColorMap) {
    let total: f64 = view.top_markets.iter().map(|m| m.total_usd).sum();
    if view.top_markets.is_empty() || total <= 0.0 {
        return no_data(ui);
    }

    Plot::new("market_pie")
        .height(WIDE_CHART_HEIGHT)
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes([false, false])
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            let mut start = std::f64::consts::FRAC_PI_2;
            for m in &view.top_markets {
                let share = m.total_usd / total;
                let sweep = share * std::f64::consts::TAU;
                plot_ui.polygon(
                    Polygon::new(PlotPoints::new(pie_slice(start, sweep)))
                        .name(format!("{} ({:.1}%)", m.label, share * 100.0))
                        .fill_color(markets.color_for(&m.label))
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );
                start -= sweep;
            }
        });
}

/// Unit-circle wedge from `start` sweeping clockwise by `sweep` radians.
fn pie_slice(start: f64, sweep: f64) -> Vec<[f64; 2]> {
    let steps = ((sweep / std::f64::consts::TAU) * 120.0).ceil().max(2.0) as usize;
    let mut pts = vec![[0.0, 0.0]];
    pts.extend((0..=steps).map(|i| {
        let a = start - sweep * i as f64 / steps as f64;
        [a.cos(), a.sin()]
    }));
    pts
}

fn round_distribution(ui: &mut Ui, view: &DashboardView) {
    if view.round_distribution.is_empty() {
        return no_data(ui);
    }
    let bars: Vec<Bar> = view
        .round_distribution
        .iter()
        .map(|r| {
            Bar::new(r.rounds as f64, r.companies as f64)
                .name(format!("{} rounds", r.rounds))
                .width(0.8)
        })
        .collect();

    Plot::new("round_distribution")
        .height(WIDE_CHART_HEIGHT)
        .x_axis_label("funding_rounds")
        .y_axis_label("count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE));
        });
}

fn fast_growing(ui: &mut Ui, view: &DashboardView) {
    if view.fast_growing.is_empty() {
        return no_data(ui);
    }
    let (lo, hi) = view
        .fast_growing
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            let d = p.duration_days as f64;
            (lo.min(d), hi.max(d))
        });

    Plot::new("fast_growing")
        .height(WIDE_CHART_HEIGHT)
        .x_axis_label("first_funding_at (year)")
        .y_axis_label("funding_rounds")
        .show(ui, |plot_ui| {
            for p in &view.fast_growing {
                let t = normalized(p.duration_days as f64, lo, hi);
                let label = p.name.as_deref().unwrap_or("(unnamed)");
                plot_ui.points(
                    Points::new(vec![[decimal_year(&p.first_funding_at), p.rounds as f64]])
                        .radius(3.0 + 7.0 * t as f32)
                        .color(sequential(t))
                        .name(format!("{label}: {} days", p.duration_days)),
                );
            }
        });
}

fn recent_funding(ui: &mut Ui, view: &DashboardView, markets: &ColorMap) {
    if view.recent_funding.is_empty() {
        return no_data(ui);
    }
    let bars: Vec<(String, Bar)> = view
        .recent_funding
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let bar = Bar::new(i as f64, r.events as f64)
                .name(&r.name)
                .fill(markets.color_for(&r.market));
            (r.market.clone(), bar)
        })
        .collect();

    Plot::new("recent_funding")
        .height(WIDE_CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("last_funding_at (count)")
        .show(ui, |plot_ui| {
            for chart in bars_by_market(bars, markets) {
                plot_ui.bar_chart(chart);
            }
        });
}

fn location_bars(ui: &mut Ui, id: &str, totals: &[LabelTotal]) {
    if totals.is_empty() {
        return no_data(ui);
    }
    let (lo, hi) = totals
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
            (lo.min(t.total_usd), hi.max(t.total_usd))
        });
    let bars: Vec<Bar> = totals
        .iter()
        .enumerate()
        .map(|(i, t)| {
            Bar::new(i as f64, t.total_usd)
                .name(&t.label)
                .fill(sequential(normalized(t.total_usd, lo, hi)))
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .y_axis_label("Total Funding (USD)")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Total Funding (USD)"));
        });
}

/// One `BarChart` per market so the legend lists markets; bars keep their
/// own x positions.
fn bars_by_market(bars: Vec<(String, Bar)>, markets: &ColorMap) -> Vec<BarChart> {
    let mut groups: Vec<(String, Vec<Bar>)> = Vec::new();
    for (market, bar) in bars {
        match groups.iter_mut().find(|(m, _)| *m == market) {
            Some((_, group)) => group.push(bar),
            None => groups.push((market, vec![bar])),
        }
    }
    groups
        .into_iter()
        .map(|(market, group)| {
            BarChart::new(group)
                .color(markets.color_for(&market))
                .name(market)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_year_starts_at_january_first() {
        let jan = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let jul = NaiveDate::from_ymd_opt(2010, 7, 2).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(decimal_year(&jan), 2010.0);
        assert!((decimal_year(&jul) - 2010.5).abs() < 0.01);
    }

    #[test]
    fn pie_slice_starts_at_centre() {
        let pts = pie_slice(0.0, std::f64::consts::PI);
        assert_eq!(pts[0], [0.0, 0.0]);
        assert!((pts[1][0] - 1.0).abs() < 1e-9);
        assert!((pts[pts.len() - 1][0] + 1.0).abs() < 1e-9);
    }
}
