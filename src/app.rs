use eframe::egui::{self, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FundingLensApp {
    pub state: AppState,
}

impl FundingLensApp {
    /// Build the app and open the configured dataset, if it exists.
    pub fn new(config: DashboardConfig) -> Self {
        let data_path = config.data_path.clone();
        let mut state = AppState::new(config);
        if data_path.exists() {
            state.open(&data_path);
        } else {
            log::warn!("Dataset {} not found; use File → Open", data_path.display());
        }
        Self { state }
    }
}

impl eframe::App for FundingLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(view) = &self.state.view else {
                panels::empty_state(ui);
                return;
            };
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.vertical_centered(|ui: &mut Ui| {
                        ui.heading("Investment Data Analysis");
                    });
                    ui.separator();
                    panels::kpi_tiles(ui, &view.kpis);
                    charts::chart_panels(ui, view, &self.state.market_colors, &self.state.config);
                });
        });
    }
}
