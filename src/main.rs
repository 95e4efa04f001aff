use std::path::Path;

use eframe::egui;
use funding_lens::app::FundingLensApp;
use funding_lens::config::{CONFIG_FILE, DashboardConfig};

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Funding Lens – Investment Data Analysis",
        options,
        Box::new(|_cc| Ok(Box::new(FundingLensApp::new(config)))),
    )
}
