use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::controls::{CategoryOption, MultiSelect, YearRange, option_label};
use crate::data::record::REQUIRED_COLUMNS;
use crate::metrics::kpi::Kpis;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(controls) = state.controls.as_mut() else {
        ui.label("No dataset loaded.");
        return;
    };

    let mut changed = false;
    let mut reset = false;
    let mut reference_date = state.config.reference_date;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            changed |= multiselect(ui, &mut controls.country);
            ui.separator();
            changed |= multiselect(ui, &mut controls.sector);
            ui.separator();
            changed |= multiselect(ui, &mut controls.status);
            ui.separator();

            ui.strong("Select Year Range");
            match controls.years.as_mut() {
                Some(years) => changed |= year_range(ui, years),
                None => {
                    ui.label("No valid founding years in this dataset.");
                }
            }
            ui.separator();

            ui.strong("Recent funding reference date");
            ui.add(DatePickerButton::new(&mut reference_date).id_salt("reference_date"));
            ui.separator();

            if ui.button("Reset filters").clicked() {
                reset = true;
            }
        });

    // Recompute the view after any control change.
    if reset {
        state.reset_filters();
    } else if changed {
        state.refresh();
    }
    state.set_reference_date(reference_date);
}

/// The multiselect-with-select-all control: a collapsible chooser followed by
/// a "Select all" checkbox. Returns whether anything changed.
fn multiselect(ui: &mut Ui, control: &mut MultiSelect<CategoryOption>) -> bool {
    let mut changed = false;
    let label = control.label.clone();
    let options: Vec<CategoryOption> = control.options().to_vec();

    let header_text = format!("{label}  ({})", chooser_summary(control));
    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(&label)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            if ui.small_button("Clear").clicked() {
                control.clear_chosen();
                changed = true;
            }
            ScrollArea::vertical()
                .id_salt(format!("{label}_options"))
                .max_height(220.0)
                .show(ui, |ui: &mut Ui| {
                    for opt in &options {
                        let mut checked = control.is_chosen(opt);
                        if ui.checkbox(&mut checked, option_label(opt)).changed() {
                            control.set_chosen(opt, checked);
                            changed = true;
                        }
                    }
                });
        });

    let mut select_all = control.select_all();
    if ui.checkbox(&mut select_all, "Select all").changed() {
        control.set_select_all(select_all);
        changed = true;
    }
    changed
}

/// `all` while select-all is on, `chosen/total` otherwise.
fn chooser_summary(control: &MultiSelect<CategoryOption>) -> String {
    if control.select_all() {
        "all".to_string()
    } else {
        format!("{}/{}", control.chosen().len(), control.options().len())
    }
}

fn year_range(ui: &mut Ui, years: &mut YearRange) -> bool {
    let (mut from, mut to) = (years.from(), years.to());
    let bounds = years.min..=years.max;
    let from_changed = ui
        .add(egui::Slider::new(&mut from, bounds.clone()).text("From"))
        .changed();
    let to_changed = ui
        .add(egui::Slider::new(&mut to, bounds).text("To"))
        .changed();
    if from_changed || to_changed {
        years.set(from, to);
        return true;
    }
    false
}

// ---------------------------------------------------------------------------
// KPI tiles
// ---------------------------------------------------------------------------

/// Four summary tiles in one row.
pub fn kpi_tiles(ui: &mut Ui, kpis: &Kpis) {
    ui.columns(4, |cols| {
        metric(&mut cols[0], "Total Funding (in Millions)", kpis.total_label());
        metric(&mut cols[1], "Total Sectors", kpis.sector_count.to_string());
        metric(&mut cols[2], "Total Companies", kpis.company_count.to_string());
        metric(&mut cols[3], "Average Funding (in Millions)", kpis.average_label());
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(label);
        ui.label(RichText::new(value).size(26.0).strong());
    });
}

/// Placeholder for the central panel before a dataset is loaded.
pub fn empty_state(ui: &mut Ui) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(40.0);
        ui.heading("Open a file to view investments  (File → Open…)");
        ui.add_space(8.0);
        ui.label("Expected columns:");
        ui.monospace(REQUIRED_COLUMNS.join(", "));
        ui.label("Optional: region");
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                if let Some(path) = state.source.clone() {
                    state.open(&path);
                }
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(view) = &state.view {
            ui.label(format!(
                "{} records loaded, {} visible",
                view.total_rows, view.visible_rows
            ));
        }
        if let Some(path) = &state.source {
            ui.separator();
            ui.label(RichText::new(path.display().to_string()).weak());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open investment data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chooser_summary_reflects_select_all() {
        let mut control = MultiSelect::new(
            "Select Country",
            vec![Some("USA".to_string()), Some("GBR".to_string()), None],
        );
        assert_eq!(chooser_summary(&control), "all");

        control.set_select_all(false);
        control.set_chosen(&Some("GBR".to_string()), true);
        assert_eq!(chooser_summary(&control), "1/3");
    }
}
