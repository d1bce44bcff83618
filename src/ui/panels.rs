use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, Page};

// ---------------------------------------------------------------------------
// Left side panel – navigation and filter widgets
// ---------------------------------------------------------------------------

/// Render the left panel: page selector, then filters on the Analysis page.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Navigation");
    ui.separator();
    for page in Page::ALL {
        ui.radio_value(&mut state.page, page, page.label());
    }
    ui.add_space(8.0);

    if state.page != Page::Analysis {
        return;
    }

    ui.heading("Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            category_filter(ui, state);
            ui.separator();
            range_filter(ui, state);
        });
}

/// Multi-select over the category column, all values selected by default.
fn category_filter(ui: &mut Ui, state: &mut AppState) {
    let Some(pred) = &state.filter.category else {
        ui.colored_label(
            Color32::from_rgb(230, 160, 40),
            format!("⚠ Column '{}' not found", state.config.category_column),
        );
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let column = pred.column.clone();
    let accepted = pred.accepted.clone();
    let options = state.category_options.clone();

    let n_selected = options.iter().filter(|v| accepted.contains(v)).count();
    let header_text = format!("Select {column}  ({n_selected}/{})", options.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt("category_filter")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_categories();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_categories();
                }
            });

            for value in &options {
                let mut checked = accepted.contains(value);
                if ui.checkbox(&mut checked, value.to_string()).changed() {
                    state.toggle_category(value);
                }
            }
        });
}

/// Inclusive range sliders over the range column.
fn range_filter(ui: &mut Ui, state: &mut AppState) {
    let Some(range) = &state.filter.range else {
        ui.colored_label(
            Color32::from_rgb(230, 160, 40),
            format!("⚠ Column '{}' not found", state.config.range_column),
        );
        return;
    };

    let (min, max) = (range.min, range.max);
    let mut low = range.low;
    let mut high = range.high;
    let integral = min.fract() == 0.0 && max.fract() == 0.0;

    ui.strong(format!("Select {} range", range.column));
    let mut changed = false;
    let mut from = egui::Slider::new(&mut low, min..=max).text("From");
    let mut to = egui::Slider::new(&mut high, min..=max).text("To");
    if integral {
        from = from.integer();
        to = to.integer();
    }
    changed |= ui.add(from).changed();
    changed |= ui.add(to).changed();

    if changed {
        state.set_range(low, high);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open raw dataset…").clicked() {
                if let Some(path) = pick_file("Open raw dataset") {
                    state.open_raw(&path);
                }
                ui.close_menu();
            }
            if ui.button("Open cleaned dataset…").clicked() {
                if let Some(path) = pick_file("Open cleaned dataset") {
                    state.open_cleaned(&path);
                }
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Reload from disk").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} cars loaded, {} in view",
            state.cleaned.len(),
            state.view.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

fn pick_file(title: &str) -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file()
}
