use eframe::egui::{self, RichText, Ui};

use crate::analysis::dispatch::{MultivariateMethod, NumericView};
use crate::analysis::metrics::{display, map_points};
use crate::content::{self, Section};
use crate::data::model::ColumnKind;
use crate::error::Result;
use crate::state::AppState;
use crate::ui::{charts, table};

// ---------------------------------------------------------------------------
// Shared widgets
// ---------------------------------------------------------------------------

fn metric_card(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(RichText::new(label).weak());
            ui.label(RichText::new(value).size(24.0).strong());
        });
    });
}

fn insight_line<T: std::fmt::Display>(ui: &mut Ui, label: &str, value: &Result<T>) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(label);
        match value {
            Ok(v) => {
                ui.label(v.to_string());
            }
            Err(err) => charts::show_message(ui, err),
        }
    });
}

fn sections(ui: &mut Ui, sections: &[Section]) {
    for section in sections {
        ui.add_space(6.0);
        ui.heading(section.title);
        for point in section.points {
            ui.label(format!("• {point}"));
        }
    }
}

/// Combo box over `options`; returns the new choice when it changed.
fn column_picker(ui: &mut Ui, id: &str, label: &str, current: &str, options: &[String]) -> Option<String> {
    let mut choice = current.to_string();
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(&choice)
            .show_ui(ui, |ui: &mut Ui| {
                for name in options {
                    ui.selectable_value(&mut choice, name.clone(), name);
                }
            });
    });
    (choice != current).then_some(choice)
}

// ---------------------------------------------------------------------------
// Introduction
// ---------------------------------------------------------------------------

pub fn introduction(ui: &mut Ui, state: &mut AppState) {
    ui.heading(RichText::new(content::APP_TITLE).size(28.0));
    ui.add_space(4.0);
    ui.strong("Why this project?");
    ui.label(content::INTRODUCTION);
    ui.add_space(8.0);

    let overview = &state.overview;
    ui.columns(4, |cols| {
        metric_card(&mut cols[0], "Total Cars", overview.total_cars.to_string());
        metric_card(&mut cols[1], "Average Price", display(&overview.average_price));
        metric_card(&mut cols[2], "Average KM", display(&overview.average_km));
        metric_card(&mut cols[3], "Total Companies", display(&overview.total_companies));
    });

    let preview = state.config.preview_rows;

    ui.add_space(8.0);
    ui.heading("Raw Dataset");
    table::data_table(ui, "raw_table", &state.raw, preview);

    ui.add_space(8.0);
    ui.heading("Cleaned Dataset");
    table::data_table(ui, "cleaned_table", &state.cleaned, preview);

    ui.add_space(8.0);
    ui.heading("Location Map");
    match map_points(&state.cleaned) {
        Some(points) => charts::location_map(ui, "location_map", &points),
        None => {
            ui.label(RichText::new("ℹ Latitude and Longitude not available").italics());
        }
    }
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

pub fn analysis(ui: &mut Ui, state: &mut AppState) {
    ui.heading(RichText::new("Exploratory Analysis Studio").size(28.0));
    ui.add_space(8.0);

    let selection = &state.selection;
    ui.columns(3, |cols| {
        metric_card(&mut cols[0], "Selected Cars", selection.selected_cars.to_string());
        metric_card(&mut cols[1], "Average Price", display(&selection.average_price));
        metric_card(&mut cols[2], "Average Power", display(&selection.average_power));
    });

    let columns = state.view.column_names();

    // ---- Univariate ----
    ui.add_space(12.0);
    ui.heading("Univariate Analysis");
    let current = state.univariate_column.clone().unwrap_or_default();
    if let Some(choice) = column_picker(ui, "univariate_column", "Choose Column", &current, &columns) {
        state.set_univariate_column(choice);
    }
    if let Some(column) = state.univariate_column.clone() {
        if state.view.kind_of(&column) == Some(ColumnKind::Numeric) {
            let mut view = state.numeric_view;
            ui.horizontal(|ui: &mut Ui| {
                ui.label("View Type");
                for option in NumericView::ALL {
                    ui.radio_value(&mut view, option, option.label());
                }
            });
            if view != state.numeric_view {
                state.set_numeric_view(view);
            }
        }
    }
    if let Some(result) = state.univariate_chart() {
        charts::show_result(ui, "univariate_chart", result);
    }

    // ---- Bivariate ----
    ui.add_space(12.0);
    ui.heading("Bivariate Analysis");
    let x = state.bivariate_x.clone().unwrap_or_default();
    let y = state.bivariate_y.clone().unwrap_or_default();
    let mut new_x = None;
    let mut new_y = None;
    ui.columns(2, |cols| {
        new_x = column_picker(&mut cols[0], "bivariate_x", "X Axis", &x, &columns);
        new_y = column_picker(&mut cols[1], "bivariate_y", "Y Axis", &y, &columns);
    });
    if new_x.is_some() || new_y.is_some() {
        state.set_bivariate(new_x.unwrap_or(x), new_y.unwrap_or(y));
    }
    if let Some(result) = state.bivariate_chart() {
        charts::show_result(ui, "bivariate_chart", result);
    }

    // ---- Multivariate ----
    ui.add_space(12.0);
    ui.heading("Multivariate Analysis");
    let mut method = state.multivariate;
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Method");
        egui::ComboBox::from_id_salt("multivariate_method")
            .selected_text(method.label())
            .show_ui(ui, |ui: &mut Ui| {
                for option in MultivariateMethod::ALL {
                    ui.selectable_value(&mut method, option, option.label());
                }
            });
    });
    if method != state.multivariate {
        state.set_multivariate(method);
    }
    charts::show_result(ui, "multivariate_chart", state.multivariate_chart());
}

// ---------------------------------------------------------------------------
// Conclusions
// ---------------------------------------------------------------------------

pub fn conclusions(ui: &mut Ui, state: &mut AppState) {
    ui.heading(RichText::new("Automated Insights").size(28.0));
    ui.add_space(8.0);

    let insights = &state.insights;
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Total Records:");
        ui.label(insights.total_records.to_string());
    });
    insight_line(ui, "Highest Price Car:", &insights.highest_price_company);
    insight_line(ui, "Most Common Fuel:", &insights.most_common_fuel);
    insight_line(
        ui,
        "Strongest Correlation with Price:",
        &insights.strongest_price_correlation,
    );

    ui.add_space(8.0);
    ui.separator();
    ui.heading("Frequently Asked Questions");
    egui::CollapsingHeader::new("Click to view FAQ")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let index = state.faq_index.min(content::FAQ.len() - 1);
            let mut chosen = index;
            egui::ComboBox::from_id_salt("faq_question")
                .selected_text(content::FAQ[index].0)
                .width(ui.available_width().min(560.0))
                .show_ui(ui, |ui: &mut Ui| {
                    for (i, (question, _)) in content::FAQ.iter().enumerate() {
                        ui.selectable_value(&mut chosen, i, *question);
                    }
                });
            state.faq_index = chosen;
            ui.add_space(4.0);
            ui.strong("Answer:");
            ui.label(content::FAQ[chosen].1);
        });

    ui.add_space(8.0);
    sections(ui, content::FINDINGS);
    ui.add_space(8.0);
    ui.separator();
    ui.heading(RichText::new("Strategic Recommendations").size(24.0));
    sections(ui, content::RECOMMENDATIONS);
}
