use std::ops::RangeInclusive;

use eframe::egui::{self, Align2, Color32, FontId, RichText, Sense, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoints, Points,
};

use crate::analysis::dispatch::{CategoryBox, ChartSpec, GroupedCounts, GroupedMeans, Pairplot};
use crate::analysis::stats::{BoxStats, CorrelationMatrix, Histogram};
use crate::color::{ColorMap, contrasting_text, diverging};
use crate::error::{DashboardError, Result};

const CHART_HEIGHT: f32 = 320.0;
const PAIR_CELL: f32 = 130.0;
const BAR_COLOR: Color32 = Color32::from_rgb(76, 114, 176);
const CURVE_COLOR: Color32 = Color32::from_rgb(221, 132, 82);
const WARNING_COLOR: Color32 = Color32::from_rgb(230, 160, 40);

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Draw a dispatched chart, or the message explaining why there is none.
pub fn show_result(ui: &mut Ui, id: &str, result: &Result<ChartSpec>) {
    match result {
        Ok(spec) => show_chart(ui, id, spec),
        Err(err) => show_message(ui, err),
    }
}

/// Inline message for a chart or metric that could not be produced.
pub fn show_message(ui: &mut Ui, err: &DashboardError) {
    if err.is_informational() {
        ui.label(RichText::new(format!("ℹ {err}")).italics());
    } else {
        ui.colored_label(WARNING_COLOR, format!("⚠ {err}"));
    }
}

pub fn show_chart(ui: &mut Ui, id: &str, spec: &ChartSpec) {
    match spec {
        ChartSpec::Count { column, counts } => count_plot(ui, id, column, counts),
        ChartSpec::Histogram {
            column,
            histogram,
            overlay,
        } => histogram_plot(ui, id, column, histogram, overlay.as_deref()),
        ChartSpec::Kde { column, curve } => kde_plot(ui, id, column, curve),
        ChartSpec::Box { column, stats } => single_box_plot(ui, id, column, stats),
        ChartSpec::Scatter {
            x,
            y,
            points,
            correlation,
        } => scatter_plot(ui, id, x, y, points, *correlation),
        ChartSpec::GroupedBox {
            category_column,
            value_column,
            boxes,
        } => grouped_box_plot(ui, id, category_column, value_column, boxes),
        ChartSpec::GroupedCount { x, hue, counts } => grouped_count_plot(ui, id, x, hue, counts),
        ChartSpec::Heatmap(matrix) => heatmap(ui, id, matrix),
        ChartSpec::Pairplot(pairs) => pairplot(ui, id, pairs),
        ChartSpec::GroupedBar {
            category_column,
            value_column,
            hue_column,
            means,
        } => grouped_bar_plot(ui, id, category_column, value_column, hue_column.as_deref(), means),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Axis labels for integer category positions.
fn category_formatter(
    labels: Vec<String>,
) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String + 'static {
    move |mark, _range| {
        let pos = mark.value.round();
        if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
            return String::new();
        }
        labels.get(pos as usize).cloned().unwrap_or_default()
    }
}

fn base_plot(id: &str) -> Plot {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .allow_scroll(false)
}

fn histogram_bars(histogram: &Histogram, color: Color32) -> BarChart {
    let bars = histogram
        .counts
        .iter()
        .enumerate()
        .map(|(i, &count)| Bar::new(histogram.center(i), count as f64).width(histogram.bin_width))
        .collect();
    BarChart::new(bars).color(color)
}

fn box_elem(argument: f64, stats: &BoxStats) -> BoxElem {
    BoxElem::new(
        argument,
        BoxSpread::new(
            stats.lower_whisker,
            stats.q1,
            stats.median,
            stats.q3,
            stats.upper_whisker,
        ),
    )
    .box_width(0.5)
    .whisker_width(0.3)
}

/// `%g`-style number: `precision` significant digits, trailing zeros
/// dropped, scientific notation for very small or large magnitudes.
fn format_general(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let precision = precision.max(1);
    let sci = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_zeros(mantissa), exponent.abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

// ---------------------------------------------------------------------------
// Univariate
// ---------------------------------------------------------------------------

/// Horizontal bars, first category on top.
fn count_plot(ui: &mut Ui, id: &str, column: &str, counts: &[(String, usize)]) {
    let n = counts.len();
    let bars = counts
        .iter()
        .enumerate()
        .map(|(i, (label, count))| {
            Bar::new((n - 1 - i) as f64, *count as f64)
                .name(label)
                .width(0.8)
        })
        .collect();
    let labels: Vec<String> = counts.iter().rev().map(|(l, _)| l.clone()).collect();

    base_plot(id)
        .height((n as f32 * 22.0).clamp(CHART_HEIGHT * 0.5, CHART_HEIGHT * 3.0))
        .x_axis_label("count")
        .y_axis_label(column)
        .y_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().color(BAR_COLOR));
        });
}

fn histogram_plot(
    ui: &mut Ui,
    id: &str,
    column: &str,
    histogram: &Histogram,
    overlay: Option<&[[f64; 2]]>,
) {
    base_plot(id)
        .x_axis_label(column)
        .y_axis_label("count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(histogram_bars(histogram, BAR_COLOR).name(column));
            if let Some(curve) = overlay {
                let points: PlotPoints = curve.iter().copied().collect();
                plot_ui.line(Line::new(points).color(CURVE_COLOR).width(2.0).name("density"));
            }
        });
}

fn kde_plot(ui: &mut Ui, id: &str, column: &str, curve: &[[f64; 2]]) {
    let points: PlotPoints = curve.iter().copied().collect();
    base_plot(id)
        .x_axis_label(column)
        .y_axis_label("density")
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .color(BAR_COLOR)
                    .fill(0.0)
                    .width(2.0)
                    .name(column),
            );
        });
}

fn single_box_plot(ui: &mut Ui, id: &str, column: &str, stats: &BoxStats) {
    let outliers: PlotPoints = stats.outliers.iter().map(|&v| [v, 0.0]).collect();
    base_plot(id)
        .height(CHART_HEIGHT * 0.6)
        .x_axis_label(column)
        .show_axes([true, false])
        .show(ui, |plot_ui| {
            plot_ui.box_plot(
                BoxPlot::new(vec![box_elem(0.0, stats).name(column)])
                    .horizontal()
                    .color(BAR_COLOR),
            );
            plot_ui.points(Points::new(outliers).radius(3.0).color(Color32::GRAY));
        });
}

// ---------------------------------------------------------------------------
// Bivariate
// ---------------------------------------------------------------------------

fn scatter_plot(
    ui: &mut Ui,
    id: &str,
    x: &str,
    y: &str,
    points: &[[f64; 2]],
    correlation: Option<f64>,
) {
    match correlation {
        Some(r) => ui.strong(format!("Correlation: {r:.3}")),
        None => ui.strong("Correlation: n/a"),
    };
    let series: PlotPoints = points.iter().copied().collect();
    base_plot(id)
        .x_axis_label(x)
        .y_axis_label(y)
        .show(ui, |plot_ui| {
            plot_ui.points(Points::new(series).radius(2.5).color(BAR_COLOR));
        });
}

/// Vertical boxes, one per category, in order of appearance.
fn grouped_box_plot(
    ui: &mut Ui,
    id: &str,
    category_column: &str,
    value_column: &str,
    boxes: &[CategoryBox],
) {
    let labels: Vec<String> = boxes.iter().map(|b| b.label.clone()).collect();
    let colors = ColorMap::new(&labels);
    let outliers: PlotPoints = boxes
        .iter()
        .enumerate()
        .flat_map(|(i, b)| b.stats.outliers.iter().map(move |&v| [i as f64, v]))
        .collect();

    base_plot(id)
        .x_axis_label(category_column)
        .y_axis_label(value_column)
        .x_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            for (i, b) in boxes.iter().enumerate() {
                plot_ui.box_plot(
                    BoxPlot::new(vec![box_elem(i as f64, &b.stats).name(&b.label)])
                        .color(colors.color_for(&b.label))
                        .name(&b.label),
                );
            }
            plot_ui.points(Points::new(outliers).radius(2.5).color(Color32::GRAY));
        });
}

/// Bars side by side within each category, one colour per group.
fn grouped_bars(
    ui: &mut Ui,
    id: &str,
    x_label: &str,
    y_label: &str,
    categories: &[String],
    groups: &[String],
    value: impl Fn(usize, usize) -> Option<f64>,
) {
    let colors = ColorMap::new(groups);
    let n_groups = groups.len().max(1);
    let width = 0.8 / n_groups as f64;

    base_plot(id)
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .x_axis_formatter(category_formatter(categories.to_vec()))
        .show(ui, |plot_ui| {
            for (g, group) in groups.iter().enumerate() {
                let offset = -0.4 + width * (g as f64 + 0.5);
                let bars = (0..categories.len())
                    .filter_map(|c| {
                        let v = value(g, c)?;
                        Some(
                            Bar::new(c as f64 + offset, v)
                                .width(width * 0.95)
                                .name(format!("{} / {group}", categories[c])),
                        )
                    })
                    .collect();
                let color = if group.is_empty() {
                    BAR_COLOR
                } else {
                    colors.color_for(group)
                };
                plot_ui.bar_chart(BarChart::new(bars).color(color).name(group));
            }
        });
}

fn grouped_count_plot(ui: &mut Ui, id: &str, x: &str, hue: &str, counts: &GroupedCounts) {
    ui.label(format!("Grouped by {hue}"));
    grouped_bars(ui, id, x, "count", &counts.categories, &counts.groups, |g, c| {
        Some(counts.counts[g][c] as f64)
    });
}

fn grouped_bar_plot(
    ui: &mut Ui,
    id: &str,
    category_column: &str,
    value_column: &str,
    hue_column: Option<&str>,
    means: &GroupedMeans,
) {
    if let Some(hue) = hue_column {
        ui.label(format!("Mean {value_column} by {category_column}, grouped by {hue}"));
    } else {
        ui.label(format!("Mean {value_column} by {category_column}"));
    }
    grouped_bars(
        ui,
        id,
        category_column,
        value_column,
        &means.categories,
        &means.groups,
        |g, c| means.means[g][c],
    );
}

// ---------------------------------------------------------------------------
// Multivariate
// ---------------------------------------------------------------------------

/// Annotated correlation matrix.
fn heatmap(ui: &mut Ui, id: &str, matrix: &CorrelationMatrix) {
    let cell = egui::vec2(72.0, 30.0);
    egui::ScrollArea::horizontal().id_salt(id).show(ui, |ui: &mut Ui| {
        egui::Grid::new(format!("{id}_grid")).spacing([2.0, 2.0]).show(ui, |ui: &mut Ui| {
            ui.label("");
            for name in &matrix.names {
                ui.label(RichText::new(name).small().strong());
            }
            ui.end_row();

            for (i, row_name) in matrix.names.iter().enumerate() {
                ui.label(RichText::new(row_name).small().strong());
                for (j, value) in matrix.values[i].iter().enumerate() {
                    let (rect, response) = ui.allocate_exact_size(cell, Sense::hover());
                    let fill = value.map(diverging).unwrap_or(Color32::DARK_GRAY);
                    let text = value
                        .map(|v| format_general(v, 2))
                        .unwrap_or_else(|| "nan".to_string());
                    ui.painter().rect_filled(rect, 0.0, fill);
                    ui.painter().text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        text,
                        FontId::proportional(13.0),
                        contrasting_text(fill),
                    );
                    response.on_hover_text(format!("{row_name} × {}", matrix.names[j]));
                }
                ui.end_row();
            }
        });
    });
}

/// Grid of small plots: histograms on the diagonal, scatter elsewhere.
fn pairplot(ui: &mut Ui, id: &str, pairs: &Pairplot) {
    egui::ScrollArea::both().id_salt(id).show(ui, |ui: &mut Ui| {
        egui::Grid::new(format!("{id}_grid")).spacing([4.0, 4.0]).show(ui, |ui: &mut Ui| {
            ui.label("");
            for name in &pairs.names {
                ui.label(RichText::new(name).small().strong());
            }
            ui.end_row();

            for (i, row_name) in pairs.names.iter().enumerate() {
                ui.label(RichText::new(row_name).small().strong());
                for j in 0..pairs.names.len() {
                    Plot::new(format!("{id}_{i}_{j}"))
                        .width(PAIR_CELL)
                        .height(PAIR_CELL)
                        .show_axes(false)
                        .allow_drag(false)
                        .allow_zoom(false)
                        .allow_scroll(false)
                        .allow_boxed_zoom(false)
                        .show(ui, |plot_ui| {
                            if i == j {
                                if let Some(h) = &pairs.histograms[i] {
                                    plot_ui.bar_chart(histogram_bars(h, BAR_COLOR));
                                }
                            } else {
                                let series: PlotPoints =
                                    pairs.points[i][j].iter().copied().collect();
                                plot_ui.points(Points::new(series).radius(1.5).color(BAR_COLOR));
                            }
                        });
                }
                ui.end_row();
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

/// Listing locations as a longitude / latitude scatter.
pub fn location_map(ui: &mut Ui, id: &str, points: &[[f64; 2]]) {
    let series: PlotPoints = points.iter().copied().collect();
    base_plot(id)
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(series)
                    .radius(3.0)
                    .color(Color32::from_rgb(255, 75, 75))
                    .name("listings"),
            );
        });
}
