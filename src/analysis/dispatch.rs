use std::collections::HashMap;
use std::fmt;

use crate::analysis::stats::{
    self, BoxStats, CorrelationMatrix, Histogram, KDE_CUT, complete_pairs, correlation_matrix,
    labels_in_order,
};
use crate::data::model::columns::{FUEL_TYPE, PRICE, TRANSMISSION};
use crate::data::model::{ColumnKind, DataTable};
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// User choices
// ---------------------------------------------------------------------------

/// How a numeric column is drawn in the univariate section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericView {
    #[default]
    Histogram,
    Kde,
    Boxplot,
}

impl NumericView {
    pub const ALL: [NumericView; 3] = [NumericView::Histogram, NumericView::Kde, NumericView::Boxplot];

    pub fn label(self) -> &'static str {
        match self {
            NumericView::Histogram => "Histogram",
            NumericView::Kde => "KDE",
            NumericView::Boxplot => "Boxplot",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MultivariateMethod {
    #[default]
    Heatmap,
    Pairplot,
    GroupedBar,
}

impl MultivariateMethod {
    pub const ALL: [MultivariateMethod; 3] = [
        MultivariateMethod::Heatmap,
        MultivariateMethod::Pairplot,
        MultivariateMethod::GroupedBar,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MultivariateMethod::Heatmap => "Heatmap",
            MultivariateMethod::Pairplot => "Pairplot",
            MultivariateMethod::GroupedBar => "Grouped Bar",
        }
    }
}

// ---------------------------------------------------------------------------
// Chart data
// ---------------------------------------------------------------------------

/// Box statistics for one category of a grouped box plot.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBox {
    pub label: String,
    pub stats: BoxStats,
}

/// Counts of `categories` split by `groups`; `counts[group][category]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedCounts {
    pub categories: Vec<String>,
    pub groups: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

/// Mean value per category and group; `means[group][category]`.
/// Without a grouping column there is a single unnamed group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedMeans {
    pub categories: Vec<String>,
    pub groups: Vec<String>,
    pub means: Vec<Vec<Option<f64>>>,
}

/// Pairwise grid: histograms on the diagonal, scatter elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Pairplot {
    pub names: Vec<String>,
    pub histograms: Vec<Option<Histogram>>,
    /// `points[i][j]` has x from `names[j]` and y from `names[i]`; empty on
    /// the diagonal.
    pub points: Vec<Vec<Vec<[f64; 2]>>>,
}

/// A chart ready to be drawn.  Computed from the data alone; the UI only
/// maps it onto plot primitives.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    Count {
        column: String,
        counts: Vec<(String, usize)>,
    },
    Histogram {
        column: String,
        histogram: Histogram,
        /// Density overlay scaled to bin counts.
        overlay: Option<Vec<[f64; 2]>>,
    },
    Kde {
        column: String,
        curve: Vec<[f64; 2]>,
    },
    Box {
        column: String,
        stats: BoxStats,
    },
    Scatter {
        x: String,
        y: String,
        points: Vec<[f64; 2]>,
        /// Pearson r rounded to three decimals.
        correlation: Option<f64>,
    },
    GroupedBox {
        category_column: String,
        value_column: String,
        boxes: Vec<CategoryBox>,
    },
    GroupedCount {
        x: String,
        hue: String,
        counts: GroupedCounts,
    },
    Heatmap(CorrelationMatrix),
    Pairplot(Pairplot),
    GroupedBar {
        category_column: String,
        value_column: String,
        hue_column: Option<String>,
        means: GroupedMeans,
    },
}

impl ChartSpec {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ChartSpec::Count { .. } => "count",
            ChartSpec::Histogram { .. } => "histogram",
            ChartSpec::Kde { .. } => "kde",
            ChartSpec::Box { .. } => "box",
            ChartSpec::Scatter { .. } => "scatter",
            ChartSpec::GroupedBox { .. } => "grouped box",
            ChartSpec::GroupedCount { .. } => "grouped count",
            ChartSpec::Heatmap(_) => "heatmap",
            ChartSpec::Pairplot(_) => "pairplot",
            ChartSpec::GroupedBar { .. } => "grouped bar",
        }
    }
}

impl fmt::Display for ChartSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartSpec::Count { column, .. }
            | ChartSpec::Histogram { column, .. }
            | ChartSpec::Kde { column, .. }
            | ChartSpec::Box { column, .. } => write!(f, "{} of {column}", self.kind_name()),
            ChartSpec::Scatter { x, y, .. } => write!(f, "scatter of {y} vs {x}"),
            ChartSpec::GroupedBox {
                category_column,
                value_column,
                ..
            } => write!(f, "{value_column} by {category_column}"),
            ChartSpec::GroupedCount { x, hue, .. } => write!(f, "count of {x} by {hue}"),
            ChartSpec::Heatmap(m) => write!(f, "correlation heatmap ({} columns)", m.names.len()),
            ChartSpec::Pairplot(p) => write!(f, "pairplot ({} columns)", p.names.len()),
            ChartSpec::GroupedBar {
                category_column,
                value_column,
                ..
            } => write!(f, "mean {value_column} by {category_column}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

fn require(table: &DataTable, chart: &str, columns: &[&str]) -> Result<()> {
    match DashboardError::missing(chart, columns, &table.column_names()) {
        Some(err) => {
            log::warn!("{err}");
            Err(err)
        }
        None => Ok(()),
    }
}

fn require_rows(table: &DataTable) -> Result<()> {
    if table.is_empty() {
        Err(DashboardError::EmptySelection)
    } else {
        Ok(())
    }
}

/// Numeric values of a column known to exist.
fn numbers(table: &DataTable, column: &str) -> Vec<f64> {
    table
        .column(column)
        .map(|c| c.numeric_values())
        .unwrap_or_default()
}

/// Chart for a single column: a count plot for categorical columns, and
/// the chosen [`NumericView`] for numeric ones.
pub fn univariate(table: &DataTable, column: &str, view: NumericView) -> Result<ChartSpec> {
    require(table, "Univariate", &[column])?;
    require_rows(table)?;

    let Some(col) = table.column(column) else {
        return Err(DashboardError::EmptySelection);
    };

    if col.kind == ColumnKind::Categorical {
        return Ok(ChartSpec::Count {
            column: column.to_string(),
            counts: stats::value_counts(&col.values),
        });
    }

    let values = col.numeric_values();
    if values.is_empty() {
        return Err(DashboardError::unplottable(column, "no values to plot"));
    }

    match view {
        NumericView::Histogram => {
            let histogram = stats::histogram(&values)
                .ok_or_else(|| DashboardError::unplottable(column, "no values to plot"))?;
            let scale = values.len() as f64 * histogram.bin_width;
            let overlay = stats::kde(&values, 0.0)
                .map(|curve| curve.into_iter().map(|[x, d]| [x, d * scale]).collect());
            Ok(ChartSpec::Histogram {
                column: column.to_string(),
                histogram,
                overlay,
            })
        }
        NumericView::Kde => {
            let curve = stats::kde(&values, KDE_CUT).ok_or_else(|| {
                DashboardError::unplottable(column, "too little variation for a density estimate")
            })?;
            Ok(ChartSpec::Kde {
                column: column.to_string(),
                curve,
            })
        }
        NumericView::Boxplot => {
            let stats = stats::box_stats(&values)
                .ok_or_else(|| DashboardError::unplottable(column, "no values to plot"))?;
            Ok(ChartSpec::Box {
                column: column.to_string(),
                stats,
            })
        }
    }
}

/// Chart for a pair of columns, chosen by the two column kinds.
pub fn bivariate(table: &DataTable, x: &str, y: &str) -> Result<ChartSpec> {
    require(table, "Bivariate", &[x, y])?;
    require_rows(table)?;

    let (Some(xc), Some(yc)) = (table.column(x), table.column(y)) else {
        return Err(DashboardError::EmptySelection);
    };

    let spec = match (xc.kind, yc.kind) {
        (ColumnKind::Numeric, ColumnKind::Numeric) => {
            let (xs, ys) = complete_pairs(&xc.values, &yc.values);
            let correlation = stats::pearson_f64(&xs, &ys).map(|r| stats::round_to(r, 3));
            ChartSpec::Scatter {
                x: x.to_string(),
                y: y.to_string(),
                points: xs.into_iter().zip(ys).map(|(a, b)| [a, b]).collect(),
                correlation,
            }
        }
        (ColumnKind::Numeric, ColumnKind::Categorical) => grouped_box(table, y, x),
        (ColumnKind::Categorical, ColumnKind::Numeric) => grouped_box(table, x, y),
        (ColumnKind::Categorical, ColumnKind::Categorical) => ChartSpec::GroupedCount {
            x: x.to_string(),
            hue: y.to_string(),
            counts: grouped_counts(table, x, y),
        },
    };
    log::debug!("Bivariate dispatch: {spec}");
    Ok(spec)
}

fn grouped_box(table: &DataTable, category: &str, value: &str) -> ChartSpec {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<f64>> = HashMap::new();
    if let (Some(cat), Some(val)) = (table.column(category), table.column(value)) {
        for (c, v) in cat.values.iter().zip(&val.values) {
            let Some(v) = v.as_f64() else { continue };
            if c.is_null() {
                continue;
            }
            let label = c.to_string();
            groups
                .entry(label.clone())
                .or_insert_with(|| {
                    order.push(label);
                    Vec::new()
                })
                .push(v);
        }
    }

    let boxes = order
        .into_iter()
        .filter_map(|label| {
            let stats = stats::box_stats(groups.get(&label)?)?;
            Some(CategoryBox { label, stats })
        })
        .collect();

    ChartSpec::GroupedBox {
        category_column: category.to_string(),
        value_column: value.to_string(),
        boxes,
    }
}

fn grouped_counts(table: &DataTable, x: &str, hue: &str) -> GroupedCounts {
    let (Some(xc), Some(hc)) = (table.column(x), table.column(hue)) else {
        return GroupedCounts {
            categories: Vec::new(),
            groups: Vec::new(),
            counts: Vec::new(),
        };
    };

    let pairs: Vec<(String, String)> = xc
        .values
        .iter()
        .zip(&hc.values)
        .filter(|(a, b)| !a.is_null() && !b.is_null())
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect();

    let mut categories: Vec<String> = Vec::new();
    let mut groups: Vec<String> = Vec::new();
    for (a, b) in &pairs {
        if !categories.contains(a) {
            categories.push(a.clone());
        }
        if !groups.contains(b) {
            groups.push(b.clone());
        }
    }

    let mut counts = vec![vec![0usize; categories.len()]; groups.len()];
    for (a, b) in &pairs {
        let ci = categories.iter().position(|c| c == a);
        let gi = groups.iter().position(|g| g == b);
        if let (Some(ci), Some(gi)) = (ci, gi) {
            counts[gi][ci] += 1;
        }
    }

    GroupedCounts {
        categories,
        groups,
        counts,
    }
}

/// Multivariate chart over the numeric columns of `table`.
pub fn multivariate(table: &DataTable, method: MultivariateMethod) -> Result<ChartSpec> {
    match method {
        MultivariateMethod::Heatmap => {
            let names = numeric_names(table)?;
            Ok(ChartSpec::Heatmap(correlation_matrix(table, &names)))
        }
        MultivariateMethod::Pairplot => {
            let names = numeric_names(table)?;
            Ok(ChartSpec::Pairplot(pairplot(table, names)))
        }
        MultivariateMethod::GroupedBar => grouped_bar(table),
    }
}

fn numeric_names(table: &DataTable) -> Result<Vec<String>> {
    require_rows(table)?;
    let names = table.numeric_columns();
    if names.is_empty() {
        return Err(DashboardError::NoNumericColumns);
    }
    Ok(names)
}

fn pairplot(table: &DataTable, names: Vec<String>) -> Pairplot {
    let histograms = names
        .iter()
        .map(|n| stats::histogram(&numbers(table, n)))
        .collect();

    let points = names
        .iter()
        .enumerate()
        .map(|(i, row_name)| {
            names
                .iter()
                .enumerate()
                .map(|(j, col_name)| {
                    if i == j {
                        return Vec::new();
                    }
                    match (table.column(col_name), table.column(row_name)) {
                        (Some(xc), Some(yc)) => {
                            let (xs, ys) = complete_pairs(&xc.values, &yc.values);
                            xs.into_iter().zip(ys).map(|(a, b)| [a, b]).collect()
                        }
                        _ => Vec::new(),
                    }
                })
                .collect()
        })
        .collect();

    Pairplot {
        names,
        histograms,
        points,
    }
}

/// Mean price by fuel type, split by transmission when that column exists.
fn grouped_bar(table: &DataTable) -> Result<ChartSpec> {
    require(table, "Grouped Bar", &[FUEL_TYPE, PRICE])?;
    if table.kind_of(PRICE) != Some(ColumnKind::Numeric) {
        return Err(DashboardError::NotNumeric(PRICE.to_string()));
    }
    require_rows(table)?;

    let hue_column = table.has_column(TRANSMISSION).then(|| TRANSMISSION.to_string());
    let (Some(fuel), Some(price)) = (table.column(FUEL_TYPE), table.column(PRICE)) else {
        return Err(DashboardError::EmptySelection);
    };
    let hue = hue_column.as_deref().and_then(|h| table.column(h));

    let categories = labels_in_order(&fuel.values);
    let groups = match hue {
        Some(h) => labels_in_order(&h.values),
        None => vec![String::new()],
    };

    let mut sums = vec![vec![(0.0f64, 0usize); categories.len()]; groups.len()];
    for row in 0..table.len() {
        let Some(p) = price.values[row].as_f64() else { continue };
        let f = &fuel.values[row];
        if f.is_null() {
            continue;
        }
        let group_label = match hue {
            Some(h) if h.values[row].is_null() => continue,
            Some(h) => h.values[row].to_string(),
            None => String::new(),
        };
        let ci = categories.iter().position(|c| *c == f.to_string());
        let gi = groups.iter().position(|g| *g == group_label);
        if let (Some(ci), Some(gi)) = (ci, gi) {
            sums[gi][ci].0 += p;
            sums[gi][ci].1 += 1;
        }
    }

    let means = sums
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|(s, n)| (n > 0).then(|| s / n as f64))
                .collect()
        })
        .collect();

    Ok(ChartSpec::GroupedBar {
        category_column: FUEL_TYPE.to_string(),
        value_column: PRICE.to_string(),
        hue_column,
        means: GroupedMeans {
            categories,
            groups,
            means,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv_str;

    const CARS: &str = "\
Company_Name,Year,Price,Fuel_Type,Transmission
Maruti,2010,2.0,Petrol,Manual
Honda,2011,4.5,Diesel,Automatic
Maruti,2012,3.0,Petrol,Manual
Honda,2013,6.0,Diesel,Manual
Hyundai,2014,5.0,Petrol,Automatic
";

    fn cars() -> DataTable {
        parse_csv_str("cars.csv", CARS).unwrap()
    }

    #[test]
    fn categorical_column_gets_count_plot() {
        let spec = univariate(&cars(), "Company_Name", NumericView::Kde).unwrap();
        match spec {
            ChartSpec::Count { counts, .. } => assert_eq!(
                counts,
                vec![
                    ("Maruti".to_string(), 2),
                    ("Honda".to_string(), 2),
                    ("Hyundai".to_string(), 1)
                ]
            ),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn numeric_column_follows_view_choice() {
        let table = cars();
        let kinds: Vec<_> = NumericView::ALL
            .iter()
            .map(|v| univariate(&table, "Price", *v).unwrap().kind_name())
            .collect();
        assert_eq!(kinds, vec!["histogram", "kde", "box"]);
    }

    #[test]
    fn histogram_overlay_is_scaled_to_counts() {
        let spec = univariate(&cars(), "Price", NumericView::Histogram).unwrap();
        let ChartSpec::Histogram { histogram, overlay, .. } = spec else {
            panic!("expected histogram");
        };
        let overlay = overlay.unwrap();
        let step = overlay[1][0] - overlay[0][0];
        let area: f64 = overlay.iter().map(|p| p[1] * step).sum();
        // Area of the scaled density is (at most) n * bin width.
        assert!(area <= 5.0 * histogram.bin_width * 1.01);
    }

    #[test]
    fn numeric_pair_reports_rounded_correlation() {
        let spec = bivariate(&cars(), "Year", "Price").unwrap();
        let ChartSpec::Scatter { correlation, points, .. } = spec else {
            panic!("expected scatter");
        };
        assert_eq!(points.len(), 5);
        let r = correlation.unwrap();
        assert_eq!(r, stats::round_to(r, 3));
    }

    #[test]
    fn mixed_pairs_put_category_on_categorical_axis() {
        let table = cars();
        for (x, y) in [("Price", "Fuel_Type"), ("Fuel_Type", "Price")] {
            match bivariate(&table, x, y).unwrap() {
                ChartSpec::GroupedBox {
                    category_column,
                    value_column,
                    boxes,
                } => {
                    assert_eq!(category_column, "Fuel_Type");
                    assert_eq!(value_column, "Price");
                    let labels: Vec<_> = boxes.iter().map(|b| b.label.as_str()).collect();
                    assert_eq!(labels, vec!["Petrol", "Diesel"]);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn categorical_pair_counts_by_hue() {
        let spec = bivariate(&cars(), "Fuel_Type", "Transmission").unwrap();
        let ChartSpec::GroupedCount { counts, hue, .. } = spec else {
            panic!("expected grouped count");
        };
        assert_eq!(hue, "Transmission");
        assert_eq!(counts.categories, vec!["Petrol", "Diesel"]);
        assert_eq!(counts.groups, vec!["Manual", "Automatic"]);
        assert_eq!(counts.counts, vec![vec![2, 1], vec![1, 1]]);
    }

    #[test]
    fn grouped_bar_without_fuel_type_warns() {
        let table = parse_csv_str("t.csv", "Price,Transmission\n1.0,Manual\n").unwrap();
        let err = multivariate(&table, MultivariateMethod::GroupedBar).unwrap_err();
        assert_eq!(
            err,
            DashboardError::MissingColumns {
                chart: "Grouped Bar".to_string(),
                columns: vec!["Fuel_Type".to_string()],
            }
        );
    }

    #[test]
    fn grouped_bar_means() {
        let spec = multivariate(&cars(), MultivariateMethod::GroupedBar).unwrap();
        let ChartSpec::GroupedBar { means, hue_column, .. } = spec else {
            panic!("expected grouped bar");
        };
        assert_eq!(hue_column.as_deref(), Some("Transmission"));
        // Petrol/Manual = (2 + 3) / 2, Diesel/Automatic = 4.5
        assert_eq!(means.means[0][0], Some(2.5));
        assert_eq!(means.means[1][1], Some(4.5));
        assert_eq!(means.means[1][0], Some(5.0));
    }

    #[test]
    fn grouped_bar_without_transmission_has_single_group() {
        let table = parse_csv_str("t.csv", "Price,Fuel_Type\n1.0,CNG\n3.0,CNG\n").unwrap();
        let spec = multivariate(&table, MultivariateMethod::GroupedBar).unwrap();
        let ChartSpec::GroupedBar { means, hue_column, .. } = spec else {
            panic!("expected grouped bar");
        };
        assert!(hue_column.is_none());
        assert_eq!(means.means, vec![vec![Some(2.0)]]);
    }

    #[test]
    fn heatmap_covers_numeric_columns() {
        let spec = multivariate(&cars(), MultivariateMethod::Heatmap).unwrap();
        let ChartSpec::Heatmap(m) = spec else {
            panic!("expected heatmap");
        };
        assert_eq!(m.names, vec!["Year", "Price"]);
        assert_eq!(m.get("Year", "Year"), Some(1.0));
        assert_eq!(m.get("Year", "Price"), m.get("Price", "Year"));
    }

    #[test]
    fn pairplot_grid_shape() {
        let spec = multivariate(&cars(), MultivariateMethod::Pairplot).unwrap();
        let ChartSpec::Pairplot(p) = spec else {
            panic!("expected pairplot");
        };
        assert_eq!(p.names.len(), 2);
        assert!(p.points[0][0].is_empty());
        assert_eq!(p.points[0][1].len(), 5);
        assert!(p.histograms.iter().all(Option::is_some));
    }

    #[test]
    fn empty_view_is_reported_not_panicked() {
        let table = cars().select_rows(&[]);
        assert_eq!(
            univariate(&table, "Price", NumericView::Histogram),
            Err(DashboardError::EmptySelection)
        );
        assert_eq!(
            bivariate(&table, "Price", "Year"),
            Err(DashboardError::EmptySelection)
        );
        for method in MultivariateMethod::ALL {
            assert_eq!(multivariate(&table, method), Err(DashboardError::EmptySelection));
        }
    }

    #[test]
    fn missing_column_is_reported() {
        let err = bivariate(&cars(), "Price", "Mileage").unwrap_err();
        assert!(matches!(err, DashboardError::MissingColumns { .. }));
    }
}
