//! End-to-end checks: datasets written to disk, loaded through the cache
//! and driven through the same state transitions the UI performs.

use std::fs;
use std::path::Path;

use cars_dashboard::analysis::dispatch::{self, ChartSpec, MultivariateMethod, NumericView};
use cars_dashboard::analysis::insights::Insights;
use cars_dashboard::config::DashboardConfig;
use cars_dashboard::data::loader::parse_csv_str;
use cars_dashboard::data::model::CellValue;
use cars_dashboard::error::DashboardError;
use cars_dashboard::state::AppState;
use tempfile::TempDir;

const RAW: &str = "\
Name,Year,Kilometers_Driven,Power,Price
Maruti Swift,2012,41000,82 bhp,3.5
Honda City,2014,36000,117 bhp,6.2
";

const CLEANED: &str = "\
Company_Name,Year,Kilometers_Driven,Fuel_Type,Transmission,Power_value,Price,Latitude,Longitude
Maruti,2010,72000,Petrol,Manual,74.0,2.1,19.07,72.87
Maruti,2012,41000,Petrol,Manual,82.0,3.5,18.52,73.85
Maruti,2015,20000,Diesel,Manual,88.5,5.0,28.70,77.10
Maruti,2016,15000,Petrol,Automatic,82.0,5.6,13.08,80.27
Honda,2013,52000,Diesel,Manual,98.6,5.9,17.38,78.48
Honda,2014,36000,Petrol,Automatic,117.3,6.2,9.93,76.26
BMW,2015,30000,Diesel,Automatic,184.0,28.0,19.07,72.87
";

fn write_datasets(dir: &TempDir) -> DashboardConfig {
    let raw_path = dir.path().join("carspandas.csv");
    let cleaned_path = dir.path().join("Cars_cleaned.csv");
    fs::write(&raw_path, RAW).unwrap();
    fs::write(&cleaned_path, CLEANED).unwrap();
    DashboardConfig {
        raw_path,
        cleaned_path,
        ..DashboardConfig::default()
    }
}

fn loaded_state(dir: &TempDir) -> AppState {
    AppState::load(write_datasets(dir)).unwrap()
}

fn text(s: &str) -> CellValue {
    CellValue::String(s.to_string())
}

#[test]
fn startup_shows_every_row_with_overview_metrics() {
    let dir = TempDir::new().unwrap();
    let state = loaded_state(&dir);

    assert_eq!(state.raw.len(), 2);
    assert_eq!(state.cleaned.len(), 7);
    assert_eq!(state.view.len(), 7);
    assert_eq!(state.overview.total_cars, 7);
    assert_eq!(state.overview.total_companies, Ok(3));
    assert_eq!(state.selection.selected_cars, 7);
}

#[test]
fn missing_dataset_is_fatal_at_startup() {
    let dir = TempDir::new().unwrap();
    let config = DashboardConfig {
        raw_path: dir.path().join("nope.csv"),
        cleaned_path: dir.path().join("also_nope.csv"),
        ..DashboardConfig::default()
    };
    assert!(AppState::load(config).is_err());
}

#[test]
fn maruti_between_2012_and_2015() {
    let dir = TempDir::new().unwrap();
    let mut state = loaded_state(&dir);

    state.select_no_categories();
    assert!(state.view.is_empty());
    assert_eq!(state.selection.selected_cars, 0);

    state.toggle_category(&text("Maruti"));
    state.set_range(2012.0, 2015.0);

    assert_eq!(state.view.len(), 2);
    assert_eq!(state.selection.selected_cars, 2);
    let years: Vec<f64> = state.view.column("Year").unwrap().numeric_values();
    assert_eq!(years, vec![2012.0, 2015.0]);

    // Page-level metrics over the full table are untouched.
    assert_eq!(state.overview.total_cars, 7);
}

#[test]
fn empty_selection_is_reported_not_plotted() {
    let dir = TempDir::new().unwrap();
    let mut state = loaded_state(&dir);
    state.select_no_categories();

    state.set_univariate_column("Price".to_string());
    let result = state.univariate_chart().unwrap();
    assert_eq!(result, &Err(DashboardError::EmptySelection));
    assert!(state.selection.average_price.is_err());
}

#[test]
fn charts_follow_the_filtered_view() {
    let dir = TempDir::new().unwrap();
    let mut state = loaded_state(&dir);

    state.set_univariate_column("Company_Name".to_string());
    match state.univariate_chart().unwrap() {
        Ok(ChartSpec::Count { counts, .. }) => assert_eq!(counts.len(), 3),
        other => panic!("expected count plot, got {other:?}"),
    }

    state.select_no_categories();
    state.toggle_category(&text("Honda"));
    match state.univariate_chart().unwrap() {
        Ok(ChartSpec::Count { counts, .. }) => {
            assert_eq!(counts, &vec![("Honda".to_string(), 2)]);
        }
        other => panic!("expected count plot, got {other:?}"),
    }
}

#[test]
fn bivariate_pairs_dispatch_by_kind() {
    let table = parse_csv_str("cars", CLEANED).unwrap();

    let cases = [
        ("Kilometers_Driven", "Price", "scatter"),
        ("Fuel_Type", "Price", "grouped box"),
        ("Price", "Fuel_Type", "grouped box"),
        ("Fuel_Type", "Transmission", "grouped count"),
    ];
    for (x, y, expected) in cases {
        let spec = dispatch::bivariate(&table, x, y).unwrap();
        assert_eq!(spec.kind_name(), expected, "{x} vs {y}");
    }
}

#[test]
fn grouped_bar_without_fuel_type() {
    let csv = "Company_Name,Price,Transmission\nMaruti,2.0,Manual\nHonda,4.0,Automatic\n";
    let table = parse_csv_str("cars", csv).unwrap();
    match dispatch::multivariate(&table, MultivariateMethod::GroupedBar) {
        Err(DashboardError::MissingColumns { columns, .. }) => {
            assert_eq!(columns, vec!["Fuel_Type".to_string()]);
        }
        other => panic!("expected missing columns, got {other:?}"),
    }

    // The other methods still work on the same table.
    assert!(dispatch::multivariate(&table, MultivariateMethod::Heatmap).is_ok());
}

#[test]
fn highest_price_insight_names_the_company() {
    let csv = "Company_Name,Price,Fuel_Type\nA,5,Petrol\nB,7,Diesel\nC,3,Diesel\nD,9,Petrol\nE,2,Petrol\n";
    let table = parse_csv_str("cars", csv).unwrap();
    let insights = Insights::compute(&table);

    assert_eq!(insights.total_records, 5);
    assert_eq!(insights.highest_price_company, Ok("D".to_string()));
    assert_eq!(insights.most_common_fuel, Ok("Petrol".to_string()));
}

#[test]
fn histogram_and_kde_for_numeric_columns() {
    let table = parse_csv_str("cars", CLEANED).unwrap();

    match dispatch::univariate(&table, "Price", NumericView::Histogram).unwrap() {
        ChartSpec::Histogram { histogram, .. } => assert_eq!(histogram.total(), 7),
        other => panic!("expected histogram, got {other:?}"),
    }
    match dispatch::univariate(&table, "Price", NumericView::Kde).unwrap() {
        ChartSpec::Kde { curve, .. } => assert!(!curve.is_empty()),
        other => panic!("expected kde, got {other:?}"),
    }
}

#[test]
fn opening_a_bad_file_keeps_current_data() {
    let dir = TempDir::new().unwrap();
    let mut state = loaded_state(&dir);

    let bad = dir.path().join("broken.txt");
    fs::write(&bad, "not a dataset").unwrap();
    state.open_cleaned(&bad);

    assert_eq!(state.cleaned.len(), 7);
    assert!(state.status_message.is_some());
}

#[test]
fn reload_picks_up_changes_on_disk() {
    let dir = TempDir::new().unwrap();
    let mut state = loaded_state(&dir);

    let extra = format!("{CLEANED}Hyundai,2017,9000,Petrol,Manual,81.8,6.9,19.07,72.87\n");
    fs::write(Path::new(&state.config.cleaned_path), extra).unwrap();
    state.reload();

    assert_eq!(state.cleaned.len(), 8);
    assert_eq!(state.view.len(), 8);
    assert_eq!(state.category_options.len(), 4);
    assert!(state.status_message.is_none());
}
