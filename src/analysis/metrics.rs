use crate::analysis::stats::{mean, round_to};
use crate::data::model::columns::{
    COMPANY_NAME, KILOMETERS_DRIVEN, LATITUDE, LONGITUDE, POWER, PRICE,
};
use crate::data::model::{ColumnKind, DataTable};
use crate::error::{DashboardError, Result};

/// Headline numbers on the Introduction page.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewMetrics {
    pub total_cars: usize,
    pub average_price: Result<f64>,
    pub average_km: Result<i64>,
    pub total_companies: Result<usize>,
}

/// Headline numbers for the filtered view on the Analysis page.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionMetrics {
    pub selected_cars: usize,
    pub average_price: Result<f64>,
    pub average_power: Result<f64>,
}

/// Null-skipping mean of a numeric column.
pub fn column_mean(table: &DataTable, column: &str) -> Result<f64> {
    let col = table.column(column).ok_or_else(|| DashboardError::MissingColumns {
        chart: "Average".to_string(),
        columns: vec![column.to_string()],
    })?;
    if col.kind != ColumnKind::Numeric {
        return Err(DashboardError::NotNumeric(column.to_string()));
    }
    mean(&col.numeric_values()).ok_or(DashboardError::EmptySelection)
}

/// Number of distinct non-null values in a column.
pub fn distinct_count(table: &DataTable, column: &str) -> Result<usize> {
    table
        .column(column)
        .map(|c| c.unique_values().len())
        .ok_or_else(|| DashboardError::MissingColumns {
            chart: "Distinct count".to_string(),
            columns: vec![column.to_string()],
        })
}

impl OverviewMetrics {
    pub fn compute(table: &DataTable) -> Self {
        OverviewMetrics {
            total_cars: table.len(),
            average_price: column_mean(table, PRICE).map(|m| round_to(m, 2)),
            average_km: column_mean(table, KILOMETERS_DRIVEN).map(|m| m.trunc() as i64),
            total_companies: distinct_count(table, COMPANY_NAME),
        }
    }
}

impl SelectionMetrics {
    pub fn compute(view: &DataTable) -> Self {
        SelectionMetrics {
            selected_cars: view.len(),
            average_price: column_mean(view, PRICE).map(|m| round_to(m, 2)),
            average_power: column_mean(view, POWER).map(|m| round_to(m, 2)),
        }
    }
}

/// `[longitude, latitude]` of every row with both coordinates, or `None`
/// when either column is absent.
pub fn map_points(table: &DataTable) -> Option<Vec<[f64; 2]>> {
    let lat = table.column(LATITUDE)?;
    let lon = table.column(LONGITUDE)?;
    Some(
        lon.values
            .iter()
            .zip(&lat.values)
            .filter_map(|(x, y)| Some([x.as_f64()?, y.as_f64()?]))
            .collect(),
    )
}

/// Display text for a metric that may be unavailable.
pub fn display<T: std::fmt::Display>(value: &Result<T>) -> String {
    match value {
        Ok(v) => v.to_string(),
        Err(_) => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv_str;

    const CARS: &str = "\
Company_Name,Price,Kilometers_Driven,Power_value,Latitude,Longitude
Maruti,3.333,41000,88.7,19.07,72.87
Honda,4.5,46001,,17.38,78.48
Maruti,2.0,,100.0,,
";

    #[test]
    fn overview_metrics() {
        let table = parse_csv_str("cars.csv", CARS).unwrap();
        let m = OverviewMetrics::compute(&table);
        assert_eq!(m.total_cars, 3);
        assert_eq!(m.average_price, Ok(3.28));
        assert_eq!(m.average_km, Ok(43500));
        assert_eq!(m.total_companies, Ok(2));
    }

    #[test]
    fn selection_metrics_on_empty_view() {
        let table = parse_csv_str("cars.csv", CARS).unwrap();
        let m = SelectionMetrics::compute(&table.select_rows(&[]));
        assert_eq!(m.selected_cars, 0);
        assert_eq!(m.average_price, Err(DashboardError::EmptySelection));
        assert_eq!(display(&m.average_power), "n/a");
    }

    #[test]
    fn map_points_skip_missing_coordinates() {
        let table = parse_csv_str("cars.csv", CARS).unwrap();
        assert_eq!(map_points(&table).unwrap().len(), 2);

        let no_coords = parse_csv_str("t.csv", "Price\n1\n").unwrap();
        assert!(map_points(&no_coords).is_none());
    }
}
