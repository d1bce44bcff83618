use std::collections::BTreeMap;

use crate::analysis::stats::pearson;
use crate::data::model::columns::{COMPANY_NAME, FUEL_TYPE, PRICE};
use crate::data::model::{CellValue, ColumnKind, DataTable};
use crate::error::{DashboardError, Result};

/// Automated insights for the Conclusions page, computed over the full
/// cleaned table.  Each item fails on its own when its columns are missing.
#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    pub total_records: usize,
    pub highest_price_company: Result<String>,
    pub most_common_fuel: Result<String>,
    pub strongest_price_correlation: Result<String>,
}

impl Insights {
    pub fn compute(table: &DataTable) -> Self {
        let insights = Insights {
            total_records: table.len(),
            highest_price_company: highest_price_label(table, COMPANY_NAME),
            most_common_fuel: mode(table, FUEL_TYPE),
            strongest_price_correlation: strongest_correlation(table, PRICE),
        };
        log::debug!("Insights over {} rows: {insights:?}", table.len());
        insights
    }
}

fn missing(table: &DataTable, chart: &str, required: &[&str]) -> Result<()> {
    match DashboardError::missing(chart, required, &table.column_names()) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Label in `label_column` of the first row holding the maximum price.
/// Null prices are skipped.
pub fn highest_price_label(table: &DataTable, label_column: &str) -> Result<String> {
    missing(table, "Highest price", &[PRICE, label_column])?;
    let (Some(price), Some(labels)) = (table.column(PRICE), table.column(label_column)) else {
        return Err(DashboardError::EmptySelection);
    };
    if price.kind != ColumnKind::Numeric {
        return Err(DashboardError::NotNumeric(PRICE.to_string()));
    }

    let mut best: Option<(usize, f64)> = None;
    for (row, cell) in price.values.iter().enumerate() {
        let Some(v) = cell.as_f64() else { continue };
        if best.map_or(true, |(_, b)| v > b) {
            best = Some((row, v));
        }
    }

    let (row, _) = best.ok_or(DashboardError::EmptySelection)?;
    Ok(labels.values[row].to_string())
}

/// Most frequent non-null value of a column; ties go to the value that
/// sorts first.
pub fn mode(table: &DataTable, column: &str) -> Result<String> {
    missing(table, "Most common value", &[column])?;
    let Some(col) = table.column(column) else {
        return Err(DashboardError::EmptySelection);
    };

    let mut counts = BTreeMap::new();
    for v in col.values.iter().filter(|v| !v.is_null()) {
        *counts.entry(v.clone()).or_insert(0usize) += 1;
    }

    // BTreeMap iterates in ascending order; keep the first maximum.
    let mut best: Option<(&CellValue, usize)> = None;
    for (value, &count) in &counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(v, _)| v.to_string())
        .ok_or(DashboardError::EmptySelection)
}

/// Numeric column, other than `target` itself, with the highest signed
/// Pearson correlation to `target`.  Undefined correlations are skipped and
/// ties go to the earlier column.
pub fn strongest_correlation(table: &DataTable, target: &str) -> Result<String> {
    missing(table, "Strongest correlation", &[target])?;
    let Some(target_col) = table.column(target) else {
        return Err(DashboardError::EmptySelection);
    };
    if target_col.kind != ColumnKind::Numeric {
        return Err(DashboardError::NotNumeric(target.to_string()));
    }

    let mut best: Option<(&str, f64)> = None;
    for col in table.columns() {
        if col.kind != ColumnKind::Numeric || col.name == target {
            continue;
        }
        let Some(r) = pearson(&col.values, &target_col.values) else {
            continue;
        };
        if best.map_or(true, |(_, b)| r > b) {
            best = Some((&col.name, r));
        }
    }

    best.map(|(name, _)| name.to_string())
        .ok_or(DashboardError::NoNumericColumns)
}
