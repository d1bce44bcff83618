use std::collections::BTreeSet;

use super::model::{CellValue, DataTable};

// ---------------------------------------------------------------------------
// Filter predicates: categorical membership AND inclusive numeric range
// ---------------------------------------------------------------------------

/// Rows pass when their value in `column` is one of `accepted`.
/// An empty `accepted` set means nothing is selected, so no row passes.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPredicate {
    pub column: String,
    pub accepted: BTreeSet<CellValue>,
}

/// Rows pass when their numeric value in `column` lies in `[low, high]`.
/// Null and non-numeric cells never pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangePredicate<'a> {
    pub column: &'a str,
    pub low: f64,
    pub high: f64,
}

/// Owned form of [`RangePredicate`] kept in the UI state.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFilter {
    pub column: String,
    pub low: f64,
    pub high: f64,
    /// Observed bounds of the column, used to clamp slider input.
    pub min: f64,
    pub max: f64,
}

impl RangeFilter {
    pub fn predicate(&self) -> RangePredicate<'_> {
        RangePredicate {
            column: &self.column,
            low: self.low,
            high: self.high,
        }
    }

    /// Set new bounds, clamped to the observed range and kept ordered.
    pub fn set_bounds(&mut self, low: f64, high: f64) {
        let low = low.clamp(self.min, self.max);
        let high = high.clamp(self.min, self.max);
        self.low = low.min(high);
        self.high = low.max(high);
    }
}

/// The active row filter.  A predicate is `None` when its column is absent
/// from the table; it is then skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFilter {
    pub category: Option<CategoryPredicate>,
    pub range: Option<RangeFilter>,
}

/// Initialise a [`RowFilter`] that accepts the full observed domain of
/// `category_column` and the full observed range of `range_column`.
pub fn init_filter(table: &DataTable, category_column: &str, range_column: &str) -> RowFilter {
    let category = table.column(category_column).map(|col| CategoryPredicate {
        column: col.name.clone(),
        accepted: col.values.iter().cloned().collect(),
    });

    let range = table.column(range_column).and_then(|col| {
        let values = col.numeric_values();
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if values.is_empty() {
            log::warn!("Range column '{range_column}' has no numeric values; range filter disabled");
            return None;
        }
        Some(RangeFilter {
            column: col.name.clone(),
            low: min,
            high: max,
            min,
            max,
        })
    });

    if category.is_none() {
        log::warn!("Category column '{category_column}' missing; category filter disabled");
    }

    RowFilter { category, range }
}

/// Return indices of rows that pass every active predicate, in row order.
pub fn filtered_indices(table: &DataTable, filter: &RowFilter) -> Vec<usize> {
    let category = filter
        .category
        .as_ref()
        .and_then(|p| table.column(&p.column).map(|col| (col, &p.accepted)));
    let range = filter
        .range
        .as_ref()
        .and_then(|r| table.column(&r.column).map(|col| (col, r.predicate())));

    (0..table.len())
        .filter(|&row| {
            if let Some((col, accepted)) = category {
                if !accepted.contains(&col.values[row]) {
                    return false;
                }
            }
            if let Some((col, pred)) = range {
                match col.values[row].as_f64() {
                    Some(v) if v >= pred.low && v <= pred.high => {}
                    _ => return false,
                }
            }
            true
        })
        .collect()
}

/// Produce the filtered view of `table`.
pub fn apply(table: &DataTable, filter: &RowFilter) -> DataTable {
    let rows = filtered_indices(table, filter);
    log::debug!("Filter kept {} of {} rows", rows.len(), table.len());
    table.select_rows(&rows)
}
