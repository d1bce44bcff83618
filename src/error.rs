use thiserror::Error;

/// Column-level failures reported inline next to the chart or metric they
/// affect.  File-level failures use `anyhow` and are fatal at startup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("{chart}: required columns missing ({})", .columns.join(", "))]
    MissingColumns { chart: String, columns: Vec<String> },

    #[error("No rows match the current filters")]
    EmptySelection,

    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),

    #[error("The table has no numeric columns")]
    NoNumericColumns,

    #[error("{column}: {reason}")]
    Unplottable { column: String, reason: String },
}

impl DashboardError {
    /// Build a [`DashboardError::MissingColumns`] for the columns of
    /// `required` absent from `present`.
    pub fn missing(chart: &str, required: &[&str], present: &[String]) -> Option<Self> {
        let columns: Vec<String> = required
            .iter()
            .filter(|r| !present.iter().any(|p| p == *r))
            .map(|r| r.to_string())
            .collect();
        if columns.is_empty() {
            None
        } else {
            Some(DashboardError::MissingColumns {
                chart: chart.to_string(),
                columns,
            })
        }
    }

    pub fn unplottable(column: &str, reason: &str) -> Self {
        DashboardError::Unplottable {
            column: column.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether this is informational (nothing to draw) rather than a problem
    /// with the data.
    pub fn is_informational(&self) -> bool {
        matches!(
            self,
            DashboardError::EmptySelection | DashboardError::Unplottable { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_lists_only_absent_columns() {
        let present = vec!["Price".to_string()];
        let err = DashboardError::missing("Grouped Bar", &["Fuel_Type", "Price"], &present).unwrap();
        assert_eq!(
            err.to_string(),
            "Grouped Bar: required columns missing (Fuel_Type)"
        );
        assert!(DashboardError::missing("x", &["Price"], &present).is_none());
    }

    #[test]
    fn empty_selection_is_informational() {
        assert!(DashboardError::EmptySelection.is_informational());
        assert!(!DashboardError::NoNumericColumns.is_informational());
    }
}
