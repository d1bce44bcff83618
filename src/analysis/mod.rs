/// Analysis layer: statistics, chart dispatch, and page metrics.
///
/// Nothing here touches the UI.  Each operation turns a table (or the
/// filtered view) into plain data that `ui::charts` and `ui::pages` draw.

pub mod dispatch;
pub mod insights;
pub mod metrics;
pub mod stats;
