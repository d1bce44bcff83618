use std::path::Path;
use std::sync::Arc;

use crate::analysis::dispatch::{self, ChartSpec, MultivariateMethod, NumericView};
use crate::analysis::insights::Insights;
use crate::analysis::metrics::{OverviewMetrics, SelectionMetrics};
use crate::config::DashboardConfig;
use crate::data::cache::TableCache;
use crate::data::filter::{RowFilter, apply, init_filter};
use crate::data::model::{CellValue, DataTable};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Introduction,
    Analysis,
    Conclusions,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Introduction, Page::Analysis, Page::Conclusions];

    pub fn label(self) -> &'static str {
        match self {
            Page::Introduction => "Introduction",
            Page::Analysis => "Analysis",
            Page::Conclusions => "Conclusions",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,
    cache: TableCache,

    /// Raw dataset, shown verbatim.
    pub raw: Arc<DataTable>,
    /// Cleaned dataset every analysis starts from.
    pub cleaned: Arc<DataTable>,

    pub page: Page,

    /// Active category / range filter over the cleaned table.
    pub filter: RowFilter,
    /// Category values offered in the multi-select, in order of appearance.
    pub category_options: Vec<CellValue>,
    /// Rows of the cleaned table passing `filter` (cached).
    pub view: DataTable,

    pub overview: OverviewMetrics,
    pub selection: SelectionMetrics,
    pub insights: Insights,

    pub univariate_column: Option<String>,
    pub numeric_view: NumericView,
    pub bivariate_x: Option<String>,
    pub bivariate_y: Option<String>,
    pub multivariate: MultivariateMethod,
    pub faq_index: usize,

    // Chart data cached until its inputs change.
    univariate_chart: Option<Result<ChartSpec>>,
    bivariate_chart: Option<Result<ChartSpec>>,
    multivariate_chart: Option<Result<ChartSpec>>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load both datasets through the cache.  Any load failure is fatal.
    pub fn load(config: DashboardConfig) -> anyhow::Result<Self> {
        let mut cache = TableCache::new();
        let raw = cache.get_or_load(&config.raw_path)?;
        let cleaned = cache.get_or_load(&config.cleaned_path)?;
        Ok(Self::new(config, cache, raw, cleaned))
    }

    pub fn new(
        config: DashboardConfig,
        cache: TableCache,
        raw: Arc<DataTable>,
        cleaned: Arc<DataTable>,
    ) -> Self {
        let view = (*cleaned).clone();
        let mut state = Self {
            overview: OverviewMetrics::compute(&cleaned),
            selection: SelectionMetrics::compute(&view),
            insights: Insights::compute(&cleaned),
            config,
            cache,
            raw,
            cleaned: Arc::clone(&cleaned),
            page: Page::default(),
            filter: RowFilter::default(),
            category_options: Vec::new(),
            view,
            univariate_column: None,
            numeric_view: NumericView::default(),
            bivariate_x: None,
            bivariate_y: None,
            multivariate: MultivariateMethod::default(),
            faq_index: 0,
            univariate_chart: None,
            bivariate_chart: None,
            multivariate_chart: None,
            status_message: None,
        };
        state.set_cleaned(cleaned);
        state
    }

    /// Ingest a cleaned dataset: initialise filters, metrics and selections.
    pub fn set_cleaned(&mut self, cleaned: Arc<DataTable>) {
        self.filter = init_filter(
            &cleaned,
            &self.config.category_column,
            &self.config.range_column,
        );
        self.category_options = cleaned
            .column(&self.config.category_column)
            .map(|col| {
                let mut options = col.unique_values();
                if col.values.iter().any(CellValue::is_null) {
                    options.push(CellValue::Null);
                }
                options
            })
            .unwrap_or_default();

        self.overview = OverviewMetrics::compute(&cleaned);
        self.insights = Insights::compute(&cleaned);

        let first = cleaned.columns().first().map(|c| c.name.clone());
        self.univariate_column = first.clone();
        self.bivariate_x = first.clone();
        self.bivariate_y = first;

        self.cleaned = cleaned;
        self.refilter();
    }

    pub fn set_raw(&mut self, raw: Arc<DataTable>) {
        self.raw = raw;
    }

    /// Recompute the filtered view after a filter change.
    pub fn refilter(&mut self) {
        self.view = apply(&self.cleaned, &self.filter);
        self.selection = SelectionMetrics::compute(&self.view);
        self.invalidate_charts();
    }

    fn invalidate_charts(&mut self) {
        self.univariate_chart = None;
        self.bivariate_chart = None;
        self.multivariate_chart = None;
    }

    // -- Filter edits --

    /// Toggle a single category value in the multi-select.
    pub fn toggle_category(&mut self, value: &CellValue) {
        if let Some(pred) = self.filter.category.as_mut() {
            if !pred.accepted.remove(value) {
                pred.accepted.insert(value.clone());
            }
            self.refilter();
        }
    }

    /// Select every category value.
    pub fn select_all_categories(&mut self) {
        if let Some(pred) = self.filter.category.as_mut() {
            pred.accepted = self.category_options.iter().cloned().collect();
            self.refilter();
        }
    }

    /// Deselect every category value.
    pub fn select_no_categories(&mut self) {
        if let Some(pred) = self.filter.category.as_mut() {
            pred.accepted.clear();
            self.refilter();
        }
    }

    /// Change the inclusive range bounds.
    pub fn set_range(&mut self, low: f64, high: f64) {
        if let Some(range) = self.filter.range.as_mut() {
            range.set_bounds(low, high);
            self.refilter();
        }
    }

    // -- Chart selections --

    pub fn set_univariate_column(&mut self, column: String) {
        self.univariate_column = Some(column);
        self.univariate_chart = None;
    }

    pub fn set_numeric_view(&mut self, view: NumericView) {
        self.numeric_view = view;
        self.univariate_chart = None;
    }

    pub fn set_bivariate(&mut self, x: String, y: String) {
        self.bivariate_x = Some(x);
        self.bivariate_y = Some(y);
        self.bivariate_chart = None;
    }

    pub fn set_multivariate(&mut self, method: MultivariateMethod) {
        self.multivariate = method;
        self.multivariate_chart = None;
    }

    // -- Lazily computed charts --

    pub fn univariate_chart(&mut self) -> Option<&Result<ChartSpec>> {
        let column = self.univariate_column.as_deref()?;
        if self.univariate_chart.is_none() {
            log::debug!("Computing univariate chart for '{column}'");
            self.univariate_chart =
                Some(dispatch::univariate(&self.view, column, self.numeric_view));
        }
        self.univariate_chart.as_ref()
    }

    pub fn bivariate_chart(&mut self) -> Option<&Result<ChartSpec>> {
        let x = self.bivariate_x.as_deref()?;
        let y = self.bivariate_y.as_deref()?;
        if self.bivariate_chart.is_none() {
            self.bivariate_chart = Some(dispatch::bivariate(&self.view, x, y));
        }
        self.bivariate_chart.as_ref()
    }

    pub fn multivariate_chart(&mut self) -> &Result<ChartSpec> {
        let method = self.multivariate;
        let view = &self.view;
        self.multivariate_chart
            .get_or_insert_with(|| dispatch::multivariate(view, method))
    }

    // -- Runtime file loads --

    /// Replace the cleaned dataset.  On failure the current table stays.
    pub fn open_cleaned(&mut self, path: &Path) {
        match self.cache.get_or_load(path) {
            Ok(table) => {
                self.config.cleaned_path = path.to_path_buf();
                self.set_cleaned(table);
                self.status_message = None;
            }
            Err(e) => self.report_load_error(e),
        }
    }

    /// Replace the raw dataset.  On failure the current table stays.
    pub fn open_raw(&mut self, path: &Path) {
        match self.cache.get_or_load(path) {
            Ok(table) => {
                self.config.raw_path = path.to_path_buf();
                self.set_raw(table);
                self.status_message = None;
            }
            Err(e) => self.report_load_error(e),
        }
    }

    /// Drop cached copies and re-read both files from disk.
    pub fn reload(&mut self) {
        let raw_path = self.config.raw_path.clone();
        let cleaned_path = self.config.cleaned_path.clone();
        self.cache.invalidate(&raw_path);
        self.cache.invalidate(&cleaned_path);
        self.open_raw(&raw_path);
        self.open_cleaned(&cleaned_path);
    }

    fn report_load_error(&mut self, e: anyhow::Error) {
        log::error!("Failed to load file: {e:#}");
        self.status_message = Some(format!("Error: {e:#}"));
    }
}
