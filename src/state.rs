use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::color::ColorMap;
use crate::config::{Args, DEFAULT_TABLE_ROWS};
use crate::data::export::export_csv;
use crate::data::filter::{filtered_indices, FilterCriteria};
use crate::data::loader::load_dataset;
use crate::data::model::{Category, Dataset, Record};
use crate::data::stats::{
    format_currency, histogram, Bin, Summary, DEFAULT_BINS, MAX_BINS, MIN_BINS,
};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The dataset is loaded once and never mutated; every handler below
/// recomputes the derived view from it.
pub struct AppState {
    /// Cleaned dataset (None when loading failed).
    pub dataset: Option<Dataset>,

    /// File the dataset was read from.
    pub source: Option<PathBuf>,

    /// User-facing message shown instead of the dashboard when loading failed.
    pub load_error: Option<String>,

    /// Current sidebar selections.
    pub criteria: FilterCriteria,

    /// Indices of records passing the current criteria (cached).
    pub visible_indices: Vec<usize>,

    /// KPI figures for `visible_indices` (cached).
    pub summary: Summary,

    /// Price histogram bin count.
    pub bins: usize,

    /// Odometer histogram bin count.
    pub odometer_bins: usize,

    /// Categorical column used for colouring the scatter plot.
    pub color_by: Category,

    /// Active colour map for `color_by`.
    pub color_map: Option<ColorMap>,

    /// Rows shown in the preview table.
    pub table_rows: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            source: None,
            load_error: None,
            criteria: FilterCriteria::default(),
            visible_indices: Vec::new(),
            summary: Summary::default(),
            bins: DEFAULT_BINS,
            odometer_bins: DEFAULT_BINS,
            color_by: Category::Condition,
            color_map: None,
            table_rows: DEFAULT_TABLE_ROWS,
            status_message: None,
        }
    }
}

impl AppState {
    /// Load the dataset described by `args`. A failure is kept as a
    /// user-facing message; the returned state then has no dataset.
    pub fn load(args: &Args) -> Self {
        let mut state = Self {
            bins: args.bins(),
            table_rows: args.table_rows,
            ..Self::default()
        };
        match load_dataset(&args.data_dir, &args.pattern) {
            Ok((path, dataset)) => {
                if dataset.is_empty() {
                    log::warn!("No records in {} survived cleaning", path.display());
                }
                state.set_dataset(path, dataset);
            }
            Err(e) => {
                log::error!("Failed to load dataset: {e}");
                state.load_error = Some(format!(
                    "Could not load the dataset: {e}.\n\n\
                     Make sure a CSV file whose name matches '{}' is in {}.",
                    args.pattern,
                    args.data_dir.display()
                ));
            }
        }
        state
    }

    /// Ingest the loaded dataset, initialise criteria, view and colour.
    pub fn set_dataset(&mut self, source: PathBuf, dataset: Dataset) {
        self.criteria = FilterCriteria::for_dataset(&dataset);
        self.dataset = Some(dataset);
        self.source = Some(source);
        self.load_error = None;
        self.rebuild_color_map();
        self.refilter();
    }

    /// Recompute `visible_indices` and `summary` from the current criteria.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.criteria);
            self.summary = Summary::of(ds, &self.visible_indices);
        }
    }

    /// Replace the criteria; the view is only recomputed on change.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        if criteria != self.criteria {
            self.criteria = criteria;
            self.refilter();
        }
    }

    /// Restore the dataset's default criteria.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            let defaults = FilterCriteria::for_dataset(ds);
            self.set_criteria(defaults);
        }
    }

    pub fn set_color_by(&mut self, category: Category) {
        if category != self.color_by {
            self.color_by = category;
            self.rebuild_color_map();
        }
    }

    fn rebuild_color_map(&mut self) {
        self.color_map = self
            .dataset
            .as_ref()
            .map(|ds| ColorMap::new(self.color_by.column(), ds.values(self.color_by)));
    }

    pub fn set_bins(&mut self, bins: usize) {
        self.bins = bins.clamp(MIN_BINS, MAX_BINS);
    }

    pub fn set_odometer_bins(&mut self, bins: usize) {
        self.odometer_bins = bins.clamp(MIN_BINS, MAX_BINS);
    }

    /// Price histogram of the current view.
    pub fn price_histogram(&self) -> Vec<Bin> {
        self.view_histogram(|r| r.price, self.bins)
    }

    /// Odometer histogram of the current view.
    pub fn odometer_histogram(&self) -> Vec<Bin> {
        self.view_histogram(|r| r.odometer, self.odometer_bins)
    }

    fn view_histogram(&self, value: impl Fn(&Record) -> f64, bins: usize) -> Vec<Bin> {
        let Some(ds) = &self.dataset else {
            return Vec::new();
        };
        let values: Vec<f64> = self
            .visible_indices
            .iter()
            .map(|&i| value(&ds.records[i]))
            .collect();
        histogram(&values, bins)
    }

    /// Hover text for the scatter point at (`odometer`, `price`): model year,
    /// model and manufacturer of the first visible record plotted there.
    pub fn scatter_details(&self, odometer: f64, price: f64) -> Option<String> {
        let ds = self.dataset.as_ref()?;
        let record = self
            .visible_indices
            .iter()
            .map(|&i| &ds.records[i])
            .find(|r| r.odometer == odometer && r.price == price)?;
        Some(format!(
            "{} {}\nmanufacturer: {}\nodometer: {:.0}\nprice: {}",
            record.model_year,
            record.model.as_deref().unwrap_or("-"),
            record.manufacturer.as_deref().unwrap_or("-"),
            record.odometer,
            format_currency(Some(record.price)),
        ))
    }

    /// The first `table_rows` visible indices.
    pub fn table_indices(&self) -> &[usize] {
        let n = self.visible_indices.len().min(self.table_rows);
        &self.visible_indices[..n]
    }

    /// Number of cleaned records hidden by the current criteria.
    pub fn excluded_count(&self) -> usize {
        self.dataset.as_ref().map_or(0, Dataset::len) - self.visible_indices.len()
    }

    /// Write the current view to `path`, reporting the outcome in the
    /// status line.
    pub fn export_to(&mut self, path: &Path) -> Result<()> {
        let Some(ds) = &self.dataset else {
            anyhow::bail!("no dataset loaded");
        };
        match export_csv(ds, &self.visible_indices, path) {
            Ok(()) => {
                self.status_message = Some(format!(
                    "Exported {} records to {}",
                    self.visible_indices.len(),
                    path.display()
                ));
                Ok(())
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
                Err(e)
            }
        }
    }
}
