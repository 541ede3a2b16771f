use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::chart::{self, ChartData, ChartInputs, ChartKind};
use crate::config::DashboardConfig;
use crate::data::filter::{self, FilterCriteria, FilterOutcome, FilterWarning, Selection};
use crate::data::loader;
use crate::data::model::{DailyRecord, Datasets, HourlyRecord};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state of one session, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Directory the tables were (or failed to be) loaded from.
    pub data_dir: PathBuf,

    /// Loaded tables (None until a load succeeds).
    pub datasets: Option<Datasets>,

    /// Fatal load error; charts are not shown while set.
    pub load_error: Option<String>,

    /// Sidebar criteria (None until a dataset is loaded).
    pub criteria: Option<FilterCriteria>,

    /// Which chart group is shown.
    pub chart: ChartKind,

    /// Apply the criteria to the hourly table and the monthly trend too.
    pub scope_hourly: bool,

    /// Indices into `daily` passing the criteria, plus warnings (cached).
    pub outcome: FilterOutcome,

    /// Data for the selected chart (cached).
    pub chart_data: Option<ChartData>,

    /// Distinct season / weather codes for the selectors.
    pub season_options: Vec<u8>,
    pub weather_options: Vec<u8>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            config,
            datasets: None,
            load_error: None,
            criteria: None,
            chart: ChartKind::default(),
            scope_hourly: false,
            outcome: FilterOutcome::default(),
            chart_data: None,
            season_options: Vec::new(),
            weather_options: Vec::new(),
            status_message: None,
        }
    }

    /// Load both tables from `dir`. On failure the previous tables are
    /// dropped: a session never shows partial data.
    pub fn load(&mut self, dir: &Path) {
        self.data_dir = dir.to_path_buf();
        match loader::load_datasets(dir, &self.config) {
            Ok(datasets) => self.set_datasets(datasets),
            Err(e) => {
                log::error!("Failed to load data: {e}");
                self.datasets = None;
                self.criteria = None;
                self.chart_data = None;
                self.outcome = FilterOutcome::default();
                self.load_error = Some(e.to_string());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest freshly loaded tables and reset the criteria to "everything".
    pub fn set_datasets(&mut self, datasets: Datasets) {
        self.criteria = FilterCriteria::spanning(&datasets.daily);
        self.season_options = filter::season_options(&datasets.daily);
        self.weather_options = filter::weather_options(&datasets.daily);
        self.datasets = Some(datasets);
        self.load_error = None;
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the filtered view and the selected chart's data.
    pub fn refilter(&mut self) {
        let (Some(ds), Some(criteria)) = (&self.datasets, self.criteria) else {
            return;
        };

        let outcome = filter::apply(&ds.daily, &criteria);
        let filtered = filter::filter_daily(&ds.daily, &criteria);

        let scoped: Vec<HourlyRecord>;
        let (hourly, trend_daily): (&[HourlyRecord], Vec<&DailyRecord>) = if self.scope_hourly {
            scoped = ds
                .hourly
                .iter()
                .filter(|r| criteria.matches(*r))
                .cloned()
                .collect();
            (scoped.as_slice(), filtered.clone())
        } else {
            (ds.hourly.as_slice(), ds.daily.iter().collect())
        };

        let data = chart::build(
            self.chart,
            &ChartInputs {
                filtered_daily: &filtered,
                trend_daily: &trend_daily,
                hourly,
                histogram_bins: self.config.histogram_bins,
                count_overflow: self.config.count_overflow,
            },
        );
        log::debug!(
            "{} of {} daily rows pass {:?}",
            outcome.indices.len(),
            ds.daily.len(),
            criteria
        );

        self.chart_data = Some(data);
        self.outcome = outcome;
    }

    // -- Mutators used by the side panel; each triggers a recompute --

    pub fn set_chart(&mut self, chart: ChartKind) {
        if self.chart != chart {
            self.chart = chart;
            self.refilter();
        }
    }

    pub fn set_season(&mut self, season: Selection<u8>) {
        self.update_criteria(|c| c.season = season);
    }

    pub fn set_weather(&mut self, weather: Selection<u8>) {
        self.update_criteria(|c| c.weather = weather);
    }

    pub fn set_date_range(&mut self, from: NaiveDate, to: NaiveDate) {
        self.update_criteria(|c| {
            c.date_from = from;
            c.date_to = to;
        });
    }

    pub fn set_scope_hourly(&mut self, scoped: bool) {
        if self.scope_hourly != scoped {
            self.scope_hourly = scoped;
            self.refilter();
        }
    }

    fn update_criteria(&mut self, f: impl FnOnce(&mut FilterCriteria)) {
        if let Some(criteria) = self.criteria.as_mut() {
            let before = *criteria;
            f(criteria);
            if before != *criteria {
                self.refilter();
            }
        }
    }

    // -- Read helpers for the UI --

    /// Daily rows of the current filtered view, in date order.
    pub fn filtered_rows(&self) -> impl Iterator<Item = &DailyRecord> + '_ {
        let daily = self.datasets.as_ref().map(|d| d.daily.as_slice()).unwrap_or(&[]);
        self.outcome.indices.iter().map(move |&i| &daily[i])
    }

    pub fn warnings(&self) -> &[FilterWarning] {
        &self.outcome.warnings
    }

    /// `true` when the criteria exclude nothing.
    pub fn is_unfiltered(&self) -> bool {
        match (&self.datasets, &self.criteria) {
            (Some(ds), Some(c)) => ds.date_bounds().is_some_and(|b| c.is_unrestricted(b)),
            _ => true,
        }
    }
}
