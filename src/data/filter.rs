use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;

use super::model::{DailyRecord, Filterable};

// ---------------------------------------------------------------------------
// Filter criteria: season / weather selection plus an inclusive date range
// ---------------------------------------------------------------------------

/// A selector value: either the "all" sentinel or one specific code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    /// Whether `value` passes this selection.
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(v) => v == value,
        }
    }
}

/// The sidebar criteria. `date_from > date_to` is allowed: it is reported by
/// [`FilterCriteria::validate`] and simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterCriteria {
    pub season: Selection<u8>,
    pub weather: Selection<u8>,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl FilterCriteria {
    /// Criteria that keep every row of `daily`: all seasons, all weather,
    /// first to last date. `None` when `daily` is empty.
    pub fn spanning(daily: &[DailyRecord]) -> Option<Self> {
        let from = daily.iter().map(|r| r.dteday).min()?;
        let to = daily.iter().map(|r| r.dteday).max()?;
        Some(Self {
            season: Selection::All,
            weather: Selection::All,
            date_from: from,
            date_to: to,
        })
    }

    /// `true` when nothing is excluded relative to a table spanning `bounds`.
    pub fn is_unrestricted(&self, bounds: (NaiveDate, NaiveDate)) -> bool {
        self.season == Selection::All
            && self.weather == Selection::All
            && self.date_from <= bounds.0
            && self.date_to >= bounds.1
    }

    pub fn validate(&self) -> Option<FilterWarning> {
        (self.date_from > self.date_to).then_some(FilterWarning::InvertedRange)
    }

    pub fn matches<R: Filterable>(&self, row: &R) -> bool {
        let date = row.date();
        date >= self.date_from
            && date <= self.date_to
            && self.season.matches(&row.season())
            && self.weather.matches(&row.weathersit())
    }
}

/// Non-fatal conditions shown to the user next to the filter controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterWarning {
    InvertedRange,
    EmptyResult,
}

impl fmt::Display for FilterWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterWarning::InvertedRange => write!(f, "Start date must not be after end date"),
            FilterWarning::EmptyResult => write!(f, "No data matches the selected filters"),
        }
    }
}

// ---------------------------------------------------------------------------
// Applying criteria
// ---------------------------------------------------------------------------

/// Indices of rows that pass `criteria`, in input order.
pub fn filtered_indices<R: Filterable>(rows: &[R], criteria: &FilterCriteria) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, r)| criteria.matches(*r))
        .map(|(i, _)| i)
        .collect()
}

/// Daily rows passing `criteria`. An empty result is not an error.
pub fn filter_daily<'a>(daily: &'a [DailyRecord], criteria: &FilterCriteria) -> Vec<&'a DailyRecord> {
    daily.iter().filter(|r| criteria.matches(*r)).collect()
}

/// Result of one filter pass: the matching indices plus any warnings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    pub indices: Vec<usize>,
    pub warnings: Vec<FilterWarning>,
}

impl FilterOutcome {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Filter `rows` and collect the warnings. An inverted range is reported but
/// still applied as given.
pub fn apply<R: Filterable>(rows: &[R], criteria: &FilterCriteria) -> FilterOutcome {
    let mut warnings = Vec::new();
    if let Some(w) = criteria.validate() {
        log::debug!("{w}: {} > {}", criteria.date_from, criteria.date_to);
        warnings.push(w);
    }
    let indices = filtered_indices(rows, criteria);
    if indices.is_empty() {
        warnings.push(FilterWarning::EmptyResult);
    }
    FilterOutcome { indices, warnings }
}

// ---------------------------------------------------------------------------
// Selector options
// ---------------------------------------------------------------------------

/// Distinct season codes present in the data, ascending.
pub fn season_options(daily: &[DailyRecord]) -> Vec<u8> {
    daily.iter().map(|r| r.season).collect::<BTreeSet<_>>().into_iter().collect()
}

/// Distinct weathersit codes present in the data, ascending.
pub fn weather_options(daily: &[DailyRecord]) -> Vec<u8> {
    daily
        .iter()
        .map(|r| r.weathersit)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
