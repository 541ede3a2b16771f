use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Column access shared by daily and hourly rows
// ---------------------------------------------------------------------------

/// Rows that expose their numeric columns by name, so group-by code can
/// average "every numeric column" without knowing the concrete row type.
pub trait NumericRow {
    /// Names of the numeric columns, in the order `numeric_values` yields them.
    const NUMERIC_COLUMNS: &'static [&'static str];

    /// Values of the numeric columns as `f64`, aligned with `NUMERIC_COLUMNS`.
    fn numeric_values(&self) -> Vec<f64>;
}

/// Rows the sidebar criteria can be applied to.
pub trait Filterable {
    fn date(&self) -> NaiveDate;
    fn season(&self) -> u8;
    fn weathersit(&self) -> u8;
}

// ---------------------------------------------------------------------------
// DailyRecord – one row of day.csv
// ---------------------------------------------------------------------------

/// Rental totals for one calendar date.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyRecord {
    pub instant: u32,
    pub dteday: NaiveDate,
    pub season: u8,
    pub yr: u8,
    pub mnth: u8,
    pub holiday: u8,
    pub weekday: u8,
    pub workingday: u8,
    pub weathersit: u8,
    /// Normalised temperature (0..1).
    pub temp: f64,
    /// Normalised feeling temperature (0..1).
    pub atemp: f64,
    pub hum: f64,
    /// Normalised wind speed (0..1).
    pub windspeed: f64,
    pub casual: u32,
    pub registered: u32,
    pub cnt: u32,
}

impl DailyRecord {
    /// Calendar month (1–12) taken from the parsed date.
    pub fn month(&self) -> u32 {
        self.dteday.month()
    }
}

impl NumericRow for DailyRecord {
    const NUMERIC_COLUMNS: &'static [&'static str] = &[
        "instant",
        "season",
        "yr",
        "mnth",
        "holiday",
        "weekday",
        "workingday",
        "weathersit",
        "temp",
        "atemp",
        "hum",
        "windspeed",
        "casual",
        "registered",
        "cnt",
    ];

    fn numeric_values(&self) -> Vec<f64> {
        vec![
            self.instant as f64,
            self.season as f64,
            self.yr as f64,
            self.mnth as f64,
            self.holiday as f64,
            self.weekday as f64,
            self.workingday as f64,
            self.weathersit as f64,
            self.temp,
            self.atemp,
            self.hum,
            self.windspeed,
            self.casual as f64,
            self.registered as f64,
            self.cnt as f64,
        ]
    }
}

impl Filterable for DailyRecord {
    fn date(&self) -> NaiveDate {
        self.dteday
    }
    fn season(&self) -> u8 {
        self.season
    }
    fn weathersit(&self) -> u8 {
        self.weathersit
    }
}

// ---------------------------------------------------------------------------
// HourlyRecord – one row of hour.csv
// ---------------------------------------------------------------------------

/// Rental totals for one hour of one date.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HourlyRecord {
    pub instant: u32,
    pub dteday: NaiveDate,
    pub season: u8,
    pub yr: u8,
    pub mnth: u8,
    /// Hour of day, 0–23 (checked by the loader).
    pub hr: u8,
    pub holiday: u8,
    pub weekday: u8,
    pub workingday: u8,
    pub weathersit: u8,
    pub temp: f64,
    pub atemp: f64,
    pub hum: f64,
    pub windspeed: f64,
    pub casual: u32,
    pub registered: u32,
    pub cnt: u32,
}

impl HourlyRecord {
    pub fn is_working_day(&self) -> bool {
        self.workingday != 0
    }
}

impl NumericRow for HourlyRecord {
    const NUMERIC_COLUMNS: &'static [&'static str] = &[
        "instant",
        "season",
        "yr",
        "mnth",
        "hr",
        "holiday",
        "weekday",
        "workingday",
        "weathersit",
        "temp",
        "atemp",
        "hum",
        "windspeed",
        "casual",
        "registered",
        "cnt",
    ];

    fn numeric_values(&self) -> Vec<f64> {
        vec![
            self.instant as f64,
            self.season as f64,
            self.yr as f64,
            self.mnth as f64,
            self.hr as f64,
            self.holiday as f64,
            self.weekday as f64,
            self.workingday as f64,
            self.weathersit as f64,
            self.temp,
            self.atemp,
            self.hum,
            self.windspeed,
            self.casual as f64,
            self.registered as f64,
            self.cnt as f64,
        ]
    }
}

impl Filterable for HourlyRecord {
    fn date(&self) -> NaiveDate {
        self.dteday
    }
    fn season(&self) -> u8 {
        self.season
    }
    fn weathersit(&self) -> u8 {
        self.weathersit
    }
}

// ---------------------------------------------------------------------------
// Datasets – both tables of one session
// ---------------------------------------------------------------------------

/// The two loaded tables. Immutable once built; `daily` is sorted by date.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub daily: Vec<DailyRecord>,
    pub hourly: Vec<HourlyRecord>,
}

impl Datasets {
    /// First and last date of the daily table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.daily.first()?.dteday;
        let last = self.daily.last()?.dteday;
        Some((first, last))
    }
}

// ---------------------------------------------------------------------------
// Category labels
// ---------------------------------------------------------------------------

/// Human label for a season code.
pub fn season_label(code: u8) -> String {
    match code {
        1 => "Winter".to_string(),
        2 => "Spring".to_string(),
        3 => "Summer".to_string(),
        4 => "Fall".to_string(),
        other => format!("Season {other}"),
    }
}

/// Human label for a weathersit code.
pub fn weather_label(code: u8) -> String {
    match code {
        1 => "Clear".to_string(),
        2 => "Mist / Cloudy".to_string(),
        3 => "Light rain / snow".to_string(),
        4 => "Heavy rain".to_string(),
        other => format!("Weather {other}"),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn daily(dteday: NaiveDate, season: u8, weathersit: u8, cnt: u32) -> DailyRecord {
        DailyRecord {
            instant: 1,
            dteday,
            season,
            yr: 0,
            mnth: dteday.month() as u8,
            holiday: 0,
            weekday: 0,
            workingday: 1,
            weathersit,
            temp: 0.3,
            atemp: 0.3,
            hum: 0.5,
            windspeed: 0.2,
            casual: cnt / 4,
            registered: cnt - cnt / 4,
            cnt,
        }
    }

    pub fn hourly(hr: u8, workingday: u8, cnt: u32) -> HourlyRecord {
        HourlyRecord {
            instant: 1,
            dteday: date(2011, 1, 1),
            season: 1,
            yr: 0,
            mnth: 1,
            hr,
            holiday: 0,
            weekday: 6,
            workingday,
            weathersit: 1,
            temp: 0.24,
            atemp: 0.28,
            hum: 0.81,
            windspeed: 0.0,
            casual: 0,
            registered: cnt,
            cnt,
        }
    }
}
