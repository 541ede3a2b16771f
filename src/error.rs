use std::io;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Failure to read one of the two source tables. Fatal for the session.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("data file not found: {path}")]
    NotFound { path: PathBuf },
    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{path} row {row}: hour {hr} is outside 0-23")]
    HourOutOfRange { path: PathBuf, row: usize, hr: u8 },
    #[error("{path}: date {date} appears more than once")]
    DuplicateDate { path: PathBuf, date: NaiveDate },
    #[error("{path} contains no rows")]
    Empty { path: PathBuf },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse JSON configuration in {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid value for '{field}': {message}")]
    Invalid { field: String, message: String },
}
