use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::binning::CountOverflow;
use crate::error::ConfigError;

/// Config file looked up in the working directory when `BIKE_DASH_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "bike-dash.json";
pub const CONFIG_PATH_ENV: &str = "BIKE_DASH_CONFIG";
pub const DATA_DIR_ENV: &str = "BIKE_DASH_DATA_DIR";

/// Dashboard settings. Every field has a default, so an empty JSON object
/// (or no file at all) is a valid configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory holding the two CSV files.
    pub data_dir: PathBuf,
    pub daily_file: String,
    pub hourly_file: String,
    /// Bin count of the daily rental histogram.
    pub histogram_bins: usize,
    /// Rows shown in the filtered-data preview.
    pub preview_rows: usize,
    /// What to do with hourly counts at or above the top tier edge.
    pub count_overflow: CountOverflow,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            daily_file: "day.csv".to_string(),
            hourly_file: "hour.csv".to_string(),
            histogram_bins: 30,
            preview_rows: 5,
            count_overflow: CountOverflow::Unclassified,
        }
    }
}

impl DashboardConfig {
    /// Resolve the configuration from the environment: the file named by
    /// `BIKE_DASH_CONFIG` (must exist), else `bike-dash.json` if present,
    /// else defaults. `BIKE_DASH_DATA_DIR` overrides `data_dir` last.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::load(Path::new(&path))?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            ConfigError::JsonParse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.histogram_bins == 0 {
            return Err(ConfigError::Invalid {
                field: "histogram_bins".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.daily_file.is_empty() || self.hourly_file.is_empty() {
            return Err(ConfigError::Invalid {
                field: "daily_file/hourly_file".to_string(),
                message: "file names must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
