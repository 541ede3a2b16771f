use std::collections::BTreeSet;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::model::{DailyRecord, Datasets, HourlyRecord};
use crate::config::DashboardConfig;
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load both tables from `dir`, using the file names from `config`.
pub fn load_datasets(dir: &Path, config: &DashboardConfig) -> Result<Datasets, LoadError> {
    let daily = load_daily(&dir.join(&config.daily_file))?;
    let hourly = load_hourly(&dir.join(&config.hourly_file))?;
    log::info!(
        "Loaded {} daily and {} hourly rows from {}",
        daily.len(),
        hourly.len(),
        dir.display()
    );
    Ok(Datasets { daily, hourly })
}

/// Load `day.csv`. The result is sorted by date; a repeated date is an error.
pub fn load_daily(path: &Path) -> Result<Vec<DailyRecord>, LoadError> {
    let mut rows: Vec<DailyRecord> = read_rows(path)?;
    rows.sort_by_key(|r| r.dteday);

    let mut seen = BTreeSet::new();
    for row in &rows {
        if !seen.insert(row.dteday) {
            return Err(LoadError::DuplicateDate {
                path: path.to_path_buf(),
                date: row.dteday,
            });
        }
    }
    Ok(rows)
}

/// Load `hour.csv`, rejecting rows whose `hr` is not a valid hour.
pub fn load_hourly(path: &Path) -> Result<Vec<HourlyRecord>, LoadError> {
    let rows: Vec<HourlyRecord> = read_rows(path)?;
    if let Some((row, rec)) = rows.iter().enumerate().find(|(_, r)| r.hr > 23) {
        return Err(LoadError::HourOutOfRange {
            path: path.to_path_buf(),
            row,
            hr: rec.hr,
        });
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Header row with column names; columns are matched to struct fields by
/// name and any extra columns are ignored.
fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let csv_err = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let rows = reader
        .deserialize::<T>()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(csv_err)?;

    if rows.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    log::debug!("{}: {} rows", path.display(), rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::date;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const DAILY_HEADER: &str = "instant,dteday,season,yr,mnth,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt";
    const HOURLY_HEADER: &str = "instant,dteday,season,yr,mnth,hr,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt";

    fn temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_daily_parses_and_sorts() {
        let file = temp_csv(&format!(
            "{DAILY_HEADER}\n\
             2,2011-01-02,1,0,1,0,0,0,2,0.363478,0.353739,0.696087,0.248539,131,670,801\n\
             1,2011-01-01,1,0,1,0,6,0,2,0.344167,0.363625,0.805833,0.160446,331,654,985\n"
        ));
        let rows = load_daily(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].dteday, date(2011, 1, 1));
        assert_eq!(rows[0].cnt, 985);
        assert_eq!(rows[1].weathersit, 2);
    }

    #[test]
    fn test_load_daily_rejects_duplicate_dates() {
        let file = temp_csv(&format!(
            "{DAILY_HEADER}\n\
             1,2011-01-01,1,0,1,0,6,0,2,0.3,0.3,0.8,0.1,331,654,985\n\
             2,2011-01-01,1,0,1,0,6,0,2,0.3,0.3,0.8,0.1,331,654,985\n"
        ));
        let err = load_daily(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateDate { .. }));
    }

    #[test]
    fn test_load_daily_malformed_date() {
        let file = temp_csv(&format!(
            "{DAILY_HEADER}\n1,not-a-date,1,0,1,0,6,0,2,0.3,0.3,0.8,0.1,331,654,985\n"
        ));
        let err = load_daily(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }));
    }

    #[test]
    fn test_load_missing_column_is_error() {
        let file = temp_csv("instant,dteday,cnt\n1,2011-01-01,5\n");
        assert!(matches!(
            load_daily(file.path()).unwrap_err(),
            LoadError::Csv { .. }
        ));
    }

    #[test]
    fn test_load_hourly_rejects_hour_24() {
        let file = temp_csv(&format!(
            "{HOURLY_HEADER}\n\
             1,2011-01-01,1,0,1,0,0,6,0,1,0.24,0.2879,0.81,0,3,13,16\n\
             2,2011-01-01,1,0,1,24,0,6,0,1,0.22,0.2727,0.8,0,8,32,40\n"
        ));
        match load_hourly(file.path()).unwrap_err() {
            LoadError::HourOutOfRange { row, hr, .. } => {
                assert_eq!(row, 1);
                assert_eq!(hr, 24);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_only_file_is_empty_error() {
        let file = temp_csv(&format!("{HOURLY_HEADER}\n"));
        assert!(matches!(
            load_hourly(file.path()).unwrap_err(),
            LoadError::Empty { .. }
        ));
    }

    #[test]
    fn test_load_datasets_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_datasets(dir.path(), &DashboardConfig::default()).unwrap_err();
        match err {
            LoadError::NotFound { path } => assert!(path.ends_with("day.csv")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_datasets_reads_both_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("day.csv"),
            format!("{DAILY_HEADER}\n1,2011-01-01,1,0,1,0,6,0,2,0.3,0.3,0.8,0.1,331,654,985\n"),
        )
        .unwrap();
        std::fs::write(
            dir.path().join("hour.csv"),
            format!("{HOURLY_HEADER}\n1,2011-01-01,1,0,1,0,0,6,0,1,0.24,0.2879,0.81,0,3,13,16\n"),
        )
        .unwrap();

        let ds = load_datasets(dir.path(), &DashboardConfig::default()).unwrap();
        assert_eq!(ds.daily.len(), 1);
        assert_eq!(ds.hourly.len(), 1);
        assert_eq!(ds.hourly[0].cnt, 16);
    }
}
