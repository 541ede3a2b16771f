/// Data layer: record types, loading, filtering, aggregation and binning.
///
/// Architecture:
/// ```text
///  day.csv / hour.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  csv + serde → Vec<DailyRecord>, Vec<HourlyRecord>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  season / weather / date range → filtered indices
///   └──────────┘
///        │
///        ├──────────────┬──────────────┐
///        ▼              ▼              ▼
///   ┌───────────┐  ┌─────────┐   ┌─────────┐
///   │ aggregate │  │ binning │   │  stats  │
///   └───────────┘  └─────────┘   └─────────┘
///    group-by means  fixed-edge    histogram, KDE,
///                    labels        box summary, fit
/// ```

pub mod aggregate;
pub mod binning;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
