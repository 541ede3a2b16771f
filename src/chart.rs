use std::fmt;

use crate::data::aggregate::{self, AggregateTable};
use crate::data::binning::{BinnedHourly, CountOverflow, CountTier, TimeOfDay};
use crate::data::model::{DailyRecord, HourlyRecord};
use crate::data::stats::{self, BoxSummary, HistogramBin, LinearFit};

// ---------------------------------------------------------------------------
// Chart selection
// ---------------------------------------------------------------------------

/// The four chart groups offered in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Distribution,
    Trend,
    WeatherPattern,
    Binned,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Distribution,
        ChartKind::Trend,
        ChartKind::WeatherPattern,
        ChartKind::Binned,
    ];
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChartKind::Distribution => "Rental distribution",
            ChartKind::Trend => "Hourly & monthly trends",
            ChartKind::WeatherPattern => "Weather patterns",
            ChartKind::Binned => "Binned (time of day / count tier)",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Chart data – one variant per chart group
// ---------------------------------------------------------------------------

/// Scatter points with their least-squares line (if one exists).
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterFit {
    pub points: Vec<[f64; 2]>,
    pub fit: Option<LinearFit>,
}

impl ScatterFit {
    fn from_pairs(points: Vec<[f64; 2]>) -> Self {
        let xs: Vec<f64> = points.iter().map(|p| p[0]).collect();
        let ys: Vec<f64> = points.iter().map(|p| p[1]).collect();
        let fit = stats::linear_fit(&xs, &ys);
        Self { points, fit }
    }
}

/// Everything one chart group needs to render, precomputed off the UI path.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Distribution {
        histogram: Vec<HistogramBin>,
        /// Density curve scaled to histogram counts.
        kde: Vec<[f64; 2]>,
    },
    Trend {
        by_hour: AggregateTable,
        by_hour_workingday: AggregateTable,
        by_month: AggregateTable,
    },
    WeatherPattern {
        rows: usize,
        boxes: Vec<(u8, BoxSummary)>,
        temp: ScatterFit,
        windspeed: ScatterFit,
    },
    Binned {
        time_of_day: Vec<(TimeOfDay, Option<BoxSummary>)>,
        tiers: Vec<(CountTier, usize)>,
        unclassified: usize,
    },
}

/// Inputs shared by all chart builders.
pub struct ChartInputs<'a> {
    /// Daily rows passing the sidebar filters.
    pub filtered_daily: &'a [&'a DailyRecord],
    /// Daily rows used for the monthly trend.
    pub trend_daily: &'a [&'a DailyRecord],
    /// Hourly rows used for the hourly trend and binning.
    pub hourly: &'a [HourlyRecord],
    pub histogram_bins: usize,
    pub count_overflow: CountOverflow,
}

const KDE_POINTS: usize = 200;

/// Compute the data for `kind`. Each variant only touches what it draws.
pub fn build(kind: ChartKind, inputs: &ChartInputs<'_>) -> ChartData {
    match kind {
        ChartKind::Distribution => distribution(inputs),
        ChartKind::Trend => trend(inputs),
        ChartKind::WeatherPattern => weather_pattern(inputs),
        ChartKind::Binned => binned(inputs),
    }
}

fn distribution(inputs: &ChartInputs<'_>) -> ChartData {
    let counts: Vec<f64> = inputs.filtered_daily.iter().map(|r| r.cnt as f64).collect();
    let histogram = stats::histogram(&counts, inputs.histogram_bins);
    let bin_width = histogram.first().map(|b| b.width()).unwrap_or(1.0);
    let scale = counts.len() as f64 * bin_width;
    let kde = stats::gaussian_kde(&counts, KDE_POINTS)
        .into_iter()
        .map(|[x, d]| [x, d * scale])
        .collect();
    ChartData::Distribution { histogram, kde }
}

fn trend(inputs: &ChartInputs<'_>) -> ChartData {
    ChartData::Trend {
        by_hour: aggregate::mean_by_hour(inputs.hourly),
        by_hour_workingday: aggregate::mean_by_hour_and_workingday(inputs.hourly),
        by_month: aggregate::mean_by_month(inputs.trend_daily.iter().copied()),
    }
}

fn weather_pattern(inputs: &ChartInputs<'_>) -> ChartData {
    let rows = inputs.filtered_daily;

    let mut codes: Vec<u8> = rows.iter().map(|r| r.weathersit).collect();
    codes.sort_unstable();
    codes.dedup();
    let boxes = codes
        .into_iter()
        .filter_map(|code| {
            let values: Vec<f64> = rows
                .iter()
                .filter(|r| r.weathersit == code)
                .map(|r| r.cnt as f64)
                .collect();
            stats::box_summary(&values).map(|s| (code, s))
        })
        .collect();

    ChartData::WeatherPattern {
        rows: rows.len(),
        boxes,
        temp: ScatterFit::from_pairs(rows.iter().map(|r| [r.temp, r.cnt as f64]).collect()),
        windspeed: ScatterFit::from_pairs(
            rows.iter().map(|r| [r.windspeed, r.cnt as f64]).collect(),
        ),
    }
}

fn binned(inputs: &ChartInputs<'_>) -> ChartData {
    let labels = BinnedHourly::from_records(inputs.hourly, inputs.count_overflow);
    let time_of_day = labels
        .counts_by_time_of_day(inputs.hourly)
        .into_iter()
        .map(|(tod, values)| (tod, stats::box_summary(&values)))
        .collect();
    let (tiers, unclassified) = labels.tier_counts();
    if unclassified > 0 {
        log::debug!("{unclassified} hourly rows fall outside the count tiers");
    }
    ChartData::Binned {
        time_of_day,
        tiers,
        unclassified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::GroupKey;
    use crate::data::model::fixtures::{daily, date, hourly};

    fn sample_daily() -> Vec<DailyRecord> {
        let mut rows = Vec::new();
        for d in 1..=28 {
            let weather = (d % 3 + 1) as u8;
            let mut r = daily(date(2011, 2, d), 1, weather, 1000 + d * 50);
            r.temp = 0.1 + d as f64 * 0.01;
            rows.push(r);
        }
        rows
    }

    fn inputs<'a>(
        filtered: &'a [&'a DailyRecord],
        hourly: &'a [HourlyRecord],
    ) -> ChartInputs<'a> {
        ChartInputs {
            filtered_daily: filtered,
            trend_daily: filtered,
            hourly,
            histogram_bins: 10,
            count_overflow: CountOverflow::Unclassified,
        }
    }

    #[test]
    fn test_distribution_histogram_and_scaled_kde() {
        let rows = sample_daily();
        let refs: Vec<&DailyRecord> = rows.iter().collect();
        match build(ChartKind::Distribution, &inputs(&refs, &[])) {
            ChartData::Distribution { histogram, kde } => {
                assert_eq!(histogram.len(), 10);
                assert_eq!(histogram.iter().map(|b| b.count).sum::<usize>(), 28);
                assert_eq!(kde.len(), KDE_POINTS);
                let peak = kde.iter().map(|p| p[1]).fold(0.0, f64::max);
                // Scaled to counts, so it sits on the histogram's scale.
                assert!(peak > 1.0 && peak < 10.0, "peak = {peak}");
            }
            other => panic!("unexpected chart data: {other:?}"),
        }
    }

    #[test]
    fn test_trend_tables() {
        let rows = sample_daily();
        let refs: Vec<&DailyRecord> = rows.iter().collect();
        let hours: Vec<HourlyRecord> = (0..24).map(|h| hourly(h, h as u8 % 2, 10)).collect();
        match build(ChartKind::Trend, &inputs(&refs, &hours)) {
            ChartData::Trend {
                by_hour,
                by_hour_workingday,
                by_month,
            } => {
                assert_eq!(by_hour.len(), 24);
                assert_eq!(by_hour_workingday.len(), 24);
                assert_eq!(by_month.rows[0].key, GroupKey::Month(2));
            }
            other => panic!("unexpected chart data: {other:?}"),
        }
    }

    #[test]
    fn test_weather_pattern_groups_by_code() {
        let rows = sample_daily();
        let refs: Vec<&DailyRecord> = rows.iter().collect();
        match build(ChartKind::WeatherPattern, &inputs(&refs, &[])) {
            ChartData::WeatherPattern {
                rows,
                boxes,
                temp,
                windspeed,
            } => {
                assert_eq!(rows, 28);
                let codes: Vec<u8> = boxes.iter().map(|(c, _)| *c).collect();
                assert_eq!(codes, vec![1, 2, 3]);
                assert!(temp.fit.unwrap().slope > 0.0);
                // Constant wind speed in the fixtures: no line to fit.
                assert!(windspeed.fit.is_none());
                assert_eq!(windspeed.points.len(), 28);
            }
            other => panic!("unexpected chart data: {other:?}"),
        }
    }

    #[test]
    fn test_weather_pattern_on_empty_view() {
        match build(ChartKind::WeatherPattern, &inputs(&[], &[])) {
            ChartData::WeatherPattern { rows, boxes, temp, .. } => {
                assert_eq!(rows, 0);
                assert!(boxes.is_empty());
                assert!(temp.fit.is_none());
            }
            other => panic!("unexpected chart data: {other:?}"),
        }
    }

    #[test]
    fn test_binned_reports_unclassified() {
        let hours = vec![hourly(3, 0, 5), hourly(8, 1, 650), hourly(17, 1, 320)];
        match build(ChartKind::Binned, &inputs(&[], &hours)) {
            ChartData::Binned {
                time_of_day,
                tiers,
                unclassified,
            } => {
                assert_eq!(time_of_day.len(), 4);
                assert!(time_of_day[0].1.is_some());
                assert_eq!(unclassified, 1);
                assert_eq!(tiers[2], (CountTier::High, 1));
            }
            other => panic!("unexpected chart data: {other:?}"),
        }
    }
}
