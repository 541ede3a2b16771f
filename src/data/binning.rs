use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::HourlyRecord;

// ---------------------------------------------------------------------------
// Fixed bin edges (right-open intervals)
// ---------------------------------------------------------------------------

/// Hour edges: [0,6) [6,12) [12,18) [18,24).
pub const TIME_OF_DAY_EDGES: [u32; 5] = [0, 6, 12, 18, 24];
/// Count edges: [0,100) [100,300) [300,600).
pub const COUNT_TIER_EDGES: [u32; 4] = [0, 100, 300, 600];

/// Index of the right-open bin containing `value`, or `None` outside all bins.
fn bin_index(edges: &[u32], value: u32) -> Option<usize> {
    edges
        .windows(2)
        .position(|w| value >= w[0] && value < w[1])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeOfDay {
    Night,
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Night,
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
    ];

    pub fn from_hour(hr: u8) -> Option<Self> {
        bin_index(&TIME_OF_DAY_EDGES, hr as u32).map(|i| Self::ALL[i])
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeOfDay::Night => "Night",
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CountTier {
    Low,
    Medium,
    High,
}

impl CountTier {
    pub const ALL: [CountTier; 3] = [CountTier::Low, CountTier::Medium, CountTier::High];

    pub fn from_count(cnt: u32, overflow: CountOverflow) -> Option<Self> {
        match bin_index(&COUNT_TIER_EDGES, cnt) {
            Some(i) => Some(Self::ALL[i]),
            None if overflow == CountOverflow::ClampToLast => Some(CountTier::High),
            None => None,
        }
    }
}

impl fmt::Display for CountTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CountTier::Low => "Low",
            CountTier::Medium => "Medium",
            CountTier::High => "High",
        };
        f.write_str(s)
    }
}

/// Handling of counts at or above the last tier edge (600).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountOverflow {
    /// Leave such rows without a tier.
    #[default]
    Unclassified,
    /// Put them in the last tier.
    ClampToLast,
}

// ---------------------------------------------------------------------------
// Derived label columns
// ---------------------------------------------------------------------------

/// Time-of-day label per hourly row.
pub fn bin_time_of_day(hourly: &[HourlyRecord]) -> Vec<Option<TimeOfDay>> {
    hourly.iter().map(|r| TimeOfDay::from_hour(r.hr)).collect()
}

/// Count-tier label per hourly row.
pub fn bin_count_tier(hourly: &[HourlyRecord], overflow: CountOverflow) -> Vec<Option<CountTier>> {
    hourly
        .iter()
        .map(|r| CountTier::from_count(r.cnt, overflow))
        .collect()
}

/// The two derived columns, aligned index-for-index with the hourly rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinnedHourly {
    pub time_of_day: Vec<Option<TimeOfDay>>,
    pub count_tier: Vec<Option<CountTier>>,
}

impl BinnedHourly {
    pub fn from_records(hourly: &[HourlyRecord], overflow: CountOverflow) -> Self {
        Self {
            time_of_day: bin_time_of_day(hourly),
            count_tier: bin_count_tier(hourly, overflow),
        }
    }

    /// Hourly `cnt` values grouped by time-of-day label, in label order.
    pub fn counts_by_time_of_day(&self, hourly: &[HourlyRecord]) -> Vec<(TimeOfDay, Vec<f64>)> {
        TimeOfDay::ALL
            .iter()
            .map(|&tod| {
                let values = hourly
                    .iter()
                    .zip(&self.time_of_day)
                    .filter(|(_, label)| **label == Some(tod))
                    .map(|(r, _)| r.cnt as f64)
                    .collect();
                (tod, values)
            })
            .collect()
    }

    /// Number of rows per tier, plus the number of rows without a tier.
    pub fn tier_counts(&self) -> (Vec<(CountTier, usize)>, usize) {
        let per_tier = CountTier::ALL
            .iter()
            .map(|&t| (t, self.count_tier.iter().filter(|l| **l == Some(t)).count()))
            .collect();
        let unclassified = self.count_tier.iter().filter(|l| l.is_none()).count();
        (per_tier, unclassified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::hourly;

    #[test]
    fn test_time_of_day_edges() {
        assert_eq!(TimeOfDay::from_hour(0), Some(TimeOfDay::Night));
        assert_eq!(TimeOfDay::from_hour(5), Some(TimeOfDay::Night));
        assert_eq!(TimeOfDay::from_hour(6), Some(TimeOfDay::Morning));
        assert_eq!(TimeOfDay::from_hour(12), Some(TimeOfDay::Afternoon));
        assert_eq!(TimeOfDay::from_hour(18), Some(TimeOfDay::Evening));
        assert_eq!(TimeOfDay::from_hour(23), Some(TimeOfDay::Evening));
        assert_eq!(TimeOfDay::from_hour(24), None);
    }

    #[test]
    fn test_count_tier_edges() {
        let u = CountOverflow::Unclassified;
        assert_eq!(CountTier::from_count(0, u), Some(CountTier::Low));
        assert_eq!(CountTier::from_count(99, u), Some(CountTier::Low));
        assert_eq!(CountTier::from_count(100, u), Some(CountTier::Medium));
        assert_eq!(CountTier::from_count(300, u), Some(CountTier::High));
        assert_eq!(CountTier::from_count(599, u), Some(CountTier::High));
        assert_eq!(CountTier::from_count(600, u), None);
    }

    #[test]
    fn test_clamp_overflow_policy() {
        let c = CountOverflow::ClampToLast;
        assert_eq!(CountTier::from_count(600, c), Some(CountTier::High));
        assert_eq!(CountTier::from_count(977, c), Some(CountTier::High));
        assert_eq!(CountTier::from_count(42, c), Some(CountTier::Low));
    }

    #[test]
    fn test_binning_is_idempotent() {
        let rows: Vec<_> = (0..24).map(|h| hourly(h, 1, h as u32 * 40)).collect();
        assert_eq!(bin_time_of_day(&rows), bin_time_of_day(&rows));
        assert_eq!(
            BinnedHourly::from_records(&rows, CountOverflow::Unclassified),
            BinnedHourly::from_records(&rows, CountOverflow::Unclassified)
        );
    }

    #[test]
    fn test_labels_align_with_rows() {
        let rows = vec![hourly(5, 0, 10), hourly(6, 1, 150), hourly(23, 1, 700)];
        let binned = BinnedHourly::from_records(&rows, CountOverflow::Unclassified);
        assert_eq!(
            binned.time_of_day,
            vec![
                Some(TimeOfDay::Night),
                Some(TimeOfDay::Morning),
                Some(TimeOfDay::Evening)
            ]
        );
        assert_eq!(
            binned.count_tier,
            vec![Some(CountTier::Low), Some(CountTier::Medium), None]
        );

        let (per_tier, unclassified) = binned.tier_counts();
        assert_eq!(
            per_tier,
            vec![(CountTier::Low, 1), (CountTier::Medium, 1), (CountTier::High, 0)]
        );
        assert_eq!(unclassified, 1);
    }

    #[test]
    fn test_counts_by_time_of_day() {
        let rows = vec![hourly(1, 0, 10), hourly(2, 0, 20), hourly(19, 1, 300)];
        let binned = BinnedHourly::from_records(&rows, CountOverflow::Unclassified);
        let groups = binned.counts_by_time_of_day(&rows);
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[0], (TimeOfDay::Night, vec![10.0, 20.0]));
        assert!(groups[1].1.is_empty());
        assert_eq!(groups[3], (TimeOfDay::Evening, vec![300.0]));
    }
}
