use std::collections::BTreeMap;
use std::fmt;

use super::model::{DailyRecord, HourlyRecord, NumericRow};

// ---------------------------------------------------------------------------
// Group keys and the aggregate table
// ---------------------------------------------------------------------------

/// Grouping key of one aggregate row. `Ord` gives the output order:
/// ascending hour, then `false` (weekend/holiday) before `true` (working day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    Hour(u8),
    HourWorkingday(u8, bool),
    Month(u32),
}

impl GroupKey {
    /// Position on the chart x axis.
    pub fn x(&self) -> f64 {
        match self {
            GroupKey::Hour(h) | GroupKey::HourWorkingday(h, _) => *h as f64,
            GroupKey::Month(m) => *m as f64,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Hour(h) => write!(f, "{h:02}h"),
            GroupKey::HourWorkingday(h, true) => write!(f, "{h:02}h working day"),
            GroupKey::HourWorkingday(h, false) => write!(f, "{h:02}h weekend/holiday"),
            GroupKey::Month(m) => write!(f, "month {m}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub key: GroupKey,
    /// Number of source rows in the group.
    pub count: usize,
    /// Means aligned with [`AggregateTable::columns`].
    pub means: Vec<f64>,
}

/// Group-by result: the averaged column names and one row per key, sorted by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateTable {
    pub columns: Vec<&'static str>,
    pub rows: Vec<AggregateRow>,
}

impl AggregateTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| *c == name)
    }

    /// `(key, mean)` pairs for one averaged column, in table order.
    pub fn series(&self, name: &str) -> Option<Vec<(GroupKey, f64)>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| (r.key, r.means[idx])).collect())
    }
}

/// Average every numeric column except `exclude`, grouped by `key_of`.
fn group_mean<'a, R, I, F>(rows: I, exclude: &[&str], key_of: F) -> AggregateTable
where
    R: NumericRow + 'a,
    I: IntoIterator<Item = &'a R>,
    F: Fn(&R) -> GroupKey,
{
    let kept: Vec<usize> = R::NUMERIC_COLUMNS
        .iter()
        .enumerate()
        .filter(|(_, name)| !exclude.contains(*name))
        .map(|(i, _)| i)
        .collect();

    let mut groups: BTreeMap<GroupKey, (usize, Vec<f64>)> = BTreeMap::new();
    for row in rows {
        let values = row.numeric_values();
        let (count, sums) = groups
            .entry(key_of(row))
            .or_insert_with(|| (0, vec![0.0; kept.len()]));
        *count += 1;
        for (sum, &i) in sums.iter_mut().zip(&kept) {
            *sum += values[i];
        }
    }

    AggregateTable {
        columns: kept.iter().map(|&i| R::NUMERIC_COLUMNS[i]).collect(),
        rows: groups
            .into_iter()
            .map(|(key, (count, sums))| AggregateRow {
                key,
                count,
                means: sums.into_iter().map(|s| s / count as f64).collect(),
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Public group-bys
// ---------------------------------------------------------------------------

/// Mean of the hourly numeric columns per hour of day.
pub fn mean_by_hour<'a>(hourly: impl IntoIterator<Item = &'a HourlyRecord>) -> AggregateTable {
    group_mean(hourly, &["hr"], |r: &HourlyRecord| GroupKey::Hour(r.hr))
}

/// Mean of the hourly numeric columns per (hour, working day) pair.
pub fn mean_by_hour_and_workingday<'a>(
    hourly: impl IntoIterator<Item = &'a HourlyRecord>,
) -> AggregateTable {
    group_mean(hourly, &["hr", "workingday"], |r: &HourlyRecord| {
        GroupKey::HourWorkingday(r.hr, r.is_working_day())
    })
}

/// Mean of the daily numeric columns per calendar month of `dteday`.
pub fn mean_by_month<'a>(daily: impl IntoIterator<Item = &'a DailyRecord>) -> AggregateTable {
    group_mean(daily, &["mnth"], |r: &DailyRecord| GroupKey::Month(r.month()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{daily, date, hourly};
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_by_hour_covers_all_hours_in_order() {
        let rows: Vec<HourlyRecord> = (0..24u8)
            .rev()
            .flat_map(|h| [hourly(h, 0, h as u32), hourly(h, 1, h as u32 + 10)])
            .collect();
        let table = mean_by_hour(&rows);

        assert_eq!(table.len(), 24);
        for (i, row) in table.rows.iter().enumerate() {
            assert_eq!(row.key, GroupKey::Hour(i as u8));
            assert_eq!(row.count, 2);
        }
        let cnt = table.series("cnt").unwrap();
        assert_relative_eq!(cnt[3].1, 8.0);
        assert!(table.column_index("hr").is_none());
    }

    #[test]
    fn test_mean_by_hour_and_workingday_order() {
        let rows = vec![
            hourly(8, 1, 400),
            hourly(8, 0, 100),
            hourly(2, 1, 10),
            hourly(8, 1, 200),
        ];
        let table = mean_by_hour_and_workingday(&rows);
        let keys: Vec<GroupKey> = table.rows.iter().map(|r| r.key).collect();
        assert_eq!(
            keys,
            vec![
                GroupKey::HourWorkingday(2, true),
                GroupKey::HourWorkingday(8, false),
                GroupKey::HourWorkingday(8, true),
            ]
        );
        let cnt = table.series("cnt").unwrap();
        assert_relative_eq!(cnt[2].1, 300.0);
        assert!(table.column_index("workingday").is_none());
    }

    #[test]
    fn test_mean_by_month_uses_date() {
        let rows = vec![
            daily(date(2011, 1, 1), 1, 1, 100),
            daily(date(2012, 1, 5), 1, 1, 300),
            daily(date(2011, 3, 1), 1, 1, 50),
        ];
        let table = mean_by_month(&rows);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].key, GroupKey::Month(1));
        assert_eq!(table.rows[1].key, GroupKey::Month(3));
        let cnt = table.series("cnt").unwrap();
        assert_relative_eq!(cnt[0].1, 200.0);
        let temp = table.series("temp").unwrap();
        assert_relative_eq!(temp[1].1, 0.3);
    }

    #[test]
    fn test_empty_input_gives_empty_table() {
        let table = mean_by_hour(&Vec::<HourlyRecord>::new());
        assert!(table.is_empty());
        assert!(table.series("cnt").unwrap().is_empty());
        assert!(table.series("nope").is_none());
    }

    #[test]
    fn test_accepts_filtered_references() {
        let rows = vec![hourly(1, 0, 10), hourly(1, 0, 30), hourly(2, 0, 99)];
        let subset: Vec<&HourlyRecord> = rows.iter().filter(|r| r.hr == 1).collect();
        let table = mean_by_hour(subset.iter().copied());
        assert_eq!(table.len(), 1);
        assert_relative_eq!(table.series("cnt").unwrap()[0].1, 20.0);
    }
}
