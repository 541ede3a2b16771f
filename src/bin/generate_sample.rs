use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Shared column layout of both files; `hr` is skipped for the daily file.
#[derive(Serialize, Clone)]
struct Row {
    instant: u32,
    dteday: NaiveDate,
    season: u8,
    yr: u8,
    mnth: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    hr: Option<u8>,
    holiday: u8,
    weekday: u32,
    workingday: u8,
    weathersit: u8,
    temp: f64,
    atemp: f64,
    hum: f64,
    windspeed: f64,
    casual: u32,
    registered: u32,
    cnt: u32,
}

fn season_of(month: u32) -> u8 {
    match month {
        12 | 1 | 2 => 1,
        3..=5 => 2,
        6..=8 => 3,
        _ => 4,
    }
}

fn is_holiday(date: NaiveDate) -> bool {
    matches!((date.month(), date.day()), (1, 1) | (7, 4) | (12, 25))
}

/// Relative demand per hour: commuter peaks on working days, a midday hump otherwise.
fn hourly_profile(hr: u8, working: bool) -> f64 {
    let h = hr as f64;
    let bump = |center: f64, width: f64| (-(h - center).powi(2) / (2.0 * width * width)).exp();
    if working {
        0.05 + 1.6 * bump(8.0, 1.0) + 1.9 * bump(17.5, 1.5) + 0.5 * bump(12.5, 2.5)
    } else {
        0.05 + 1.2 * bump(14.0, 3.5)
    }
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let start = NaiveDate::from_ymd_opt(2011, 1, 1).context("start date")?;
    let end = NaiveDate::from_ymd_opt(2012, 12, 31).context("end date")?;

    let mut daily_rows: Vec<Row> = Vec::new();
    let mut hourly_rows: Vec<Row> = Vec::new();

    for (day_idx, date) in start.iter_days().take_while(|d| *d <= end).enumerate() {
        let month = date.month();
        let yr = (date.year() - 2011) as u8;
        let holiday = is_holiday(date);
        let weekday = date.weekday();
        let working = !holiday && !matches!(weekday, Weekday::Sat | Weekday::Sun);

        let doy = date.ordinal() as f64;
        let seasonal = 0.5 - 0.3 * (2.0 * std::f64::consts::PI * (doy - 15.0) / 365.0).cos();
        let temp = (seasonal + rng.gauss(0.0, 0.05)).clamp(0.05, 0.95);
        let hum = (0.6 + rng.gauss(0.0, 0.12)).clamp(0.2, 1.0);
        let windspeed = (0.19 + rng.gauss(0.0, 0.07)).clamp(0.02, 0.5);
        let weathersit = match rng.next_f64() {
            p if p < 0.63 => 1,
            p if p < 0.97 => 2,
            _ => 3,
        };

        let weather_factor = [1.0, 0.8, 0.35][weathersit as usize - 1];
        let growth = if yr == 0 { 1.0 } else { 1.6 };
        let base = 220.0 * growth * weather_factor * (0.4 + 1.2 * temp);

        let mut day_casual = 0;
        let mut day_registered = 0;
        for hr in 0..24u8 {
            let expected = base * hourly_profile(hr, working);
            let cnt = (expected * (1.0 + rng.gauss(0.0, 0.15))).round().max(0.0) as u32;
            let casual_share = if working { 0.12 } else { 0.35 };
            let casual = (cnt as f64 * casual_share).round() as u32;
            let registered = cnt - casual;
            day_casual += casual;
            day_registered += registered;

            hourly_rows.push(Row {
                instant: hourly_rows.len() as u32 + 1,
                dteday: date,
                season: season_of(month),
                yr,
                mnth: month,
                hr: Some(hr),
                holiday: holiday as u8,
                weekday: weekday.num_days_from_sunday(),
                workingday: working as u8,
                weathersit,
                temp,
                atemp: (temp * 0.95 + 0.02).min(1.0),
                hum,
                windspeed,
                casual,
                registered,
                cnt,
            });
        }

        daily_rows.push(Row {
            instant: day_idx as u32 + 1,
            dteday: date,
            season: season_of(month),
            yr,
            mnth: month,
            hr: None,
            holiday: holiday as u8,
            weekday: weekday.num_days_from_sunday(),
            workingday: working as u8,
            weathersit,
            temp,
            atemp: (temp * 0.95 + 0.02).min(1.0),
            hum,
            windspeed,
            casual: day_casual,
            registered: day_registered,
            cnt: day_casual + day_registered,
        });
    }

    for (name, rows) in [("day.csv", &daily_rows), ("hour.csv", &hourly_rows)] {
        let path = out_dir.join(name);
        let mut writer =
            csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;
        for row in rows {
            writer
                .serialize(row)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        writer.flush()?;
        println!("Wrote {} rows to {}", rows.len(), path.display());
    }

    Ok(())
}
