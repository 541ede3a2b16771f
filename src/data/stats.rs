//! Summary statistics behind the charts: histogram with density overlay,
//! box-plot summaries and least-squares lines.

use std::f64::consts::PI;

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width bins spanning [min, max]; the last bin is closed on the right.
/// A constant input collapses into a single unit-width bin.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if (max - min).abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min - 0.5,
            end: min + 0.5,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Kernel density estimate
// ---------------------------------------------------------------------------

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1).
fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Gaussian KDE with Scott's bandwidth, evaluated at `points` evenly spaced
/// positions across the data range. Returns `(x, density)` pairs; empty when
/// fewer than two distinct values are present.
pub fn gaussian_kde(values: &[f64], points: usize) -> Vec<[f64; 2]> {
    let sd = std_dev(values);
    if sd <= 0.0 || points < 2 {
        return Vec::new();
    }
    let n = values.len() as f64;
    let bandwidth = sd * n.powf(-1.0 / 5.0);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (max - min) / (points - 1) as f64;
    let norm = 1.0 / (n * bandwidth * (2.0 * PI).sqrt());

    (0..points)
        .map(|i| {
            let x = min + i as f64 * step;
            let density = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm;
            [x, density]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Box plot summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Quantile of sorted data with linear interpolation between closest ranks.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Quartiles plus whiskers at the most extreme points within 1.5·IQR of the box.
pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let lo_fence = q1 - 1.5 * iqr;
    let hi_fence = q3 + 1.5 * iqr;

    let inside = sorted.iter().copied().filter(|v| *v >= lo_fence && *v <= hi_fence);
    let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min);
    let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < lo_fence || *v > hi_fence)
        .collect();

    Some(BoxSummary {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        outliers,
    })
}

// ---------------------------------------------------------------------------
// Linear regression
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordinary least squares. `None` with fewer than two points or no spread in x.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mx = mean(xs);
    let my = mean(ys);
    let sxx: f64 = xs.iter().map(|x| (x - mx).powi(2)).sum();
    if sxx.abs() < f64::EPSILON {
        return None;
    }
    let sxy: f64 = xs.iter().zip(ys).map(|(x, y)| (x - mx) * (y - my)).sum();
    let slope = sxy / sxx;
    Some(LinearFit {
        slope,
        intercept: my - slope * mx,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_histogram_counts_sum_to_len() {
        let values: Vec<f64> = (0..731).map(|i| (i * 37 % 8714) as f64).collect();
        let bins = histogram(&values, 30);
        assert_eq!(bins.len(), 30);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_relative_eq!(bins[0].start, 0.0);
    }

    #[test]
    fn test_histogram_max_lands_in_last_bin() {
        let bins = histogram(&[0.0, 5.0, 10.0], 2);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[1].count, 2);
        assert_relative_eq!(bins[1].end, 10.0);
        assert_relative_eq!(bins[1].center(), 7.5);
    }

    #[test]
    fn test_histogram_degenerate_inputs() {
        assert!(histogram(&[], 30).is_empty());
        let single = histogram(&[4.0, 4.0], 30);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].count, 2);
        assert_relative_eq!(single[0].width(), 1.0);
    }

    #[test]
    fn test_kde_integrates_to_about_one() {
        let values: Vec<f64> = (0..200).map(|i| (i % 20) as f64).collect();
        let curve = gaussian_kde(&values, 400);
        assert_eq!(curve.len(), 400);
        let step = curve[1][0] - curve[0][0];
        let area: f64 = curve.iter().map(|p| p[1] * step).sum();
        // Tails beyond the data range are cut off.
        assert!(area > 0.85 && area < 1.01, "area = {area}");
        assert!(gaussian_kde(&[3.0, 3.0, 3.0], 50).is_empty());
    }

    #[test]
    fn test_box_summary_quartiles() {
        let s = box_summary(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_relative_eq!(s.q1, 2.0);
        assert_relative_eq!(s.median, 3.0);
        assert_relative_eq!(s.q3, 4.0);
        assert_relative_eq!(s.lower_whisker, 1.0);
        assert_relative_eq!(s.upper_whisker, 5.0);
        assert!(s.outliers.is_empty());
        assert!(box_summary(&[]).is_none());
    }

    #[test]
    fn test_box_summary_outlier() {
        let s = box_summary(&[10.0, 11.0, 12.0, 13.0, 14.0, 100.0]).unwrap();
        assert_eq!(s.outliers, vec![100.0]);
        assert_relative_eq!(s.upper_whisker, 14.0);
        assert!(s.lower_whisker <= s.q1 && s.q1 <= s.median && s.median <= s.q3);
    }

    #[test]
    fn test_linear_fit_recovers_line() {
        let xs = [0.1, 0.2, 0.5, 0.9];
        let ys: Vec<f64> = xs.iter().map(|x| 6000.0 * x + 1200.0).collect();
        let fit = linear_fit(&xs, &ys).unwrap();
        assert_relative_eq!(fit.slope, 6000.0, epsilon = 1e-6);
        assert_relative_eq!(fit.intercept, 1200.0, epsilon = 1e-6);
        assert_relative_eq!(fit.predict(1.0), 7200.0, epsilon = 1e-6);
    }

    #[test]
    fn test_linear_fit_degenerate() {
        assert!(linear_fit(&[1.0], &[2.0]).is_none());
        assert!(linear_fit(&[2.0, 2.0, 2.0], &[1.0, 5.0, 9.0]).is_none());
    }
}
