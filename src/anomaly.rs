//! Centered rolling-window anomaly detection.
//!
//! A window of `window` consecutive readings is assigned to the reading at
//! offset `window / 2` inside it, so an even window reaches one reading
//! further back than forward. Readings too close to either end of the series
//! to sit at the center of a full window get no statistics and are never
//! flagged.

use crate::models::{Reading, RollingStats};

fn mean_and_sample_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance.sqrt())
}

/// Rolling mean, sample standard deviation and anomaly flag for each value.
///
/// The output is parallel to `values`; entries without a complete window are
/// `None`. Windows shorter than two readings have no defined deviation, so
/// they yield `None` throughout.
pub fn rolling_stats(values: &[f64], window: usize, threshold: f64) -> Vec<Option<RollingStats>> {
    let mut stats = vec![None; values.len()];
    if window < 2 || values.len() < window {
        return stats;
    }

    let half = window / 2;
    for (start, slice) in values.windows(window).enumerate() {
        let center = start + half;
        let (windowed_mean, windowed_std) = mean_and_sample_std(slice);
        let is_anomaly = windowed_std > 0.0
            && (values[center] - windowed_mean).abs() > threshold * windowed_std;
        stats[center] = Some(RollingStats {
            windowed_mean,
            windowed_std,
            is_anomaly,
        });
    }
    stats
}

/// Anomaly flags for a time-ordered series, parallel to the input.
pub fn detect(series: &[Reading], window: usize, threshold: f64) -> Vec<bool> {
    let values: Vec<f64> = series.iter().map(|r| r.temperature).collect();
    rolling_stats(&values, window, threshold)
        .into_iter()
        .map(|s| s.is_some_and(|s| s.is_anomaly))
        .collect()
}
