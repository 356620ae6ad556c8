//! Least-squares trend classification over (elapsed days, temperature) points.

use crate::models::{Reading, TrendLabel};

/// Ordinary least-squares slope of `y` on `x`.
///
/// Returns `None` when the slope is undefined: fewer than two points, or
/// every point shares the same `x`. Points are sorted before summing so the
/// result does not depend on input order.
pub fn ols_slope(points: &[(f64, f64)]) -> Option<f64> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let (first, last) = (sorted.first()?, sorted.last()?);
    if first.0 == last.0 {
        return None;
    }
    if sorted.iter().all(|&(_, y)| y == first.1) {
        return Some(0.0);
    }

    let n = sorted.len() as f64;
    let x_mean = sorted.iter().map(|&(x, _)| x).sum::<f64>() / n;
    let y_mean = sorted.iter().map(|&(_, y)| y).sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for &(x, y) in &sorted {
        let x_diff = x - x_mean;
        numerator += x_diff * (y - y_mean);
        denominator += x_diff * x_diff;
    }

    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}

/// Classifies the sign of the fitted slope. Undefined slopes are `Flat`.
pub fn classify_trend(points: &[(f64, f64)]) -> TrendLabel {
    match ols_slope(points) {
        Some(slope) if slope > 0.0 => TrendLabel::Positive,
        Some(slope) if slope < 0.0 => TrendLabel::Negative,
        _ => TrendLabel::Flat,
    }
}

/// Turns readings into regression points with `x` = days since the
/// earliest reading in the group.
pub fn elapsed_day_points<'a, I>(readings: I) -> Vec<(f64, f64)>
where
    I: IntoIterator<Item = &'a Reading>,
{
    let readings: Vec<&Reading> = readings.into_iter().collect();
    let Some(origin) = readings.iter().map(|r| r.timestamp).min() else {
        return Vec::new();
    };
    readings
        .iter()
        .map(|r| ((r.timestamp - origin).num_days() as f64, r.temperature))
        .collect()
}
