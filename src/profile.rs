use std::collections::BTreeMap;

use crate::models::{Reading, Season, SeasonProfile};
use crate::season::season_of_date;
use crate::trend::{classify_trend, elapsed_day_points};

/// Groups readings by season and summarises each group.
///
/// Seasons without readings are absent from the map. Each profile's trend is
/// fitted on days elapsed since that season-group's earliest reading.
pub fn profile(series: &[Reading]) -> BTreeMap<Season, SeasonProfile> {
    let mut groups: BTreeMap<Season, Vec<&Reading>> = BTreeMap::new();
    for reading in series {
        groups
            .entry(season_of_date(reading.timestamp))
            .or_default()
            .push(reading);
    }

    groups
        .into_iter()
        .map(|(season, readings)| (season, summarise(&readings)))
        .collect()
}

fn summarise(readings: &[&Reading]) -> SeasonProfile {
    let temps: Vec<f64> = readings.iter().map(|r| r.temperature).collect();
    let count = temps.len();
    let mean_temp = temps.iter().sum::<f64>() / count as f64;
    let std_temp = if count > 1 {
        let variance = temps.iter().map(|t| (t - mean_temp).powi(2)).sum::<f64>()
            / (count - 1) as f64;
        Some(variance.sqrt())
    } else {
        None
    };
    let min_temp = temps.iter().copied().fold(f64::INFINITY, f64::min);
    let max_temp = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let trend = classify_trend(&elapsed_day_points(readings.iter().copied()));

    SeasonProfile {
        count,
        mean_temp,
        std_temp,
        min_temp,
        max_temp,
        trend,
    }
}
