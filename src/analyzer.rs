use std::collections::{BTreeMap, HashSet};

use chrono::Datelike;

use crate::anomaly::detect;
use crate::constants::{ANOMALY_THRESHOLD, ANOMALY_WINDOW};
use crate::error::{ClimateError, Result};
use crate::models::{CityReport, PeriodTrend, Reading, TrendReport};
use crate::profile::profile;
use crate::trend::{classify_trend, elapsed_day_points};

/// Distinct city names in the order they first appear.
pub fn list_cities(readings: &[Reading]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut cities: Vec<String> = Vec::new();
    for reading in readings {
        if seen.insert(reading.city.as_str()) {
            cities.push(reading.city.clone());
        }
    }
    cities
}

/// Runs the full historical analysis for one city.
///
/// The city's readings are copied out of `all_readings` and sorted by date;
/// the yearly trends, seasonal profiles and anomaly scan all work on that
/// sorted copy.
pub fn analyze(city: &str, all_readings: &[Reading]) -> Result<CityReport> {
    let mut series: Vec<Reading> = all_readings
        .iter()
        .filter(|r| r.city == city)
        .cloned()
        .collect();
    if series.is_empty() {
        return Err(ClimateError::UnknownCity(city.to_string()));
    }
    if let Some(bad) = series.iter().find(|r| !r.temperature.is_finite()) {
        return Err(ClimateError::InvalidInput(format!(
            "non-finite temperature on {} for {}",
            bad.timestamp, city
        )));
    }
    series.sort_by_key(|r| r.timestamp);

    tracing::debug!("Analyzing {} readings for {}", series.len(), city);

    let yearly_trends = yearly_trends(&series);
    let seasonal_profiles = profile(&series);
    let anomalies: Vec<Reading> = detect(&series, ANOMALY_WINDOW, ANOMALY_THRESHOLD)
        .into_iter()
        .zip(&series)
        .filter(|(flagged, _)| *flagged)
        .map(|(_, reading)| reading.clone())
        .collect();

    tracing::info!(
        "Analyzed {}: {} seasons, {} years, {} anomalies",
        city,
        seasonal_profiles.len(),
        yearly_trends.len(),
        anomalies.len()
    );

    Ok(CityReport {
        city: city.to_string(),
        seasonal_profiles,
        yearly_trends,
        anomalies,
    })
}

/// Trend per calendar year, fitted on days since the year's first reading.
pub fn yearly_trends(series: &[Reading]) -> TrendReport<i32> {
    let mut years: BTreeMap<i32, Vec<&Reading>> = BTreeMap::new();
    for reading in series {
        years.entry(reading.timestamp.year()).or_default().push(reading);
    }
    years
        .into_iter()
        .map(|(year, readings)| PeriodTrend {
            period: year,
            trend: classify_trend(&elapsed_day_points(readings)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Season, TrendLabel};
    use chrono::NaiveDate;

    fn reading(city: &str, y: i32, m: u32, d: u32, t: f64) -> Reading {
        Reading {
            city: city.to_string(),
            timestamp: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            temperature: t,
        }
    }

    #[test]
    fn test_unknown_city_is_an_error() {
        let data = vec![reading("Paris", 2023, 1, 1, 3.0)];
        assert_eq!(
            analyze("Cairo", &data),
            Err(ClimateError::UnknownCity("Cairo".to_string()))
        );
        assert!(matches!(analyze("Paris", &[]), Err(ClimateError::UnknownCity(_))));
    }

    #[test]
    fn test_filters_to_city_and_sorts() {
        let data = vec![
            reading("Paris", 2023, 3, 3, 9.0),
            reading("Rome", 2023, 3, 1, 15.0),
            reading("Paris", 2023, 3, 1, 7.0),
            reading("Paris", 2023, 3, 2, 8.0),
        ];
        let report = analyze("Paris", &data).unwrap();
        assert_eq!(report.city, "Paris");
        let spring = &report.seasonal_profiles[&Season::Spring];
        assert_eq!(spring.count, 3);
        assert_eq!(spring.trend, TrendLabel::Positive);
        assert_eq!(report.yearly_trends.len(), 1);
        assert!(report.anomalies.is_empty());
    }

    #[test]
    fn test_yearly_trends_sorted_by_year() {
        let data = vec![
            reading("Oslo", 2021, 5, 1, 10.0),
            reading("Oslo", 2021, 5, 2, 8.0),
            reading("Oslo", 2020, 5, 1, 8.0),
            reading("Oslo", 2020, 5, 2, 10.0),
            reading("Oslo", 2022, 5, 2, 10.0),
        ];
        let trends = yearly_trends(&data);
        let summary: Vec<(i32, TrendLabel)> =
            trends.iter().map(|t| (t.period, t.trend)).collect();
        assert_eq!(
            summary,
            vec![
                (2020, TrendLabel::Positive),
                (2021, TrendLabel::Negative),
                (2022, TrendLabel::Flat),
            ]
        );
    }

    #[test]
    fn test_non_finite_temperature_is_rejected() {
        let data = vec![reading("Lima", 2023, 1, 1, f64::NAN)];
        assert!(matches!(analyze("Lima", &data), Err(ClimateError::InvalidInput(_))));
    }

    #[test]
    fn test_anomalies_keep_chronological_order() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let mut data: Vec<Reading> = (0..120)
            .map(|i| Reading {
                city: "Quito".to_string(),
                timestamp: start + chrono::Duration::days(i),
                temperature: if i % 2 == 0 { 14.2 } else { 13.8 },
            })
            .collect();
        data[40].temperature = 30.0;
        data[80].temperature = -5.0;
        data.reverse();
        let report = analyze("Quito", &data).unwrap();
        let dates: Vec<NaiveDate> = report.anomalies.iter().map(|r| r.timestamp).collect();
        assert_eq!(
            dates,
            vec![
                start + chrono::Duration::days(40),
                start + chrono::Duration::days(80)
            ]
        );
    }

    #[test]
    fn test_list_cities_first_seen_order() {
        let data = vec![
            reading("Rome", 2023, 1, 1, 1.0),
            reading("Paris", 2023, 1, 1, 1.0),
            reading("Rome", 2023, 1, 2, 1.0),
            reading("Oslo", 2023, 1, 1, 1.0),
            reading("Paris", 2023, 1, 2, 1.0),
        ];
        assert_eq!(list_cities(&data), vec!["Rome", "Paris", "Oslo"]);
        assert!(list_cities(&[]).is_empty());
    }
}
