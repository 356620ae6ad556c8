use crate::error::FetchFailureReason;
use crate::models::{CityReport, LiveVerdict, Season, SeasonProfile};

/// Formats the list of cities in the dataset
pub fn format_cities(cities: &[String]) -> String {
    if cities.is_empty() {
        return "No cities in the dataset.".to_string();
    }

    let mut output = String::from("Cities:\n");
    for city in cities {
        output.push_str(&format!("  {}\n", city));
    }
    output
}

fn format_std(profile: &SeasonProfile) -> String {
    match profile.std_temp {
        Some(std) => format!("{:.2}\u{00b0}C", std),
        None => "n/a (single reading)".to_string(),
    }
}

/// Formats a city report into a human-readable string
pub fn format_city_report(report: &CityReport) -> String {
    let mut output = format!("Climate Report: {}\n\nSeasonal Profiles:\n", report.city);
    for (season, profile) in &report.seasonal_profiles {
        output.push_str(&format!(
            "  {}:\n    Readings: {}\n    Mean: {:.2}\u{00b0}C\n    Std Dev: {}\n    Range: {:.1}\u{00b0}C to {:.1}\u{00b0}C\n    Trend: {}\n",
            season,
            profile.count,
            profile.mean_temp,
            format_std(profile),
            profile.min_temp,
            profile.max_temp,
            profile.trend
        ));
    }

    output.push_str("\nYearly Trends:\n");
    for entry in &report.yearly_trends {
        output.push_str(&format!("  {}: {}\n", entry.period, entry.trend));
    }

    if report.anomalies.is_empty() {
        output.push_str("\nNo anomalies detected.\n");
    } else {
        output.push_str(&format!("\nAnomalies ({}):\n", report.anomalies.len()));
        for reading in &report.anomalies {
            output.push_str(&format!(
                "  {}: {:.1}\u{00b0}C\n",
                reading.timestamp.format("%Y-%m-%d"),
                reading.temperature
            ));
        }
    }
    output
}

/// Formats a live comparison into a human-readable string
pub fn format_live_verdict(verdict: &LiveVerdict) -> String {
    let status = if verdict.within_norm {
        "within the seasonal norm"
    } else {
        "outside the seasonal norm"
    };
    format!(
        "Live Temperature: {}\n  Current: {:.1}\u{00b0}C\n  Season: {}\n  Seasonal Mean: {:.2}\u{00b0}C\n  Seasonal Std Dev: {:.2}\u{00b0}C\n  Season Trend: {}\n  Status: {}\n",
        verdict.city,
        verdict.current_temp,
        verdict.season,
        verdict.seasonal_mean,
        verdict.seasonal_std,
        verdict.season_trend,
        status
    )
}

/// Formats the historical norm for one season, used when no live value is available
pub fn format_season_norm(report: &CityReport, season: Season) -> String {
    match report.seasonal_profiles.get(&season) {
        Some(profile) => format!(
            "Seasonal Norm: {} ({})\n  Mean: {:.2}\u{00b0}C\n  Std Dev: {}\n  Trend: {}\n",
            report.city,
            season,
            profile.mean_temp,
            format_std(profile),
            profile.trend
        ),
        None => format!(
            "Seasonal Norm: {} ({})\n  No historical readings for this season.\n",
            report.city, season
        ),
    }
}

/// User-facing explanation for a live fetch that produced no value
pub fn describe_fetch_failure(reason: FetchFailureReason) -> &'static str {
    match reason {
        FetchFailureReason::Authentication => {
            "The weather provider rejected the API key. Check OPENWEATHER_API_KEY."
        }
        FetchFailureReason::CityNotFound => "The weather provider does not know this city.",
        FetchFailureReason::Timeout => "The weather provider did not answer in time.",
        FetchFailureReason::Network => "The weather provider could not be reached.",
    }
}

/// Formats the "unavailable" live state shown next to the historical norm
pub fn format_live_unavailable(city: &str, reason: FetchFailureReason, detail: &str) -> String {
    format!(
        "Live Temperature: {}\n  Unavailable: {}\n  Details: {}\n",
        city,
        describe_fetch_failure(reason),
        detail
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PeriodTrend, Reading, TrendLabel};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    #[test]
    fn test_report_mentions_undefined_std_and_anomalies() {
        let mut seasonal_profiles = BTreeMap::new();
        seasonal_profiles.insert(
            Season::Autumn,
            SeasonProfile {
                count: 1,
                mean_temp: 9.0,
                std_temp: None,
                min_temp: 9.0,
                max_temp: 9.0,
                trend: TrendLabel::Flat,
            },
        );
        let report = CityReport {
            city: "Dublin".to_string(),
            seasonal_profiles,
            yearly_trends: vec![PeriodTrend {
                period: 2023,
                trend: TrendLabel::Flat,
            }],
            anomalies: vec![Reading {
                city: "Dublin".to_string(),
                timestamp: NaiveDate::from_ymd_opt(2023, 10, 2).unwrap(),
                temperature: 25.0,
            }],
        };
        let text = format_city_report(&report);
        assert!(text.contains("Climate Report: Dublin"));
        assert!(text.contains("n/a (single reading)"));
        assert!(text.contains("2023: flat"));
        assert!(text.contains("2023-10-02: 25.0"));
    }

    #[test]
    fn test_auth_and_unknown_city_read_differently() {
        assert_ne!(
            describe_fetch_failure(FetchFailureReason::Authentication),
            describe_fetch_failure(FetchFailureReason::CityNotFound)
        );
        let text = format_live_unavailable("Berlin", FetchFailureReason::Timeout, "10s");
        assert!(text.contains("did not answer in time"));
    }

    #[test]
    fn test_cities_listing() {
        assert_eq!(format_cities(&[]), "No cities in the dataset.");
        assert!(format_cities(&["Rome".to_string()]).contains("  Rome\n"));
    }
}
