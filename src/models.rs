use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Historical Data Models
// ============================================================================

/// One daily temperature observation for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub city: String,
    pub timestamp: NaiveDate,
    pub temperature: f64,
}

/// Calendar season. Ordered winter, spring, summer, autumn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
        };
        f.write_str(name)
    }
}

/// Sign of a least-squares slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendLabel {
    Positive,
    Negative,
    Flat,
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrendLabel::Positive => "positive",
            TrendLabel::Negative => "negative",
            TrendLabel::Flat => "flat",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Analysis Output Models
// ============================================================================

/// Rolling statistics for a reading whose centered window is complete.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RollingStats {
    pub windowed_mean: f64,
    pub windowed_std: f64,
    pub is_anomaly: bool,
}

/// Temperature summary for one season.
///
/// `std_temp` is `None` when the season holds a single reading, since the
/// sample standard deviation is undefined there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonProfile {
    pub count: usize,
    pub mean_temp: f64,
    pub std_temp: Option<f64>,
    pub min_temp: f64,
    pub max_temp: f64,
    pub trend: TrendLabel,
}

/// Trend for one period (a year or a season).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodTrend<K> {
    pub period: K,
    pub trend: TrendLabel,
}

/// Per-period trends sorted by period key.
pub type TrendReport<K> = Vec<PeriodTrend<K>>;

/// Everything the historical analysis knows about one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityReport {
    pub city: String,
    pub seasonal_profiles: BTreeMap<Season, SeasonProfile>,
    pub yearly_trends: TrendReport<i32>,
    pub anomalies: Vec<Reading>,
}

impl CityReport {
    /// Per-season trends in season order.
    pub fn seasonal_trends(&self) -> TrendReport<Season> {
        self.seasonal_profiles
            .iter()
            .map(|(season, profile)| PeriodTrend {
                period: *season,
                trend: profile.trend,
            })
            .collect()
    }
}

/// Outcome of checking a live reading against the seasonal norm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveVerdict {
    pub city: String,
    pub season: Season,
    pub current_temp: f64,
    pub seasonal_mean: f64,
    pub seasonal_std: f64,
    pub season_trend: TrendLabel,
    pub within_norm: bool,
}

// ============================================================================
// OpenWeatherMap API Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OpenWeatherResponse {
    pub name: String,
    pub main: OpenWeatherMain,
}

#[derive(Debug, Deserialize)]
pub struct OpenWeatherMain {
    pub temp: f64,
}

// ============================================================================
// MCP Tool Request Models
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct AnalyzeCityRequest {
    pub city: String,
    #[serde(default)]
    pub format: Option<ReportFormat>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct CompareLiveRequest {
    pub city: String,
    /// Date used to pick the season, formatted YYYY-MM-DD. Defaults to today (UTC).
    #[serde(default)]
    pub as_of: Option<String>,
}
