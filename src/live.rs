//! Live temperature lookup and comparison against the seasonal norm.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use reqwest::{Client, StatusCode};

use crate::constants::{LIVE_NORM_MULTIPLIER, OPEN_WEATHER_API_BASE, USER_AGENT};
use crate::error::{ClimateError, FetchFailure, FetchFailureReason, Result};
use crate::models::{CityReport, LiveVerdict, OpenWeatherResponse};
use crate::season::season_of;

/// API key for the live-weather provider. Never printed.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Anything that can report the current temperature of a city in °C.
pub trait TemperatureSource {
    fn fetch_current_temperature(
        &self,
        city: &str,
        credentials: &ApiKey,
    ) -> impl Future<Output = std::result::Result<f64, FetchFailure>> + Send;
}

/// OpenWeatherMap current-weather endpoint.
///
/// A fresh HTTP client is built for each fetch and dropped when the fetch
/// finishes, fails, or is abandoned.
#[derive(Debug, Clone)]
pub struct OpenWeatherSource {
    base_url: String,
    timeout: Duration,
}

impl OpenWeatherSource {
    pub fn new(timeout: Duration) -> Self {
        Self {
            base_url: OPEN_WEATHER_API_BASE.to_string(),
            timeout,
        }
    }

    pub(crate) fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Maps a non-success HTTP status to a failure reason.
fn status_failure(status: StatusCode) -> Option<FetchFailureReason> {
    if status.is_success() {
        None
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Some(FetchFailureReason::Authentication)
    } else if status == StatusCode::NOT_FOUND {
        Some(FetchFailureReason::CityNotFound)
    } else {
        Some(FetchFailureReason::Network)
    }
}

fn transport_failure(err: reqwest::Error) -> FetchFailure {
    let reason = if err.is_timeout() {
        FetchFailureReason::Timeout
    } else {
        FetchFailureReason::Network
    };
    // the request URL carries the API key
    FetchFailure::new(reason, err.without_url().to_string())
}

impl TemperatureSource for OpenWeatherSource {
    async fn fetch_current_temperature(
        &self,
        city: &str,
        credentials: &ApiKey,
    ) -> std::result::Result<f64, FetchFailure> {
        tracing::info!("Fetching live temperature for {}", city);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()
            .map_err(transport_failure)?;

        let response = client
            .get(format!("{}/weather", self.base_url))
            .query(&[("q", city), ("units", "metric"), ("appid", credentials.expose())])
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        if let Some(reason) = status_failure(status) {
            return Err(FetchFailure::new(
                reason,
                format!("Request failed with status: {}", status),
            ));
        }

        let data = response
            .json::<OpenWeatherResponse>()
            .await
            .map_err(transport_failure)?;
        if !data.main.temp.is_finite() {
            return Err(FetchFailure::new(
                FetchFailureReason::Network,
                format!("provider returned a non-finite temperature for {}", data.name),
            ));
        }
        Ok(data.main.temp)
    }
}

/// Compares a live reading against the historical norm for the season of
/// `as_of`.
///
/// The reading is within the norm when it lies no further than two seasonal
/// standard deviations from the seasonal mean.
pub fn compare(
    city: &str,
    report: &CityReport,
    live_temp: f64,
    as_of: NaiveDate,
) -> Result<LiveVerdict> {
    if city != report.city {
        return Err(ClimateError::InvalidInput(format!(
            "report is for {}, not {}",
            report.city, city
        )));
    }
    if !live_temp.is_finite() {
        return Err(ClimateError::InvalidInput(format!(
            "live temperature for {} is not a finite number",
            city
        )));
    }

    let season = season_of(as_of.month())?;
    let profile = report
        .seasonal_profiles
        .get(&season)
        .ok_or(ClimateError::NoProfileForSeason(season))?;
    let seasonal_std = profile.std_temp.ok_or_else(|| {
        ClimateError::InsufficientData(format!(
            "{} has a single {} reading, so its spread is undefined",
            city, season
        ))
    })?;

    let deviation = (live_temp - profile.mean_temp).abs();
    Ok(LiveVerdict {
        city: city.to_string(),
        season,
        current_temp: live_temp,
        seasonal_mean: profile.mean_temp,
        seasonal_std,
        season_trend: profile.trend,
        within_norm: deviation <= LIVE_NORM_MULTIPLIER * seasonal_std,
    })
}

/// Fetches the live temperature for the report's city and compares it.
///
/// The fetch is abandoned once `timeout` elapses. Fetch failures come back as
/// `ExternalFetchFailed` and leave `report` untouched.
pub async fn check_live<S: TemperatureSource>(
    source: &S,
    credentials: &ApiKey,
    report: &CityReport,
    as_of: NaiveDate,
    timeout: Duration,
) -> Result<LiveVerdict> {
    let city = report.city.as_str();
    let fetched =
        tokio::time::timeout(timeout, source.fetch_current_temperature(city, credentials)).await;

    let live_temp = match fetched {
        Ok(Ok(temp)) => temp,
        Ok(Err(failure)) => {
            tracing::warn!("Live fetch for {} failed: {}", city, failure);
            return Err(failure.into());
        }
        Err(_) => {
            tracing::warn!("Live fetch for {} timed out after {:?}", city, timeout);
            return Err(ClimateError::ExternalFetchFailed {
                reason: FetchFailureReason::Timeout,
                detail: format!("no answer within {:?}", timeout),
            });
        }
    };

    compare(city, report, live_temp, as_of)
}
