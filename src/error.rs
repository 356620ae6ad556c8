use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Why a live-temperature fetch produced no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailureReason {
    /// The weather provider rejected the credentials.
    Authentication,
    /// Transport failure, unexpected HTTP status, or an unreadable body.
    Network,
    /// No answer within the configured bound.
    Timeout,
    /// The provider does not know the requested city.
    CityNotFound,
}

impl fmt::Display for FetchFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FetchFailureReason::Authentication => "authentication rejected",
            FetchFailureReason::Network => "network error",
            FetchFailureReason::Timeout => "timed out",
            FetchFailureReason::CityNotFound => "city not found",
        };
        f.write_str(label)
    }
}

/// A failed live fetch, as reported by a `TemperatureSource`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}: {detail}")]
pub struct FetchFailure {
    pub reason: FetchFailureReason,
    pub detail: String,
}

impl FetchFailure {
    pub fn new(reason: FetchFailureReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: detail.into(),
        }
    }
}

/// Errors raised by the analysis pipeline and the live comparison.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClimateError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("No readings for city: {0}")]
    UnknownCity(String),

    #[error("No seasonal profile for {0}")]
    NoProfileForSeason(crate::models::Season),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Live temperature unavailable ({reason}): {detail}")]
    ExternalFetchFailed {
        reason: FetchFailureReason,
        detail: String,
    },
}

impl From<FetchFailure> for ClimateError {
    fn from(failure: FetchFailure) -> Self {
        ClimateError::ExternalFetchFailed {
            reason: failure.reason,
            detail: failure.detail,
        }
    }
}

pub type Result<T, E = ClimateError> = std::result::Result<T, E>;
