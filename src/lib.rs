//! Historical temperature analysis per city, with a live comparison against
//! the seasonal norm.
//!
//! The analysis core (`season`, `trend`, `anomaly`, `profile`, `analyzer`) is
//! pure and holds no shared state, so independent cities can be analyzed in
//! parallel. `live` is the only module that touches the network.

pub mod analyzer;
pub mod anomaly;
pub mod config;
pub mod constants;
pub mod error;
pub mod formatters;
pub mod ingest;
pub mod live;
pub mod models;
pub mod profile;
pub mod season;
pub mod service;
pub mod trend;

pub use analyzer::{analyze, list_cities};
pub use error::{ClimateError, FetchFailure, FetchFailureReason};
pub use live::{check_live, compare, ApiKey, OpenWeatherSource, TemperatureSource};
pub use models::{CityReport, LiveVerdict, Reading, Season, SeasonProfile, TrendLabel};
