use std::time::Duration;

/// User agent string for HTTP requests
pub const USER_AGENT: &str = "mcp-city-climate/0.1.0";

/// OpenWeatherMap current-weather API base URL
pub const OPEN_WEATHER_API_BASE: &str = "https://api.openweathermap.org/data/2.5";

/// Dataset read at startup when `CITY_TEMPS_CSV` is unset
pub const DEFAULT_DATASET_PATH: &str = "temperature_data.csv";

/// Number of readings in the centered rolling window
pub const ANOMALY_WINDOW: usize = 30;

/// Rolling standard deviations a reading may stray before it is an anomaly
pub const ANOMALY_THRESHOLD: f64 = 2.0;

/// Seasonal standard deviations a live reading may stray and still be normal
pub const LIVE_NORM_MULTIPLIER: f64 = 2.0;

/// Upper bound on a single live-temperature fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
