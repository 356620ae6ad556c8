use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::constants::{DEFAULT_DATASET_PATH, DEFAULT_FETCH_TIMEOUT};
use crate::live::ApiKey;

/// Runtime settings read from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub dataset_path: PathBuf,
    /// `None` disables live comparisons.
    pub api_key: Option<ApiKey>,
    pub fetch_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from any variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dataset_path = lookup("CITY_TEMPS_CSV")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH));

        let api_key = lookup("OPENWEATHER_API_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(ApiKey::new);

        let fetch_timeout = match lookup("LIVE_FETCH_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().with_context(|| {
                    format!("LIVE_FETCH_TIMEOUT_SECS must be an integer, got {:?}", raw)
                })?;
                if secs == 0 {
                    anyhow::bail!("LIVE_FETCH_TIMEOUT_SECS must be positive");
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_FETCH_TIMEOUT,
        };

        Ok(Self {
            dataset_path,
            api_key,
            fetch_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.dataset_path, PathBuf::from(DEFAULT_DATASET_PATH));
        assert!(config.api_key.is_none());
        assert_eq!(config.fetch_timeout, DEFAULT_FETCH_TIMEOUT);
    }

    #[test]
    fn test_reads_variables() {
        let config = Config::from_lookup(lookup_from(&[
            ("CITY_TEMPS_CSV", "/data/temps.csv"),
            ("OPENWEATHER_API_KEY", " abc123 "),
            ("LIVE_FETCH_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.dataset_path, PathBuf::from("/data/temps.csv"));
        assert_eq!(config.api_key.unwrap().expose(), "abc123");
        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_rejects_bad_timeout() {
        let soon = lookup_from(&[("LIVE_FETCH_TIMEOUT_SECS", "soon")]);
        assert!(Config::from_lookup(soon).is_err());
        let zero = lookup_from(&[("LIVE_FETCH_TIMEOUT_SECS", "0")]);
        assert!(Config::from_lookup(zero).is_err());
    }
}
