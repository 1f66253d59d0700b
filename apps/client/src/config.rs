use std::time::Duration;

use anyhow::{Context, Result};

use crate::session::history::DEFAULT_DISPLAY_LIMIT;
use crate::session::SessionFeatures;

pub const DEFAULT_API_BASE: &str = "https://ats-resume-score-js1h.onrender.com";

/// Client configuration loaded from environment variables.
/// Every variable has a default; malformed values are startup errors.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub request_timeout: Duration,
    pub history_limit: usize,
    pub features: SessionFeatures,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let timeout_secs = lookup("ATS_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "120".to_string())
            .parse::<u64>()
            .context("ATS_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?;

        let history_limit = match lookup("ATS_HISTORY_LIMIT") {
            Some(v) => v
                .parse::<usize>()
                .context("ATS_HISTORY_LIMIT must be a non-negative integer")?,
            None => DEFAULT_DISPLAY_LIMIT,
        };

        Ok(Config {
            api_base: lookup("ATS_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            history_limit,
            features: SessionFeatures {
                ai_suggestions: parse_flag(&lookup, "ATS_ENABLE_AI")?,
                history: parse_flag(&lookup, "ATS_ENABLE_HISTORY")?,
            },
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<bool> {
    match lookup(key).as_deref().map(str::trim) {
        None | Some("") => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(false),
        Some(v) => anyhow::bail!("{key} must be true/false, got '{v}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.history_limit, 15);
        assert_eq!(config.features, SessionFeatures::default());
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("ATS_API_BASE", "http://localhost:8080"),
            ("ATS_REQUEST_TIMEOUT_SECS", "5"),
            ("ATS_HISTORY_LIMIT", "3"),
            ("ATS_ENABLE_AI", "false"),
            ("ATS_ENABLE_HISTORY", "1"),
        ])
        .unwrap();
        assert_eq!(config.api_base, "http://localhost:8080");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.history_limit, 3);
        assert!(!config.features.ai_suggestions);
        assert!(config.features.history);
    }

    #[test]
    fn test_bad_timeout_is_rejected() {
        let err = config_from(&[("ATS_REQUEST_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("ATS_REQUEST_TIMEOUT_SECS"));
    }

    #[test]
    fn test_bad_flag_is_rejected() {
        assert!(config_from(&[("ATS_ENABLE_AI", "maybe")]).is_err());
    }
}
