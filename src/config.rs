use anyhow::{Context, Result};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // OCR API
    pub ocr_api_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,

    // Language preference
    pub preference_file: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            ocr_api_url: std::env::var("OCR_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
            connect_timeout: Duration::from_secs(
                parse_var("OCR_CONNECT_TIMEOUT_SECS")?.unwrap_or(30),
            ),
            request_timeout: Duration::from_secs(
                parse_var("OCR_REQUEST_TIMEOUT_SECS")?.unwrap_or(60),
            ),
            preference_file: std::env::var("PREFERENCE_FILE")
                .unwrap_or_else(|_| "data/preferences.json".to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ocr_api_url: "http://localhost:8080".to_string(),
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(60),
            preference_file: "data/preferences.json".to_string(),
        }
    }
}

/// Parse an optional numeric variable; set-but-malformed is an error.
fn parse_var(name: &str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a whole number of seconds, got '{}'", name, value)),
        Err(_) => Ok(None),
    }
}
