use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const BASE_URL_VAR: &str = "PDFQA_API_BASE_URL";
const TIMEOUT_VAR: &str = "PDFQA_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid base URL {0:?}: must start with http:// or https://")]
    BaseUrl(String),
    #[error("Invalid PDFQA_REQUEST_TIMEOUT_SECS: {0:?}")]
    Timeout(String),
}

impl ClientConfig {
    /// Defaults overridden by `PDFQA_API_BASE_URL` and `PDFQA_REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup(BASE_URL_VAR) {
            config = config.with_base_url(&url)?;
        }
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Timeout(raw.clone()))?;
            if secs == 0 {
                return Err(ConfigError::Timeout(raw));
            }
            config.request_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        let url = url.trim().trim_end_matches('/');
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::BaseUrl(url.to_string()));
        }
        self.base_url = url.to_string();
        Ok(self)
    }
}
