use std::time::Duration;

use crate::dispatch::RunConfig;
use crate::error::ValidationError;

const PROXY_DELIMITER: char = ',';

/// Configuration fields as the front-end collected them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInputs {
    pub url: String,
    pub request_count: u64,
    pub worker_limit: usize,
    pub delay_ms: u64,
    /// Comma-delimited proxy field; empty means no proxies.
    pub proxies: String,
    pub request_timeout: Option<Duration>,
}

impl RawInputs {
    /// Parses and validates the inputs into a run configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is missing or not http/https, or when a
    /// number is out of range.
    pub fn validate(&self) -> Result<RunConfig, ValidationError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ValidationError::MissingUrl);
        }
        let config = RunConfig::new(
            url.to_owned(),
            self.request_count,
            self.worker_limit,
            Duration::from_millis(self.delay_ms),
            parse_proxy_list(&self.proxies),
        )?;
        Ok(config.with_request_timeout(self.request_timeout))
    }
}

/// Splits the proxy field on commas, trimming entries and dropping empty ones.
#[must_use]
pub fn parse_proxy_list(field: &str) -> Vec<String> {
    field
        .split(PROXY_DELIMITER)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}
