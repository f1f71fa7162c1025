use std::time::Duration;

use crate::error::ValidationError;

/// Upper bound for the number of requests in one run.
pub const MAX_REQUEST_COUNT: u64 = 1_000_000;
/// Upper bound for concurrently running workers.
pub const MAX_WORKER_LIMIT: usize = 100;
/// Upper bound for the post-request delay, in milliseconds.
pub const MAX_DELAY_MS: u64 = 10_000;

const HTTP_PREFIX: &str = "http://";
const HTTPS_PREFIX: &str = "https://";

/// Immutable, validated input to one dispatch run.
///
/// The only way to obtain a `RunConfig` is [`RunConfig::new`], so holding one
/// means every bound below has already been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    target_url: String,
    request_count: u64,
    worker_limit: usize,
    delay: Duration,
    proxies: Vec<String>,
    request_timeout: Option<Duration>,
}

impl RunConfig {
    /// Validates the inputs and builds a run configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL scheme is not http/https or a numeric
    /// value falls outside its allowed range.
    pub fn new(
        target_url: String,
        request_count: u64,
        worker_limit: usize,
        delay: Duration,
        proxies: Vec<String>,
    ) -> Result<Self, ValidationError> {
        if !has_http_scheme(&target_url) {
            return Err(ValidationError::InvalidUrlScheme { url: target_url });
        }
        if !(1..=MAX_REQUEST_COUNT).contains(&request_count) {
            return Err(ValidationError::RequestCountOutOfRange {
                value: request_count,
                min: 1,
                max: MAX_REQUEST_COUNT,
            });
        }
        if !(1..=MAX_WORKER_LIMIT).contains(&worker_limit) {
            return Err(ValidationError::WorkerLimitOutOfRange {
                value: worker_limit,
                min: 1,
                max: MAX_WORKER_LIMIT,
            });
        }
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        if delay_ms > MAX_DELAY_MS {
            return Err(ValidationError::DelayOutOfRange {
                value: delay_ms,
                max: MAX_DELAY_MS,
            });
        }

        Ok(Self {
            target_url,
            request_count,
            worker_limit,
            delay,
            proxies,
            request_timeout: None,
        })
    }

    /// Sets a per-request timeout. `None` keeps the HTTP client default.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    #[must_use]
    pub const fn request_count(&self) -> u64 {
        self.request_count
    }

    #[must_use]
    pub const fn worker_limit(&self) -> usize {
        self.worker_limit
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    #[must_use]
    pub fn proxies(&self) -> &[String] {
        &self.proxies
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }
}

fn has_http_scheme(url: &str) -> bool {
    url.starts_with(HTTP_PREFIX) || url.starts_with(HTTPS_PREFIX)
}
