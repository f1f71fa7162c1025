use clap::Parser;
use std::time::Duration;

use crate::controller::RawInputs;

use super::defaults::{DEFAULT_LOG_FILE, DEFAULT_REQUESTS, DEFAULT_WORKERS};
use super::parsers::{parse_bool_env, parse_duration_arg};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Send a burst of HTTP GET requests through a bounded worker pool, optionally rotating proxies."
)]
pub struct ReqburstArgs {
    /// Target URL (must start with http:// or https://)
    #[arg(long, short, env = "REQBURST_URL")]
    pub url: Option<String>,

    /// Number of requests to send (1-1000000)
    #[arg(long = "requests", short = 'n', env = "REQBURST_REQUESTS", default_value_t = DEFAULT_REQUESTS)]
    pub requests: u64,

    /// Maximum concurrent workers (1-100)
    #[arg(
        long = "workers",
        short = 'w',
        alias = "threads",
        env = "REQBURST_WORKERS",
        default_value_t = DEFAULT_WORKERS
    )]
    pub workers: usize,

    /// Delay after each request within its worker, in milliseconds (0-10000)
    #[arg(long = "delay-ms", short = 'd', env = "REQBURST_DELAY_MS", default_value_t = 0)]
    pub delay_ms: u64,

    /// Proxies to rotate through, comma-separated (e.g. http://10.0.0.1:3128,10.0.0.2:8080)
    #[arg(long, short = 'p', env = "REQBURST_PROXIES", default_value = "")]
    pub proxies: String,

    /// Per-request timeout (supports ms/s/m/h); defaults to no timeout
    #[arg(long = "timeout", env = "REQBURST_TIMEOUT", value_parser = parse_duration_arg)]
    pub request_timeout: Option<Duration>,

    /// File the run log is appended to
    #[arg(long = "log-file", env = "REQBURST_LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    pub log_file: String,

    /// Do not write a log file
    #[arg(long = "no-log-file", env = "REQBURST_NO_LOG_FILE", value_parser = parse_bool_env)]
    pub no_log_file: bool,

    /// Path to config file (TOML or JSON). Defaults to ./reqburst.toml or ./reqburst.json
    #[arg(long, short = 'c', env = "REQBURST_CONFIG")]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', env = "REQBURST_VERBOSE", value_parser = parse_bool_env)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}

impl ReqburstArgs {
    /// Input fields as entered, before any validation.
    #[must_use]
    pub fn raw_inputs(&self) -> RawInputs {
        RawInputs {
            url: self.url.clone().unwrap_or_default(),
            request_count: self.requests,
            worker_limit: self.workers,
            delay_ms: self.delay_ms,
            proxies: self.proxies.clone(),
            request_timeout: self.request_timeout,
        }
    }
}
