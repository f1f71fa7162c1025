use std::time::Duration;

use serde::Deserialize;

use crate::args::parsers::parse_duration;
use crate::error::ValidationError;

/// Settings read from `reqburst.toml` / `reqburst.json`.
///
/// Every field is optional; command-line values win over file values.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub requests: Option<u64>,
    #[serde(alias = "threads")]
    pub workers: Option<usize>,
    pub delay_ms: Option<u64>,
    pub proxies: Option<ProxyList>,
    pub timeout: Option<DurationValue>,
    pub log_file: Option<String>,
    pub no_log_file: Option<bool>,
    pub verbose: Option<bool>,
    pub no_color: Option<bool>,
}

/// Proxies as one comma-separated string or as a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProxyList {
    Text(String),
    List(Vec<String>),
}

impl ProxyList {
    /// The comma-delimited form the CLI field uses.
    #[must_use]
    pub fn to_field(&self) -> String {
        match self {
            ProxyList::Text(text) => text.clone(),
            ProxyList::List(entries) => entries.join(","),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(0) => Err(ValidationError::DurationZero),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration(text),
        }
    }
}
