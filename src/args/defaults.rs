/// Client identification sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Log file appended to when no `--log-file` is given.
pub const DEFAULT_LOG_FILE: &str = "reqburst.log";

pub(crate) const DEFAULT_REQUESTS: u64 = 1;
pub(crate) const DEFAULT_WORKERS: usize = 10;
