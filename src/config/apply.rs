use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::ReqburstArgs;
use crate::error::ConfigError;

use super::types::ConfigFile;

/// Copies config file values into `args` for every option the user did not
/// set on the command line or through the environment.
///
/// # Errors
///
/// Returns an error when a config value cannot be interpreted.
pub fn apply_config(
    args: &mut ReqburstArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> Result<(), ConfigError> {
    if !is_explicit(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if !is_explicit(matches, "requests")
        && let Some(requests) = config.requests
    {
        args.requests = requests;
    }

    if !is_explicit(matches, "workers")
        && let Some(workers) = config.workers
    {
        args.workers = workers;
    }

    if !is_explicit(matches, "delay_ms")
        && let Some(delay_ms) = config.delay_ms
    {
        args.delay_ms = delay_ms;
    }

    if !is_explicit(matches, "proxies")
        && let Some(proxies) = config.proxies.as_ref()
    {
        args.proxies = proxies.to_field();
    }

    if !is_explicit(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        let timeout = timeout
            .to_duration()
            .map_err(|err| ConfigError::InvalidValue {
                field: "timeout",
                source: err,
            })?;
        args.request_timeout = Some(timeout);
    }

    if !is_explicit(matches, "log_file")
        && let Some(log_file) = config.log_file.clone()
    {
        args.log_file = log_file;
    }

    if !is_explicit(matches, "no_log_file")
        && let Some(no_log_file) = config.no_log_file
    {
        args.no_log_file = no_log_file;
    }

    if !is_explicit(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    if !is_explicit(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    Ok(())
}

fn is_explicit(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}
