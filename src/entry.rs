use std::ffi::OsString;
use std::path::Path;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::{debug, warn};

use reqburst::args::ReqburstArgs;
use reqburst::controller::Controller;
use reqburst::error::{AppError, AppResult, ValidationError};
use reqburst::shutdown::setup_signal_shutdown_handler;
use reqburst::sinks::{ConsoleView, LogFileSink};

/// Default config filenames checked when no CLI args are provided.
const DEFAULT_CONFIG_FILES: [&str; 2] = ["reqburst.toml", "reqburst.json"];

pub(crate) fn run() -> AppResult<()> {
    let Some((mut args, matches)) = parse_args()? else {
        return Ok(());
    };
    apply_config(&mut args, &matches)?;

    crate::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(ValidationError::RuntimeBuildFailed { source: err }))?;

    runtime.block_on(run_async(args))
}

fn parse_args() -> AppResult<Option<(ReqburstArgs, ArgMatches)>> {
    let mut cmd = ReqburstArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = ReqburstArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    std::env::var_os("REQBURST_URL").is_none() && !has_default_config()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

fn apply_config(args: &mut ReqburstArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = reqburst::config::load_config(args.config.as_deref())? {
        reqburst::config::apply_config(args, matches, &config).map_err(AppError::config)?;
    }
    Ok(())
}

async fn run_async(args: ReqburstArgs) -> AppResult<()> {
    let log = open_log_file(&args).await;
    let mut controller = Controller::http(log);
    let signal_handler = setup_signal_shutdown_handler(&controller.shutdown_sender());
    let mut view = ConsoleView::stdout(args.no_color);

    let result = controller
        .validate_and_run(&args.raw_inputs(), &mut view)
        .await;
    signal_handler.abort();

    let summary = result?;
    debug!(
        "Exiting after {} of {} requests",
        summary.completed, summary.total
    );
    Ok(())
}

async fn open_log_file(args: &ReqburstArgs) -> Option<LogFileSink> {
    if args.no_log_file {
        return None;
    }
    match LogFileSink::open(&args.log_file).await {
        Ok(sink) => Some(sink),
        Err(err) => {
            warn!("Continuing without a log file: {}", err);
            None
        }
    }
}
