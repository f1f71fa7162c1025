use std::time::Duration;

use tracing::{info, warn};

use crate::dispatch::{self, ExecutorFactory, RunConfig};
use crate::error::{AppError, AppResult};
use crate::http::HttpExecutorFactory;
use crate::shutdown::{ShutdownSender, shutdown_channel};
use crate::sinks::LogFileSink;

use super::inputs::RawInputs;
use super::view::RunView;

/// What one run did, as reported to the view after the last event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total: u64,
    pub completed: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub peak_in_flight: usize,
    pub cancelled: bool,
    pub elapsed: Duration,
}

/// Starts dispatch runs and relays their events.
///
/// [`Controller::validate_and_run`] borrows the controller mutably until the
/// run's event stream is fully drained, so two runs can never feed the same
/// view or log file at once. A run in progress is cancelled through the
/// sender returned by [`Controller::shutdown_sender`].
pub struct Controller<F = HttpExecutorFactory> {
    factory: F,
    log: Option<LogFileSink>,
    shutdown_tx: ShutdownSender,
}

impl Controller<HttpExecutorFactory> {
    /// Controller issuing real HTTP requests.
    #[must_use]
    pub fn http(log: Option<LogFileSink>) -> Self {
        Self::new(HttpExecutorFactory, log)
    }
}

impl<F> Controller<F>
where
    F: ExecutorFactory,
{
    #[must_use]
    pub fn new(factory: F, log: Option<LogFileSink>) -> Self {
        let (shutdown_tx, _) = shutdown_channel();
        Self {
            factory,
            log,
            shutdown_tx,
        }
    }

    /// Sending on this cancels the run in progress, if any.
    #[must_use]
    pub fn shutdown_sender(&self) -> ShutdownSender {
        self.shutdown_tx.clone()
    }

    /// Validates `raw`, runs the dispatch and feeds every event to `view` and
    /// the log file.
    ///
    /// Invalid input is reported through [`RunView::validation_error`] and no
    /// request is made. A log file that stops accepting writes is disabled
    /// with a warning; the run and the view continue.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid input, when the HTTP client cannot be
    /// built, or when the run's supervising task panicked.
    pub async fn validate_and_run(
        &mut self,
        raw: &RawInputs,
        view: &mut dyn RunView,
    ) -> AppResult<RunSummary> {
        let config = match raw.validate() {
            Ok(config) => config,
            Err(err) => {
                warn!("Rejected run configuration: {}", err);
                view.validation_error(&err.to_string());
                return Err(AppError::validation(err));
            }
        };
        let executor = self.factory.build(&config)?;

        view.clear();
        view.progress(0);
        let start_line = describe_run(&config);
        info!("{}", start_line);
        view.log_line(&start_line);
        self.write_log(&start_line).await;

        let mut handle = dispatch::execute(&config, executor, &self.shutdown_tx);
        let mut succeeded: u64 = 0;
        let mut failed: u64 = 0;
        while let Some(event) = handle.next_event().await {
            if event.outcome.kind().is_success() {
                succeeded = succeeded.saturating_add(1);
            } else {
                failed = failed.saturating_add(1);
            }
            let line = event.outcome.to_string();
            view.log_line(&line);
            view.progress(event.progress);
            self.write_log(&line).await;
        }
        let report = handle.finish().await?;

        let summary = RunSummary {
            total: report.total,
            completed: report.completed,
            succeeded,
            failed,
            peak_in_flight: report.peak_in_flight,
            cancelled: report.cancelled,
            elapsed: report.elapsed,
        };
        if summary.cancelled {
            warn!(
                "Run cancelled after {} of {} requests",
                summary.completed, summary.total
            );
        } else {
            info!(
                "Run finished: {} succeeded, {} failed in {:?}",
                summary.succeeded, summary.failed, summary.elapsed
            );
        }
        view.finished(&summary);
        self.flush_log().await;
        Ok(summary)
    }

    async fn write_log(&mut self, line: &str) {
        let Some(log) = self.log.as_mut() else {
            return;
        };
        let written = match log.write_line(line).await {
            Ok(()) => log.flush().await,
            Err(err) => Err(err),
        };
        if let Err(err) = written {
            warn!("Disabling log file: {}", err);
            self.log = None;
        }
    }

    async fn flush_log(&mut self) {
        let Some(log) = self.log.as_mut() else {
            return;
        };
        if let Err(err) = log.flush().await {
            warn!("Disabling log file: {}", err);
            self.log = None;
        }
    }
}

fn describe_run(config: &RunConfig) -> String {
    let proxies = config.proxies().len();
    let line = format!(
        "Starting run on {} with {} requests and {} workers, delay {} ms",
        config.target_url(),
        config.request_count(),
        config.worker_limit(),
        config.delay().as_millis()
    );
    if proxies == 0 {
        line
    } else {
        format!("{}, rotating {} proxies", line, proxies)
    }
}
