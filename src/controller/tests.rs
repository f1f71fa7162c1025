use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::tempdir;

use super::*;
use crate::dispatch::{ExecutorFactory, OutcomeKind, RequestExecutor, RunConfig, Task};
use crate::error::{AppError, AppResult, ValidationError};
use crate::shutdown::ShutdownSender;
use crate::sinks::LogFileSink;

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

struct StaticExecutor {
    latency: Duration,
    fail_on: Vec<u64>,
}

#[async_trait]
impl RequestExecutor for StaticExecutor {
    async fn execute(&self, _target_url: &str, task: &Task) -> OutcomeKind {
        tokio::time::sleep(self.latency).await;
        if self.fail_on.contains(&task.sequence_number()) {
            OutcomeKind::Failure {
                error_description: "connection reset".to_owned(),
            }
        } else {
            OutcomeKind::Success {
                status_code: 200,
                status_text: "OK".to_owned(),
            }
        }
    }
}

#[derive(Default)]
struct StaticFactory {
    latency: Duration,
    fail_on: Vec<u64>,
    builds: Arc<AtomicUsize>,
}

impl ExecutorFactory for StaticFactory {
    fn build(&self, _config: &RunConfig) -> AppResult<Arc<dyn RequestExecutor>> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(StaticExecutor {
            latency: self.latency,
            fail_on: self.fail_on.clone(),
        }))
    }
}

#[derive(Default)]
struct RecordingView {
    lines: Vec<String>,
    progress: Vec<u8>,
    errors: Vec<String>,
    clears: usize,
    finished: Option<RunSummary>,
    cancel_after: Option<(usize, ShutdownSender)>,
}

impl RunView for RecordingView {
    fn clear(&mut self) {
        self.clears = self.clears.saturating_add(1);
        self.lines.clear();
        self.progress.clear();
        self.finished = None;
    }

    fn log_line(&mut self, line: &str) {
        self.lines.push(line.to_owned());
        if let Some((after, shutdown_tx)) = self.cancel_after.as_ref()
            && self.lines.len() == *after
        {
            drop(shutdown_tx.send(()));
        }
    }

    fn progress(&mut self, percent: u8) {
        self.progress.push(percent);
    }

    fn validation_error(&mut self, message: &str) {
        self.errors.push(message.to_owned());
    }

    fn finished(&mut self, summary: &RunSummary) {
        self.finished = Some(summary.clone());
    }
}

fn raw(url: &str, request_count: u64, worker_limit: usize) -> RawInputs {
    RawInputs {
        url: url.to_owned(),
        request_count,
        worker_limit,
        ..RawInputs::default()
    }
}

#[test]
fn invalid_scheme_is_rejected_before_dispatch() -> Result<(), String> {
    run_async_test(async {
        let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let log_path = dir.path().join("run.log");
        let log = LogFileSink::open(&log_path)
            .await
            .map_err(|err| err.to_string())?;
        let factory = StaticFactory::default();
        let builds = Arc::clone(&factory.builds);
        let mut controller = Controller::new(factory, Some(log));
        let mut view = RecordingView::default();

        let result = controller
            .validate_and_run(&raw("ftp://example.com", 3, 1), &mut view)
            .await;
        match result {
            Err(AppError::Validation(ValidationError::InvalidUrlScheme { .. })) => {}
            other => return Err(format!("Expected validation error, got {:?}", other)),
        }
        if view.errors.len() != 1 {
            return Err(format!("Expected one error message, got {:?}", view.errors));
        }
        if !view.lines.is_empty() || !view.progress.is_empty() || view.clears != 0 {
            return Err("Expected the view to be left untouched".to_owned());
        }
        if builds.load(Ordering::SeqCst) != 0 {
            return Err("Expected no executor to be built".to_owned());
        }
        drop(controller);
        let content = std::fs::read_to_string(&log_path)
            .map_err(|err| format!("read failed: {}", err))?;
        if !content.is_empty() {
            return Err(format!("Expected an empty log, got {}", content));
        }
        Ok(())
    })
}

#[test]
fn run_relays_events_to_view_and_log() -> Result<(), String> {
    run_async_test(async {
        let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let log_path = dir.path().join("run.log");
        let log = LogFileSink::open(&log_path)
            .await
            .map_err(|err| err.to_string())?;
        let mut controller = Controller::new(
            StaticFactory {
                latency: Duration::from_millis(2),
                ..StaticFactory::default()
            },
            Some(log),
        );
        let mut view = RecordingView::default();

        let summary = controller
            .validate_and_run(&raw("http://example.com", 5, 2), &mut view)
            .await
            .map_err(|err| err.to_string())?;

        if summary.succeeded != 5 || summary.failed != 0 || summary.completed != 5 {
            return Err(format!("Unexpected summary: {:?}", summary));
        }
        if summary.peak_in_flight > 2 {
            return Err(format!("Peak {} exceeded limit", summary.peak_in_flight));
        }
        let start = view.lines.first().ok_or("missing start line")?;
        if !start.starts_with("Starting run on http://example.com with 5 requests and 2 workers") {
            return Err(format!("Unexpected start line: {}", start));
        }
        let outcome_lines: Vec<&String> = view.lines.iter().skip(1).collect();
        if outcome_lines.len() != 5
            || !outcome_lines
                .iter()
                .all(|line| line.ends_with(" Request: 200 OK"))
        {
            return Err(format!("Unexpected outcome lines: {:?}", outcome_lines));
        }
        if view.progress.first() != Some(&0) || view.progress.last() != Some(&100) {
            return Err(format!("Unexpected progress: {:?}", view.progress));
        }
        if view.progress.windows(2).any(|pair| matches!(pair, [a, b] if b < a)) {
            return Err(format!("Progress went backwards: {:?}", view.progress));
        }
        if view.finished.as_ref() != Some(&summary) {
            return Err("Expected the view to receive the summary".to_owned());
        }

        drop(controller);
        let content = std::fs::read_to_string(&log_path)
            .map_err(|err| format!("read failed: {}", err))?;
        let lines: Vec<&str> = content.lines().collect();
        if lines.len() != 6 {
            return Err(format!("Expected 6 log lines, got {}", lines.len()));
        }
        if !lines.iter().all(|line| line.contains(" - ")) {
            return Err("Expected timestamped log lines".to_owned());
        }
        Ok(())
    })
}

#[test]
fn failures_are_counted_and_logged() -> Result<(), String> {
    run_async_test(async {
        let mut controller = Controller::new(
            StaticFactory {
                fail_on: vec![2, 4],
                ..StaticFactory::default()
            },
            None,
        );
        let mut view = RecordingView::default();

        let summary = controller
            .validate_and_run(&raw("https://example.com", 4, 4), &mut view)
            .await
            .map_err(|err| err.to_string())?;

        if summary.succeeded != 2 || summary.failed != 2 {
            return Err(format!("Unexpected summary: {:?}", summary));
        }
        let errors: Vec<&String> = view
            .lines
            .iter()
            .filter(|line| line.contains(" Request: Error connection reset"))
            .collect();
        if errors.len() != 2 {
            return Err(format!("Expected two error lines, got {:?}", view.lines));
        }
        Ok(())
    })
}

#[test]
fn consecutive_runs_start_from_clean_state() -> Result<(), String> {
    run_async_test(async {
        let mut controller = Controller::new(StaticFactory::default(), None);
        let mut view = RecordingView::default();

        let first = controller
            .validate_and_run(&raw("http://example.com", 3, 1), &mut view)
            .await
            .map_err(|err| err.to_string())?;
        let second = controller
            .validate_and_run(&raw("http://example.com", 2, 1), &mut view)
            .await
            .map_err(|err| err.to_string())?;

        if first.completed != 3 || second.completed != 2 {
            return Err(format!("Unexpected totals: {:?} {:?}", first, second));
        }
        if view.clears != 2 {
            return Err(format!("Expected two clears, got {}", view.clears));
        }
        if view.lines.len() != 3 {
            return Err(format!("Expected only the second run's lines, got {:?}", view.lines));
        }
        if view.progress.first() != Some(&0) || view.progress.last() != Some(&100) {
            return Err(format!("Unexpected progress: {:?}", view.progress));
        }
        Ok(())
    })
}

#[test]
fn shutdown_sender_cancels_active_run() -> Result<(), String> {
    run_async_test(async {
        let mut controller = Controller::new(
            StaticFactory {
                latency: Duration::from_millis(10),
                ..StaticFactory::default()
            },
            None,
        );
        let mut view = RecordingView {
            cancel_after: Some((3, controller.shutdown_sender())),
            ..RecordingView::default()
        };

        let summary = controller
            .validate_and_run(&raw("http://example.com", 200, 2), &mut view)
            .await
            .map_err(|err| err.to_string())?;

        if !summary.cancelled {
            return Err("Expected a cancelled run".to_owned());
        }
        if summary.completed >= 200 {
            return Err(format!("Expected an early stop, got {}", summary.completed));
        }
        if summary.succeeded.saturating_add(summary.failed) != summary.completed {
            return Err(format!("Inconsistent summary: {:?}", summary));
        }
        Ok(())
    })
}

#[cfg(target_os = "linux")]
#[test]
fn unwritable_log_file_does_not_stop_run() -> Result<(), String> {
    run_async_test(async {
        let log = LogFileSink::open("/dev/full")
            .await
            .map_err(|err| err.to_string())?;
        let mut controller = Controller::new(StaticFactory::default(), Some(log));
        let mut view = RecordingView::default();

        let summary = controller
            .validate_and_run(&raw("http://example.com", 3, 1), &mut view)
            .await
            .map_err(|err| err.to_string())?;
        if summary.completed != 3 || view.lines.len() != 4 {
            return Err(format!("Unexpected run: {:?} {:?}", summary, view.lines));
        }
        Ok(())
    })
}

#[test]
fn raw_inputs_convert_delay_and_proxies() -> Result<(), String> {
    let inputs = RawInputs {
        url: "https://example.com".to_owned(),
        request_count: 3,
        worker_limit: 2,
        delay_ms: 250,
        proxies: " p1:8080, ,http://p2:3128 ".to_owned(),
        request_timeout: Some(Duration::from_secs(2)),
    };
    let config = inputs.validate().map_err(|err| err.to_string())?;
    if config.delay() != Duration::from_millis(250) {
        return Err(format!("Unexpected delay: {:?}", config.delay()));
    }
    if config.proxies() != ["p1:8080".to_owned(), "http://p2:3128".to_owned()] {
        return Err(format!("Unexpected proxies: {:?}", config.proxies()));
    }
    if config.request_timeout() != Some(Duration::from_secs(2)) {
        return Err("Expected the timeout to carry over".to_owned());
    }
    Ok(())
}

#[test]
fn empty_proxy_field_yields_no_proxies() -> Result<(), String> {
    if !parse_proxy_list("").is_empty() || !parse_proxy_list(" , ").is_empty() {
        return Err("Expected no proxies".to_owned());
    }
    if parse_proxy_list("a,b,a") != vec!["a".to_owned(), "b".to_owned(), "a".to_owned()] {
        return Err("Expected order and duplicates to be kept".to_owned());
    }
    Ok(())
}

#[test]
fn missing_url_is_validation_error() -> Result<(), String> {
    match raw("  ", 1, 1).validate() {
        Err(ValidationError::MissingUrl) => Ok(()),
        other => Err(format!("Expected MissingUrl, got {:?}", other)),
    }
}
