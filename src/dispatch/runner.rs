use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::Stream;
use tokio::sync::{broadcast::error::TryRecvError, mpsc};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Instant, sleep};
use tracing::{debug, error};

use crate::shutdown::{ShutdownReceiver, ShutdownSender};

use super::config::RunConfig;
use super::executor::RequestExecutor;
use super::inflight::InflightGauge;
use super::outcome::{Outcome, RunEvent};
use super::progress::ProgressTracker;
use super::task::{Task, build_tasks};

/// Totals for a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub total: u64,
    pub completed: u64,
    pub peak_in_flight: usize,
    pub cancelled: bool,
    pub elapsed: Duration,
}

/// Event stream of one run.
///
/// Yields one [`RunEvent`] per finished task in completion order and ends
/// after the last worker exits.
pub struct RunHandle {
    events: mpsc::UnboundedReceiver<RunEvent>,
    supervisor: JoinHandle<RunReport>,
}

impl RunHandle {
    pub async fn next_event(&mut self) -> Option<RunEvent> {
        self.events.recv().await
    }

    /// Waits for every worker and returns the run totals.
    ///
    /// # Errors
    ///
    /// Returns an error when the supervising task panicked.
    pub async fn finish(self) -> Result<RunReport, JoinError> {
        drop(self.events);
        self.supervisor.await
    }
}

impl Stream for RunHandle {
    type Item = RunEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().events.poll_recv(cx)
    }
}

/// Hands out each task exactly once across workers.
struct TaskQueue {
    tasks: Vec<Task>,
    next: AtomicUsize,
}

impl TaskQueue {
    const fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            next: AtomicUsize::new(0),
        }
    }

    fn claim(&self) -> Option<&Task> {
        let index = self.next.fetch_add(1, Ordering::AcqRel);
        self.tasks.get(index)
    }
}

struct WorkerContext {
    queue: Arc<TaskQueue>,
    executor: Arc<dyn RequestExecutor>,
    progress: Arc<ProgressTracker>,
    inflight: Arc<InflightGauge>,
    cancelled: Arc<AtomicBool>,
    target_url: Arc<str>,
    delay: Duration,
}

/// Starts a run and returns its event stream.
///
/// Tasks and their proxies are fixed before any worker starts. At most
/// `worker_limit` workers are spawned; each one pulls the next unstarted
/// task as soon as it is free. A message on `shutdown_tx` sent after this
/// call returns cancels the run: in-flight requests are abandoned and no new
/// tasks start. Must be called from within a tokio runtime.
#[must_use]
pub fn execute(
    config: &RunConfig,
    executor: Arc<dyn RequestExecutor>,
    shutdown_tx: &ShutdownSender,
) -> RunHandle {
    let total = config.request_count();
    let queue = Arc::new(TaskQueue::new(build_tasks(total, config.proxies())));
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let progress = Arc::new(ProgressTracker::new(total, events_tx));
    let inflight = Arc::new(InflightGauge::default());
    let cancelled = Arc::new(AtomicBool::new(false));
    let target_url: Arc<str> = Arc::from(config.target_url());

    let worker_count = usize::try_from(total)
        .unwrap_or(usize::MAX)
        .min(config.worker_limit());
    let mut workers = Vec::with_capacity(worker_count);
    let run_start = Instant::now();

    for worker_id in 0..worker_count {
        let context = WorkerContext {
            queue: Arc::clone(&queue),
            executor: Arc::clone(&executor),
            progress: Arc::clone(&progress),
            inflight: Arc::clone(&inflight),
            cancelled: Arc::clone(&cancelled),
            target_url: Arc::clone(&target_url),
            delay: config.delay(),
        };
        let worker_shutdown_tx = shutdown_tx.clone();
        let shutdown_rx = shutdown_tx.subscribe();
        workers.push(tokio::spawn(async move {
            run_worker(worker_id, context, worker_shutdown_tx, shutdown_rx).await;
        }));
    }

    let supervisor = tokio::spawn(async move {
        for handle in workers {
            if let Err(err) = handle.await {
                error!("Dispatch worker failed: {}", err);
            }
        }
        let completed = progress.completed();
        let report = RunReport {
            total,
            completed,
            peak_in_flight: inflight.peak(),
            // A shutdown during a worker's trailing delay leaves every outcome
            // emitted; that run is complete.
            cancelled: cancelled.load(Ordering::Acquire) && completed < total,
            elapsed: run_start.elapsed(),
        };
        drop(progress);
        report
    });

    RunHandle {
        events: events_rx,
        supervisor,
    }
}

async fn run_worker(
    worker_id: usize,
    context: WorkerContext,
    // Held so the channel stays open for the receiver below.
    _shutdown_tx: ShutdownSender,
    mut shutdown_rx: ShutdownReceiver,
) {
    let mut handled: u64 = 0;
    loop {
        if shutdown_requested(&mut shutdown_rx) {
            context.cancelled.store(true, Ordering::Release);
            break;
        }
        let Some(task) = context.queue.claim() else {
            break;
        };

        let guard = context.inflight.enter();
        let kind = tokio::select! {
            _ = shutdown_rx.recv() => {
                context.cancelled.store(true, Ordering::Release);
                break;
            }
            kind = context.executor.execute(&context.target_url, task) => kind,
        };
        drop(guard);
        handled = handled.saturating_add(1);

        if !context
            .progress
            .record(Outcome::new(task.sequence_number(), kind))
        {
            debug!("Worker {} stopping: event consumer dropped", worker_id);
            break;
        }

        if !context.delay.is_zero() {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    context.cancelled.store(true, Ordering::Release);
                    break;
                }
                () = sleep(context.delay) => {}
            }
        }
    }
    debug!("Worker {} finished after {} tasks", worker_id, handled);
}

fn shutdown_requested(shutdown_rx: &mut ShutdownReceiver) -> bool {
    match shutdown_rx.try_recv() {
        Err(TryRecvError::Empty | TryRecvError::Closed) => false,
        Ok(()) | Err(TryRecvError::Lagged(_)) => true,
    }
}
