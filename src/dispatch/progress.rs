use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;

use super::outcome::{Outcome, RunEvent};

/// `floor(completed * 100 / total)`, clamped to 100.
#[must_use]
pub fn progress_percent(completed: u64, total: u64) -> u8 {
    let percent = completed
        .saturating_mul(100)
        .checked_div(total)
        .unwrap_or(100)
        .min(100);
    u8::try_from(percent).unwrap_or(100)
}

/// Completion counter for one run.
///
/// `record` bumps the counter and sends while holding the sender's lock, so
/// the emitted progress values are non-decreasing in channel order.
pub(super) struct ProgressTracker {
    completed: AtomicU64,
    total: u64,
    events: Mutex<mpsc::UnboundedSender<RunEvent>>,
}

impl ProgressTracker {
    pub(super) const fn new(total: u64, events: mpsc::UnboundedSender<RunEvent>) -> Self {
        Self {
            completed: AtomicU64::new(0),
            total,
            events: Mutex::new(events),
        }
    }

    /// Counts one finished task and emits its event.
    ///
    /// Returns `false` once the consumer has gone away.
    pub(super) fn record(&self, outcome: Outcome) -> bool {
        let events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        let completed = self
            .completed
            .fetch_add(1, Ordering::AcqRel)
            .saturating_add(1);
        let progress = progress_percent(completed, self.total);
        events.send(RunEvent { outcome, progress }).is_ok()
    }

    pub(super) fn completed(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }
}
