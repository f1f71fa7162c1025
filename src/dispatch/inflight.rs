use std::sync::atomic::{AtomicUsize, Ordering};

/// Tracks how many tasks are in flight and the highest value seen.
#[derive(Debug, Default)]
pub(super) struct InflightGauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InflightGauge {
    pub(super) fn enter(&self) -> InflightGuard<'_> {
        let now = self.current.fetch_add(1, Ordering::AcqRel).saturating_add(1);
        self.peak.fetch_max(now, Ordering::AcqRel);
        InflightGuard { gauge: self }
    }

    pub(super) fn peak(&self) -> usize {
        self.peak.load(Ordering::Acquire)
    }
}

pub(super) struct InflightGuard<'gauge> {
    gauge: &'gauge InflightGauge,
}

impl Drop for InflightGuard<'_> {
    fn drop(&mut self) {
        let counter = &self.gauge.current;
        loop {
            let current = counter.load(Ordering::Acquire);
            let Some(next) = current.checked_sub(1) else {
                break;
            };
            if counter
                .compare_exchange(current, next, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                break;
            }
        }
    }
}
