use std::sync::Arc;

/// One numbered unit of dispatch work.
///
/// The sequence number labels the result and selects the proxy; it says
/// nothing about when the task runs or finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    sequence_number: u64,
    proxy: Option<ProxySlot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ProxySlot {
    index: usize,
    address: Arc<str>,
}

impl Task {
    #[must_use]
    pub const fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    #[must_use]
    pub fn assigned_proxy(&self) -> Option<&str> {
        self.proxy.as_ref().map(|slot| slot.address.as_ref())
    }

    /// Position of the assigned proxy in the run's proxy list.
    #[must_use]
    pub fn proxy_index(&self) -> Option<usize> {
        self.proxy.as_ref().map(|slot| slot.index)
    }
}

/// Round-robin proxy index for a 1-based sequence number.
fn proxy_index_for(sequence_number: u64, proxy_count: usize) -> Option<usize> {
    let count = u64::try_from(proxy_count).ok()?;
    let offset = sequence_number.checked_sub(1)?.checked_rem(count)?;
    usize::try_from(offset).ok()
}

/// Returns `proxies[(sequence_number - 1) mod len]`, or `None` for an empty list.
#[must_use]
pub fn assign_proxy(proxies: &[String], sequence_number: u64) -> Option<&str> {
    proxy_index_for(sequence_number, proxies.len())
        .and_then(|index| proxies.get(index))
        .map(String::as_str)
}

/// Builds tasks `1..=request_count` with their proxies fixed up front.
#[must_use]
pub fn build_tasks(request_count: u64, proxies: &[String]) -> Vec<Task> {
    let shared: Vec<Arc<str>> = proxies.iter().map(|proxy| Arc::from(proxy.as_str())).collect();
    let capacity = usize::try_from(request_count).unwrap_or(0);
    let mut tasks = Vec::with_capacity(capacity);
    for sequence_number in 1..=request_count {
        let proxy = proxy_index_for(sequence_number, shared.len()).and_then(|index| {
            shared.get(index).map(|address| ProxySlot {
                index,
                address: Arc::clone(address),
            })
        });
        tasks.push(Task {
            sequence_number,
            proxy,
        });
    }
    tasks
}
