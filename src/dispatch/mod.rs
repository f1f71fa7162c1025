//! Bounded-concurrency request dispatch.
//!
//! A run turns a validated [`RunConfig`] into `request_count` numbered
//! [`Task`]s, executes them on at most `worker_limit` concurrent workers and
//! streams one [`RunEvent`] per finished task, in completion order.
mod config;
mod executor;
mod inflight;
mod outcome;
mod progress;
mod runner;
mod task;


pub use config::{MAX_DELAY_MS, MAX_REQUEST_COUNT, MAX_WORKER_LIMIT, RunConfig};
pub use executor::{ExecutorFactory, RequestExecutor};
pub use outcome::{Outcome, OutcomeKind, RunEvent};
pub use progress::progress_percent;
pub use runner::{RunHandle, RunReport, execute};
pub use task::{Task, assign_proxy, build_tasks};
