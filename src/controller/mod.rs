//! Input validation and run orchestration.
//!
//! The controller turns raw front-end inputs into a [`RunConfig`], starts a
//! dispatch run and relays its events to a [`RunView`] and the log file.
//!
//! [`RunConfig`]: crate::dispatch::RunConfig
mod inputs;
mod session;
mod view;

#[cfg(test)]
mod tests;

pub use inputs::{RawInputs, parse_proxy_list};
pub use session::{Controller, RunSummary};
pub use view::RunView;
