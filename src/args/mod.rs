//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;


pub use cli::ReqburstArgs;

pub use defaults::{DEFAULT_LOG_FILE, DEFAULT_USER_AGENT};
