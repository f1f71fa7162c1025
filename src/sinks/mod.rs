//! Output collaborators: the append-only log file and the terminal view.
mod log_file;
mod terminal;


pub use log_file::{LogFileSink, format_log_line};
pub use terminal::ConsoleView;
