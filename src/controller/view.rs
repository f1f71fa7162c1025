use super::session::RunSummary;

/// Rendering collaborator fed by the controller.
///
/// Called only from the controller's own task, never from dispatch workers.
pub trait RunView {
    /// Drops whatever the previous run displayed.
    fn clear(&mut self);

    fn log_line(&mut self, line: &str);

    /// Whole percent, `0..=100`.
    fn progress(&mut self, percent: u8);

    fn validation_error(&mut self, message: &str);

    fn finished(&mut self, _summary: &RunSummary) {}
}
