use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppResult;

use super::config::RunConfig;
use super::outcome::OutcomeKind;
use super::task::Task;

/// Performs the request for one task.
///
/// Implementations never fail: transport errors become
/// [`OutcomeKind::Failure`] so one bad request cannot end the run.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, target_url: &str, task: &Task) -> OutcomeKind;
}

/// Builds the executor used for a single run.
pub trait ExecutorFactory: Send + Sync {
    /// # Errors
    ///
    /// Returns an error when the transport cannot be set up at all.
    fn build(&self, config: &RunConfig) -> AppResult<Arc<dyn RequestExecutor>>;
}
