use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Proxy};
use tracing::{debug, warn};

use crate::args::DEFAULT_USER_AGENT;
use crate::dispatch::{ExecutorFactory, OutcomeKind, RequestExecutor, RunConfig, Task};
use crate::error::{AppError, AppResult, HttpError};

use super::execution::{describe_error, send_get};

/// Adds `http://` to proxy entries given as bare `host:port`.
#[must_use]
pub fn normalize_proxy(proxy: &str) -> String {
    if proxy.contains("://") {
        proxy.to_owned()
    } else {
        format!("http://{}", proxy)
    }
}

enum ProxyClient {
    Ready(Client),
    Invalid { proxy: String, reason: String },
}

/// `reqwest` executor with one client for direct requests and one per proxy.
///
/// `reqwest` fixes proxies per client, so each proxy entry gets its own
/// client (and connection pool) routing both HTTP and HTTPS through it.
pub struct HttpExecutor {
    direct: Client,
    proxied: Vec<ProxyClient>,
}

impl HttpExecutor {
    /// Builds clients for the given proxies.
    ///
    /// A proxy the client rejects is kept as a placeholder; tasks assigned to
    /// it fail individually instead of failing the run.
    ///
    /// # Errors
    ///
    /// Returns an error when the direct client cannot be built.
    pub fn new(proxies: &[String], timeout: Option<Duration>) -> Result<Self, HttpError> {
        let direct = build_client(None, timeout)
            .map_err(|err| HttpError::BuildClientFailed { source: err })?;
        let proxied = proxies
            .iter()
            .map(|proxy| match build_client(Some(proxy), timeout) {
                Ok(client) => ProxyClient::Ready(client),
                Err(err) => {
                    warn!("Invalid proxy '{}': {}", proxy, err);
                    ProxyClient::Invalid {
                        proxy: proxy.clone(),
                        reason: describe_error(&err),
                    }
                }
            })
            .collect();
        Ok(Self { direct, proxied })
    }
}

fn build_client(proxy: Option<&str>, timeout: Option<Duration>) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().user_agent(DEFAULT_USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder = match proxy {
        Some(proxy) => builder.proxy(Proxy::all(normalize_proxy(proxy))?),
        // Direct tasks ignore HTTP_PROXY and friends.
        None => builder.no_proxy(),
    };
    builder.build()
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self, target_url: &str, task: &Task) -> OutcomeKind {
        let client = match task.proxy_index() {
            None => &self.direct,
            Some(index) => match self.proxied.get(index) {
                Some(ProxyClient::Ready(client)) => client,
                Some(ProxyClient::Invalid { proxy, reason }) => {
                    return OutcomeKind::Failure {
                        error_description: format!("Invalid proxy '{}': {}", proxy, reason),
                    };
                }
                None => {
                    return OutcomeKind::Failure {
                        error_description: format!("No proxy configured at position {}", index),
                    };
                }
            },
        };
        debug!(
            "Task {} -> {} via {}",
            task.sequence_number(),
            target_url,
            task.assigned_proxy().unwrap_or("direct")
        );
        send_get(client, target_url).await
    }
}

/// Builds an [`HttpExecutor`] per run from the run's proxies and timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpExecutorFactory;

impl ExecutorFactory for HttpExecutorFactory {
    fn build(&self, config: &RunConfig) -> AppResult<Arc<dyn RequestExecutor>> {
        let executor =
            HttpExecutor::new(config.proxies(), config.request_timeout()).map_err(AppError::http)?;
        Ok(Arc::new(executor))
    }
}
