//! Subcommand implementations.

pub mod apply;
pub mod del;
pub mod interfaces;
pub mod show;

use std::time::Duration;

use anyhow::{Context as _, bail};
use netpilot::{QosManager, TcConfig};

/// Shared state for commands that run tc.
pub struct Context {
    qos: QosManager,
    timeout: Option<Duration>,
}

impl Context {
    pub fn new(config: TcConfig, timeout: Option<Duration>) -> Self {
        Self {
            qos: QosManager::new(config),
            timeout,
        }
    }

    /// Run a blocking rule operation on the blocking pool.
    ///
    /// With a timeout the caller stops waiting once it elapses; the tc
    /// process itself is left to finish.
    pub async fn run<T, F>(&self, op: F) -> anyhow::Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&QosManager) -> netpilot::Result<T> + Send + 'static,
    {
        let qos = self.qos.clone();
        let task = tokio::task::spawn_blocking(move || op(&qos));

        let joined = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => bail!("tc did not finish within {}s", limit.as_secs()),
            },
            None => task.await,
        };

        let result = joined.context("tc task panicked")?;
        result.map_err(anyhow::Error::from)
    }
}
