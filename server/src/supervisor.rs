use std::future::Future;

use anyhow::{Error, Result};
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

type TaskOutcome = std::result::Result<(&'static str, Result<()>), JoinError>;

/// Owns the server's long-running tasks.
///
/// The first task to fail, or Ctrl-C, cancels the token every task was
/// handed. `run` returns once all tasks have exited.
pub struct Supervisor {
    shutdown: CancellationToken,
    tasks: JoinSet<(&'static str, Result<()>)>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self {
            shutdown: CancellationToken::new(),
            tasks: JoinSet::new(),
        }
    }

    pub fn spawn<F, Fut>(&mut self, name: &'static str, task: F)
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let shutdown = self.shutdown.child_token();
        self.tasks.spawn(async move { (name, task(shutdown).await) });
    }

    pub async fn run(mut self) -> Result<()> {
        let mut first_err: Option<Error> = None;

        while !self.tasks.is_empty() {
            tokio::select! {
                Some(outcome) = self.tasks.join_next() => {
                    if let Some(err) = self.settle(outcome) {
                        first_err.get_or_insert(err);
                    }
                }
                _ = tokio::signal::ctrl_c(), if !self.shutdown.is_cancelled() => {
                    tracing::info!("received Ctrl-C, shutting down");
                    self.shutdown.cancel();
                }
            }
        }

        first_err.map_or(Ok(()), Err)
    }

    /// Log a finished task and return its error, cancelling the rest on failure.
    fn settle(&self, outcome: TaskOutcome) -> Option<Error> {
        let err = match outcome {
            Ok((task, Ok(()))) => {
                tracing::info!(task, "task exited");
                return None;
            }
            Ok((task, Err(err))) => {
                tracing::error!(task, "task failed: {err:#}");
                err
            }
            Err(join_err) => {
                tracing::error!("task panicked: {join_err}");
                join_err.into()
            }
        };

        if !self.shutdown.is_cancelled() {
            tracing::warn!("cancelling remaining tasks");
            self.shutdown.cancel();
        }
        Some(err)
    }
}
