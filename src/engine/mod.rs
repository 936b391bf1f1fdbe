//! Scrape simulation engine.
//!
//! Split into focused submodules:
//! - [`observer`] - Progress/complete/error notification channels
//! - [`walk`] - The cancellable walk over projects and issues
//!
//! Every run owns its own [`CancellationToken`] and corpus sink, so any number
//! of runs may be started from the same engine without interfering.

pub mod observer;
mod walk;


pub use observer::{CallbackObserver, ChannelObserver, ScrapeEvent, ScrapeObserver, channel};

use crate::config::ScrapeConfig;
use crate::error::{Error, Result};
use crate::store::RecordSource;
use crate::types::ScrapeProgress;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// How a run ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every selected project was walked
    Completed {
        /// Joined corpus lines
        corpus: String,
        /// Terminal snapshot
        progress: ScrapeProgress,
    },
    /// The run was stopped by the user; `corpus` holds what was gathered so far
    Cancelled {
        /// Joined corpus lines gathered before cancellation
        corpus: String,
        /// Terminal snapshot
        progress: ScrapeProgress,
    },
    /// The run failed; no corpus was delivered
    Failed {
        /// Error message passed to `on_error`
        message: String,
    },
}

impl RunOutcome {
    /// Corpus delivered by `on_complete`, if any
    pub fn corpus(&self) -> Option<&str> {
        match self {
            RunOutcome::Completed { corpus, .. } | RunOutcome::Cancelled { corpus, .. } => {
                Some(corpus)
            }
            RunOutcome::Failed { .. } => None,
        }
    }

    /// Terminal snapshot, if the run did not fail
    pub fn progress(&self) -> Option<&ScrapeProgress> {
        match self {
            RunOutcome::Completed { progress, .. } | RunOutcome::Cancelled { progress, .. } => {
                Some(progress)
            }
            RunOutcome::Failed { .. } => None,
        }
    }
}

/// Drives simulated scrapes over a record source
#[derive(Clone)]
pub struct ScrapeEngine {
    source: Arc<dyn RecordSource>,
    config: ScrapeConfig,
}

impl ScrapeEngine {
    /// Create an engine reading from `source`
    pub fn new(source: Arc<dyn RecordSource>, config: ScrapeConfig) -> Self {
        Self { source, config }
    }

    /// Engine settings
    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Spawn a run over `project_keys` on the current tokio runtime.
    ///
    /// `project_keys` is walked in order; duplicates are walked again. The
    /// caller is responsible for rejecting an empty selection.
    pub fn start<O>(&self, project_keys: Vec<String>, mut observer: O) -> ScrapeHandle
    where
        O: ScrapeObserver + 'static,
    {
        let cancel_token = CancellationToken::new();
        let engine = self.clone();
        let token = cancel_token.clone();

        let task = tokio::spawn(async move {
            engine.run(&project_keys, &mut observer, &token).await
        });

        ScrapeHandle { cancel_token, task }
    }

    /// Run a scrape inline, polling `cancel_token` after each simulated wait.
    ///
    /// Exactly one of `observer.on_complete` or `observer.on_error` is called
    /// before this returns.
    pub async fn run<O>(
        &self,
        project_keys: &[String],
        observer: &mut O,
        cancel_token: &CancellationToken,
    ) -> RunOutcome
    where
        O: ScrapeObserver,
    {
        walk::execute(self, project_keys, observer, cancel_token).await
    }
}

/// Handle to a spawned run
#[derive(Debug)]
pub struct ScrapeHandle {
    cancel_token: CancellationToken,
    task: tokio::task::JoinHandle<RunOutcome>,
}

impl ScrapeHandle {
    /// Request cooperative cancellation.
    ///
    /// Idempotent, and a no-op once the run has finished. A simulated wait
    /// already in flight is not interrupted; the run stops at the next check.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Whether the run task has finished
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// A clone of the run's cancellation token
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Wait for the run to end
    pub async fn join(self) -> Result<RunOutcome> {
        self.task
            .await
            .map_err(|e| Error::Other(format!("scrape task did not finish: {}", e)))
    }
}
