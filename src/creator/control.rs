//! Scrape session control: start, stop, status and corpus access.

use crate::engine::RunOutcome;
use crate::error::{Error, Result};
use crate::types::{Event, ScrapeProgress, SessionState, SessionStatus};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use super::CorpusCreator;
use super::session::{self, SessionObserver};

impl CorpusCreator {
    /// Start a run over `projects`, in the given order
    ///
    /// Returns the initializing snapshot. Unknown project keys are accepted
    /// and skipped by the engine.
    ///
    /// # Errors
    ///
    /// - [`Error::NoProjectsSelected`] if `projects` is empty
    /// - [`Error::ScrapeInProgress`] if a run is still active (including one
    ///   that was asked to stop but has not reached its next check yet)
    pub fn start_scrape(&self, projects: Vec<String>) -> Result<ScrapeProgress> {
        if projects.is_empty() {
            return Err(Error::NoProjectsSelected);
        }

        let mut guard = session::lock(&self.session);
        if guard.state == SessionState::Running {
            return Err(Error::ScrapeInProgress);
        }

        let initial = ScrapeProgress::initializing(projects.len());
        guard.state = SessionState::Running;
        guard.progress = initial.clone();
        guard.corpus = None;
        guard.analysis = None;
        guard.error = None;
        guard.stop_requested = false;
        guard.started_at = Some(chrono::Utc::now());

        tracing::info!(projects = ?projects, "Starting scrape session");
        self.emit_event(Event::ScrapeStarted {
            projects: projects.clone(),
        });

        let observer = SessionObserver {
            session: Arc::clone(&self.session),
            event_tx: self.event_tx.clone(),
        };
        let handle = self.engine.start(projects, observer);
        guard.cancel_token = Some(handle.cancel_token());
        guard.active = Some(handle);

        Ok(initial)
    }

    /// Ask the active run to stop
    ///
    /// Idempotent, and a no-op when no run is active. Works whether or not a
    /// waiter holds the run's handle. The run's partial corpus is kept once it
    /// reaches its next cancellation check. A stop that arrives after the
    /// run's last check leaves it `Complete`.
    pub fn stop_scrape(&self) {
        let mut guard = session::lock(&self.session);
        if guard.state != SessionState::Running || guard.stop_requested {
            return;
        }

        guard.stop_requested = true;
        if let Some(token) = &guard.cancel_token {
            token.cancel();
        }
        tracing::info!("Stop requested for scrape session");
    }

    /// Wait for the active run to end
    ///
    /// Returns `None` when no run has been started since the last wait.
    pub async fn wait_for_scrape(&self) -> Result<Option<RunOutcome>> {
        let handle = session::lock(&self.session).active.take();
        match handle {
            Some(handle) => handle.join().await.map(Some),
            None => Ok(None),
        }
    }

    /// Stop any active run and wait for it to finish
    pub async fn shutdown(&self) -> Result<()> {
        self.stop_scrape();
        if let Some(outcome) = self.wait_for_scrape().await? {
            tracing::info!(
                issues = outcome.progress().map_or(0, |p| p.issues_scraped),
                "Active run finished during shutdown"
            );
        }
        Ok(())
    }

    /// Current session status
    pub fn status(&self) -> SessionStatus {
        let guard = session::lock(&self.session);
        let (issue_count, corpus_sha256) = match &guard.corpus {
            Some(corpus) => (line_count(corpus), Some(digest(corpus))),
            None => (0, None),
        };

        SessionStatus {
            state: guard.state,
            progress: guard.progress.clone(),
            issue_count,
            corpus_sha256,
            error: guard.error.clone(),
            started_at: guard.started_at,
        }
    }

    /// Corpus of the most recent finished run (possibly empty if it was stopped early)
    ///
    /// # Errors
    ///
    /// [`Error::NoCorpus`] if no run has delivered a corpus yet, or while a new
    /// run is active.
    pub fn corpus(&self) -> Result<String> {
        session::lock(&self.session)
            .corpus
            .clone()
            .ok_or(Error::NoCorpus)
    }
}

fn line_count(corpus: &str) -> usize {
    if corpus.is_empty() {
        0
    } else {
        corpus.lines().count()
    }
}

fn digest(corpus: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(corpus.as_bytes());
    format!("{:x}", hasher.finalize())
}
