//! Shared session record and the observer that keeps it current.

use crate::engine::{ScrapeHandle, ScrapeObserver};
use crate::error::Result;
use crate::types::{AnalysisResult, Event, ScrapeProgress, SessionState};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Mutable state of the scrape session
#[derive(Debug)]
pub(crate) struct Session {
    pub(crate) state: SessionState,
    pub(crate) progress: ScrapeProgress,
    /// Corpus of the most recent run that reached `on_complete`
    pub(crate) corpus: Option<String>,
    pub(crate) error: Option<String>,
    pub(crate) started_at: Option<DateTime<Utc>>,
    /// Analysis of `corpus`, if one was requested
    pub(crate) analysis: Option<AnalysisResult>,
    /// Set by `stop_scrape` so repeated stops are no-ops
    pub(crate) stop_requested: bool,
    /// Token of the active run; stays here after `active` is taken by a waiter
    pub(crate) cancel_token: Option<CancellationToken>,
    /// Handle of the active run, taken by whoever waits on it
    pub(crate) active: Option<ScrapeHandle>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            state: SessionState::Idle,
            progress: ScrapeProgress::ready(),
            corpus: None,
            error: None,
            started_at: None,
            analysis: None,
            stop_requested: false,
            cancel_token: None,
            active: None,
        }
    }
}

/// Lock the session, recovering the guard from a poisoned lock
pub(crate) fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) fn broadcast(event_tx: &broadcast::Sender<Event>, event: Event) {
    // send only fails when nobody is subscribed
    event_tx.send(event).ok();
}

/// Observer installed on every run started by the controller
pub(crate) struct SessionObserver {
    pub(crate) session: Arc<Mutex<Session>>,
    pub(crate) event_tx: broadcast::Sender<Event>,
}

impl ScrapeObserver for SessionObserver {
    fn on_progress(&mut self, progress: &ScrapeProgress) -> Result<()> {
        lock(&self.session).progress = progress.clone();
        broadcast(
            &self.event_tx,
            Event::Progress {
                progress: progress.clone(),
            },
        );
        Ok(())
    }

    fn on_complete(&mut self, corpus: &str) {
        let event = {
            let mut session = lock(&self.session);
            let issues = session.progress.issues_scraped;
            let comments = session.progress.comments_processed;

            session.corpus = Some(corpus.to_string());
            session.cancel_token = None;
            // The terminal snapshot says whether the engine saw the stop
            if session.progress.is_stopped() {
                session.state = SessionState::Stopped;
                Event::ScrapeStopped { issues, comments }
            } else {
                session.state = SessionState::Complete;
                Event::ScrapeComplete { issues, comments }
            }
        };

        tracing::info!(event = event.kind(), "Scrape session finished");
        broadcast(&self.event_tx, event);
    }

    fn on_error(&mut self, message: &str) {
        {
            let mut session = lock(&self.session);
            session.state = SessionState::Failed;
            session.error = Some(message.to_string());
            session.corpus = None;
            session.cancel_token = None;
        }

        broadcast(
            &self.event_tx,
            Event::ScrapeFailed {
                error: message.to_string(),
            },
        );
    }
}
