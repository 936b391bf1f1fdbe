//! Session controller tying the engine, the latest corpus and the analyzer together.
//!
//! - [`control`] - Start, stop and status of the scrape session
//! - [`session`] - Shared session record and the observer that maintains it
//! - [`analysis`] - Submitting the latest corpus for analysis

mod analysis;
mod control;
mod session;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use crate::analysis::{CorpusAnalyzer, GeminiAnalyzer};
use crate::config::Config;
use crate::engine::ScrapeEngine;
use crate::error::Result;
use crate::store::{RecordSource, RecordStore};
use crate::types::{Event, Project};
use std::sync::{Arc, Mutex};

use session::Session;

/// Scrape session controller (cloneable - all fields are Arc-wrapped)
///
/// Owns at most one active run at a time and keeps the corpus of the most
/// recent finished run. Every state change is broadcast as an [`Event`].
#[derive(Clone)]
pub struct CorpusCreator {
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Engine that performs the runs
    pub(crate) engine: ScrapeEngine,
    /// Text analysis collaborator
    pub(crate) analyzer: Arc<dyn CorpusAnalyzer>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
    /// Current session record; never held across an await point
    pub(crate) session: Arc<Mutex<Session>>,
}

impl CorpusCreator {
    /// Create a controller over the bundled sample data and the Gemini analyzer
    pub fn new(config: Config) -> Result<Self> {
        let source = Arc::new(RecordStore::sample()?);
        let analyzer = Arc::new(GeminiAnalyzer::new(&config.analysis, config.retry.clone())?);
        Self::with_parts(config, source, analyzer)
    }

    /// Create a controller from explicit collaborators
    ///
    /// # Errors
    ///
    /// [`crate::Error::Config`] if `config` fails validation.
    pub fn with_parts(
        config: Config,
        source: Arc<dyn RecordSource>,
        analyzer: Arc<dyn CorpusAnalyzer>,
    ) -> Result<Self> {
        config.validate()?;
        let (event_tx, _rx) = tokio::sync::broadcast::channel(config.scrape.event_buffer);
        let engine = ScrapeEngine::new(source, config.scrape.clone());

        Ok(Self {
            config: Arc::new(config),
            engine,
            analyzer,
            event_tx,
            session: Arc::new(Mutex::new(Session::default())),
        })
    }

    /// Subscribe to session events
    ///
    /// Receivers that fall more than `scrape.event_buffer` events behind
    /// observe `RecvError::Lagged`.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Projects that may be selected for a run
    pub fn projects(&self) -> &[Project] {
        &self.config.projects
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Broadcast an event; having no subscribers is not an error
    pub(crate) fn emit_event(&self, event: Event) {
        session::broadcast(&self.event_tx, event);
    }
}
