//! Application state for the API server

use crate::CorpusCreator;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clone).
#[derive(Clone)]
pub struct AppState {
    /// The session controller; configuration is read through it
    pub creator: Arc<CorpusCreator>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(creator: Arc<CorpusCreator>) -> Self {
        Self { creator }
    }
}
