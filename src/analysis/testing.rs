//! Analyzer double for unit tests.

use crate::error::{AnalysisError, Result};
use async_trait::async_trait;
use std::sync::Mutex;

use super::CorpusAnalyzer;

/// Analyzer that answers from a fixed script and records its inputs
pub(crate) struct StubAnalyzer {
    reply: Option<String>,
    pub(crate) seen: Mutex<Vec<String>>,
}

impl StubAnalyzer {
    /// Always answer with `text`
    pub(crate) fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with a 500 status
    pub(crate) fn failing() -> Self {
        Self {
            reply: None,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CorpusAnalyzer for StubAnalyzer {
    async fn analyze(&self, corpus: &str) -> Result<String> {
        self.seen.lock().unwrap().push(corpus.to_string());
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(AnalysisError::Status {
                status: 500,
                body: "stub failure".to_string(),
            }
            .into()),
        }
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}
