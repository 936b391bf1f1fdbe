//! Corpus analysis through an external text-generation service.
//!
//! - [`CorpusAnalyzer`] - the seam the session controller calls
//! - [`GeminiAnalyzer`] - `generateContent` client with retry

mod gemini;

pub use gemini::{GeminiAnalyzer, PROMPT};

use crate::error::Result;
use async_trait::async_trait;

/// Produces a free-text analysis of a corpus
#[async_trait]
pub trait CorpusAnalyzer: Send + Sync {
    /// Analyze the NDJSON `corpus` and return the service's text
    async fn analyze(&self, corpus: &str) -> Result<String>;

    /// Model identifier reported alongside results
    fn model(&self) -> &str;
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod testing;
