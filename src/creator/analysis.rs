//! Submitting the latest corpus to the analyzer.

use crate::error::{Error, Result};
use crate::types::{AnalysisResult, Event};

use super::CorpusCreator;
use super::session;

impl CorpusCreator {
    /// Analyze the corpus of the most recent finished run
    ///
    /// Emits [`Event::AnalysisComplete`] or [`Event::AnalysisFailed`].
    ///
    /// # Errors
    ///
    /// - [`Error::NoCorpus`] if there is no corpus, or it is empty
    /// - Any analyzer error, unchanged
    pub async fn analyze(&self) -> Result<AnalysisResult> {
        let corpus = self.corpus()?;
        if corpus.is_empty() {
            return Err(Error::NoCorpus);
        }

        match self.analyzer.analyze(&corpus).await {
            Ok(text) => {
                let result = AnalysisResult {
                    text,
                    model: self.analyzer.model().to_string(),
                    analyzed_at: chrono::Utc::now(),
                };

                {
                    let mut guard = session::lock(&self.session);
                    // A run started meanwhile replaced the corpus
                    if guard.corpus.as_deref() == Some(corpus.as_str()) {
                        guard.analysis = Some(result.clone());
                    }
                }

                self.emit_event(Event::AnalysisComplete {
                    model: result.model.clone(),
                });
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Corpus analysis failed");
                self.emit_event(Event::AnalysisFailed {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Most recent analysis of the current corpus
    pub fn last_analysis(&self) -> Option<AnalysisResult> {
        session::lock(&self.session).analysis.clone()
    }
}
