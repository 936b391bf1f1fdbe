//! Client for the `generateContent` endpoint of the generative language API.

use crate::config::{AnalysisConfig, RetryConfig};
use crate::error::{AnalysisError, Error, Result};
use crate::retry::with_retry;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::CorpusAnalyzer;

/// Instruction prepended to the corpus
pub const PROMPT: &str = "
Analyze the following Jira issue data, provided in JSONL format.
Provide an overall analysis of the entire dataset. Identify common themes, potential problem areas,
and the distribution of issue types (e.g., bugs vs. features) based on the provided text.
Structure your response with clear headings and bullet points. Do not use Markdown syntax.

Here is the data:
---
";

/// Longest error body kept in [`AnalysisError::Status`]
const MAX_ERROR_BODY: usize = 512;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.is_empty()).then_some(text)
    }
}

/// Analyzer backed by the Gemini `generateContent` API
#[derive(Clone)]
pub struct GeminiAnalyzer {
    client: reqwest::Client,
    endpoint: url::Url,
    model: String,
    api_key: Option<String>,
    retry: RetryConfig,
}

impl std::fmt::Debug for GeminiAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiAnalyzer")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl GeminiAnalyzer {
    /// Build a client from settings.
    ///
    /// The API key is resolved now; a missing key only fails at [`analyze`](CorpusAnalyzer::analyze).
    pub fn new(config: &AnalysisConfig, retry: RetryConfig) -> Result<Self> {
        let raw = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );
        let endpoint = url::Url::parse(&raw).map_err(|e| Error::Config {
            message: format!("invalid analysis endpoint '{}': {}", raw, e),
            key: Some("analysis.base_url".to_string()),
        })?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
            api_key: config.resolve_api_key(),
            retry,
        })
    }

    /// Fully resolved request URL
    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }

    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: [Content {
                parts: [RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY)
                .collect();
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed
            .into_text()
            .ok_or_else(|| AnalysisError::EmptyResponse.into())
    }
}

#[async_trait]
impl CorpusAnalyzer for GeminiAnalyzer {
    async fn analyze(&self, corpus: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or(AnalysisError::MissingApiKey)?;
        let prompt = format!("{}{}", PROMPT, corpus);

        tracing::info!(
            model = %self.model,
            corpus_bytes = corpus.len(),
            "Requesting corpus analysis"
        );

        let text = with_retry(&self.retry, || self.generate(api_key, &prompt)).await?;

        tracing::debug!(model = %self.model, chars = text.len(), "Analysis received");
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
