//! Error types for issue-corpus
//!
//! This module provides:
//! - The crate-wide [`Error`] type and [`Result`] alias
//! - Analysis-service errors ([`AnalysisError`])
//! - HTTP status code mapping for API integration ([`ToHttpStatus`])
//! - Structured error responses with machine-readable codes ([`ApiError`])

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for issue-corpus operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for issue-corpus
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "scrape.issues_per_project")
        key: Option<String>,
    },

    /// A scrape was requested without any projects
    #[error("please select at least one project to scrape")]
    NoProjectsSelected,

    /// A scrape is already running in this session
    #[error("a scrape is already in progress")]
    ScrapeInProgress,

    /// No corpus has been produced yet
    #[error("no corpus available: run a scrape first")]
    NoCorpus,

    /// Turning an issue into a corpus line failed
    #[error("transform error: {0}")]
    Transform(String),

    /// A progress snapshot could not be delivered to its observer
    #[error("progress delivery failed: {0}")]
    Delivery(String),

    /// Analysis service error
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Errors returned by the text-analysis service
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No API key configured or found in the environment
    #[error("no API key configured for the analysis service")]
    MissingApiKey,

    /// The service answered with a non-success status
    #[error("analysis service returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body (truncated)
        body: String,
    },

    /// The service answered without any candidate text
    #[error("analysis service returned no text")]
    EmptyResponse,
}

/// API error response format
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "no_projects_selected",
///     "message": "please select at least one project to scrape"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "not_found", "validation_error")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create an API error with additional details
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - invalid input
            Error::Config { .. } => 400,
            Error::NoProjectsSelected => 400,

            // 404 Not Found
            Error::NoCorpus => 404,

            // 409 Conflict
            Error::ScrapeInProgress => 409,

            // 502 Bad Gateway - external service errors
            Error::Analysis(AnalysisError::MissingApiKey) => 503,
            Error::Analysis(_) => 502,
            Error::Network(_) => 502,

            // 500 Internal Server Error
            Error::Transform(_) => 500,
            Error::Delivery(_) => 500,
            Error::Serialization(_) => 500,
            Error::Io(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::Other(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::NoProjectsSelected => "no_projects_selected",
            Error::ScrapeInProgress => "scrape_in_progress",
            Error::NoCorpus => "no_corpus",
            Error::Transform(_) => "transform_error",
            Error::Delivery(_) => "delivery_error",
            Error::Analysis(e) => match e {
                AnalysisError::MissingApiKey => "missing_api_key",
                AnalysisError::Status { .. } => "analysis_failed",
                AnalysisError::EmptyResponse => "analysis_empty",
            },
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
            Error::Io(_) => "io_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            Error::Analysis(AnalysisError::Status { status, .. }) => Some(serde_json::json!({
                "upstream_status": status,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn all_error_variants() -> Vec<(Error, u16, &'static str)> {
        vec![
            (
                Error::Config {
                    message: "must be positive".into(),
                    key: Some("scrape.issues_per_project".into()),
                },
                400,
                "config_error",
            ),
            (Error::NoProjectsSelected, 400, "no_projects_selected"),
            (Error::ScrapeInProgress, 409, "scrape_in_progress"),
            (Error::NoCorpus, 404, "no_corpus"),
            (Error::Transform("bad".into()), 500, "transform_error"),
            (Error::Delivery("closed".into()), 500, "delivery_error"),
            (
                Error::Analysis(AnalysisError::MissingApiKey),
                503,
                "missing_api_key",
            ),
            (
                Error::Analysis(AnalysisError::Status {
                    status: 500,
                    body: "boom".into(),
                }),
                502,
                "analysis_failed",
            ),
            (
                Error::Analysis(AnalysisError::EmptyResponse),
                502,
                "analysis_empty",
            ),
            (
                Error::Io(std::io::Error::other("disk")),
                500,
                "io_error",
            ),
            (Error::ApiServerError("bind".into()), 500, "api_server_error"),
            (Error::Other("misc".into()), 500, "internal_error"),
        ]
    }

    #[test]
    fn every_variant_maps_to_expected_status_and_code() {
        for (error, status, code) in all_error_variants() {
            assert_eq!(error.status_code(), status, "status for {error:?}");
            assert_eq!(error.error_code(), code, "code for {error:?}");
        }
    }

    #[test]
    fn config_error_carries_key_in_details() {
        let api_error: ApiError = Error::Config {
            message: "must be positive".into(),
            key: Some("scrape.issues_per_project".into()),
        }
        .into();

        assert_eq!(api_error.error.code, "config_error");
        let details = api_error.error.details.unwrap();
        assert_eq!(details["key"], "scrape.issues_per_project");
    }

    #[test]
    fn upstream_status_is_reported_for_analysis_failures() {
        let api_error: ApiError = Error::Analysis(AnalysisError::Status {
            status: 429,
            body: "quota".into(),
        })
        .into();

        assert!(api_error.error.message.contains("429"));
        assert_eq!(api_error.error.details.unwrap()["upstream_status"], 429);
    }

    #[test]
    fn errors_without_context_have_no_details() {
        let api_error: ApiError = Error::NoCorpus.into();
        assert!(api_error.error.details.is_none());
    }
}
