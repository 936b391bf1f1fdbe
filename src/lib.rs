//! # issue-corpus
//!
//! Simulated issue-tracker scraping into a newline-delimited JSON corpus for
//! language-model training, with optional analysis of the result.
//!
//! ## Design Philosophy
//!
//! issue-corpus is designed to be:
//! - **Cancellable** - Every run can be stopped cooperatively and keeps its partial corpus
//! - **Deterministic** - The same selection always produces the same corpus bytes
//! - **Library-first** - The engine is usable without the session controller or REST API
//! - **Event-driven** - Consumers observe progress through callbacks or broadcast events
//!
//! ## Quick Start
//!
//! ```no_run
//! use issue_corpus::{Config, CorpusCreator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let creator = CorpusCreator::new(Config::default())?;
//!
//!     // Subscribe to events
//!     let mut events = creator.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     creator.start_scrape(vec!["SPARK".to_string(), "KAFKA".to_string()])?;
//!     creator.wait_for_scrape().await?;
//!     println!("{}", creator.corpus()?);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Corpus analysis through an external service
pub mod analysis;
/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Scrape session controller
pub mod creator;
/// Cancellable scrape engine
pub mod engine;
/// Error types
pub mod error;
/// Retry logic with exponential backoff
pub mod retry;
/// Corpus line accumulator
pub mod sink;
/// Read-only record store
pub mod store;
/// Issue normalization and corpus serialization
pub mod transform;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use analysis::{CorpusAnalyzer, GeminiAnalyzer};
pub use config::{AnalysisConfig, Config, ScrapeConfig};
pub use creator::CorpusCreator;
pub use engine::{
    CallbackObserver, ChannelObserver, RunOutcome, ScrapeEngine, ScrapeEvent, ScrapeHandle,
    ScrapeObserver,
};
pub use error::{AnalysisError, ApiError, Error, ErrorDetail, Result, ToHttpStatus};
pub use store::{RecordSource, RecordStore};
pub use types::{
    AnalysisResult, CorpusRecord, Event, NormalizedIssue, Project, RawComment, RawIssue,
    ScrapeProgress, SessionState, SessionStatus,
};

/// Helper function to run a session controller with graceful signal handling.
///
/// Waits for a termination signal, then stops any active run and waits for
/// it to deliver its corpus.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use issue_corpus::{Config, CorpusCreator, run_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let creator = CorpusCreator::new(Config::default())?;
///     creator.start_scrape(vec!["HADOOP".to_string()])?;
///
///     // Run with automatic signal handling
///     run_with_shutdown(creator).await?;
///
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(creator: CorpusCreator) -> Result<()> {
    wait_for_signal().await;
    creator.shutdown().await
}

#[cfg(unix)]
pub(crate) async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration may fail in restricted environments (containers, tests)
    match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("Received SIGTERM signal"),
                _ = sigint.recv() => tracing::info!("Received SIGINT signal (Ctrl+C)"),
            }
        }
        (Err(e), Ok(mut sigint)) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            sigint.recv().await;
            tracing::info!("Received SIGINT signal (Ctrl+C)");
        }
        (Ok(mut sigterm), Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            sigterm.recv().await;
            tracing::info!("Received SIGTERM signal");
        }
        (Err(e), Err(_)) => {
            tracing::error!(error = %e, "Could not register any signal handlers, using ctrl_c fallback");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

#[cfg(not(unix))]
pub(crate) async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C signal"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C signal"),
    }
}
