//! Run observers: the progress / complete / error notification channels.

use crate::error::{Error, Result};
use crate::types::ScrapeProgress;
use tokio::sync::mpsc;

/// Receives the notifications of a single scrape run.
///
/// For every run the engine calls `on_progress` zero or more times, then
/// exactly one of `on_complete` or `on_error`. An `Err` from `on_progress`
/// is fatal to the run and is reported back through `on_error`.
pub trait ScrapeObserver: Send {
    /// A new progress snapshot
    fn on_progress(&mut self, progress: &ScrapeProgress) -> Result<()>;

    /// The run finished (or was cancelled) with this corpus
    fn on_complete(&mut self, corpus: &str);

    /// The run failed
    fn on_error(&mut self, message: &str);
}

/// Message form of the observer notifications
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScrapeEvent {
    /// Progress snapshot
    Progress(ScrapeProgress),
    /// Final corpus (possibly partial if the run was cancelled)
    Complete(String),
    /// Failure message
    Error(String),
}

impl ScrapeEvent {
    /// Whether this is the last event of a run
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScrapeEvent::Complete(_) | ScrapeEvent::Error(_))
    }
}

/// Observer that forwards notifications into an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<ScrapeEvent>,
}

/// Create a channel-backed observer and the receiving end of its events
pub fn channel() -> (ChannelObserver, mpsc::UnboundedReceiver<ScrapeEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelObserver { tx }, rx)
}

impl ScrapeObserver for ChannelObserver {
    fn on_progress(&mut self, progress: &ScrapeProgress) -> Result<()> {
        self.tx
            .send(ScrapeEvent::Progress(progress.clone()))
            .map_err(|_| Error::Delivery("progress receiver dropped".to_string()))
    }

    fn on_complete(&mut self, corpus: &str) {
        if self.tx.send(ScrapeEvent::Complete(corpus.to_string())).is_err() {
            tracing::debug!("Completion receiver dropped");
        }
    }

    fn on_error(&mut self, message: &str) {
        if self.tx.send(ScrapeEvent::Error(message.to_string())).is_err() {
            tracing::debug!(error = %message, "Error receiver dropped");
        }
    }
}

/// Observer built from three closures
pub struct CallbackObserver<P, C, E> {
    on_progress: P,
    on_complete: C,
    on_error: E,
}

impl<P, C, E> CallbackObserver<P, C, E>
where
    P: FnMut(&ScrapeProgress) + Send,
    C: FnMut(&str) + Send,
    E: FnMut(&str) + Send,
{
    /// Wrap the three callbacks
    pub fn new(on_progress: P, on_complete: C, on_error: E) -> Self {
        Self {
            on_progress,
            on_complete,
            on_error,
        }
    }
}

impl<P, C, E> ScrapeObserver for CallbackObserver<P, C, E>
where
    P: FnMut(&ScrapeProgress) + Send,
    C: FnMut(&str) + Send,
    E: FnMut(&str) + Send,
{
    fn on_progress(&mut self, progress: &ScrapeProgress) -> Result<()> {
        (self.on_progress)(progress);
        Ok(())
    }

    fn on_complete(&mut self, corpus: &str) {
        (self.on_complete)(corpus)
    }

    fn on_error(&mut self, message: &str) {
        (self.on_error)(message)
    }
}
