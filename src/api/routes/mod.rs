//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`projects`] - Selectable project catalog
//! - [`scrapes`] - Scrape session start/stop/status/corpus
//! - [`analysis`] - Corpus analysis
//! - [`system`] - Health, events, OpenAPI

use serde::{Deserialize, Serialize};

mod analysis;
mod projects;
mod scrapes;
mod system;

pub use analysis::*;
pub use projects::*;
pub use scrapes::*;
pub use system::*;

/// Request body for POST /scrapes
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct StartScrapeRequest {
    /// Project keys to walk, in order
    #[serde(default)]
    pub projects: Vec<String>,
}
