//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the issue-corpus REST API
//! using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the issue-corpus REST API
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation (if enabled)
#[derive(OpenApi)]
#[openapi(
    info(
        title = "issue-corpus REST API",
        version = "0.1.0",
        description = "Simulated issue-tracker scraping into an NDJSON training corpus, with optional analysis",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:6790", description = "Local development server")
    ),
    paths(
        // Projects
        crate::api::routes::list_projects,

        // Scrape session
        crate::api::routes::start_scrape,
        crate::api::routes::stop_scrape,
        crate::api::routes::scrape_status,
        crate::api::routes::get_corpus,

        // Analysis
        crate::api::routes::analyze_corpus,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
        crate::api::routes::event_stream,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::Project,
        crate::types::ScrapeProgress,
        crate::types::SessionState,
        crate::types::SessionStatus,
        crate::types::AnalysisResult,
        crate::types::Event,

        // Config types from config.rs
        crate::config::Config,
        crate::config::ScrapeConfig,
        crate::config::AnalysisConfig,
        crate::config::RetryConfig,
        crate::config::ApiConfig,

        // API request types
        crate::api::routes::StartScrapeRequest,

        // Error types from error.rs
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "projects", description = "Project catalog - Projects that can be selected for a scrape"),
        (name = "scrapes", description = "Scrape session - Start, stop and monitor runs, download the corpus"),
        (name = "analysis", description = "Analysis - Submit the latest corpus to the text-analysis service"),
        (name = "system", description = "System endpoints - Health checks, OpenAPI spec, events"),
    )
)]
pub struct ApiDoc;
