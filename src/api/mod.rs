//! REST API server module
//!
//! Provides an OpenAPI 3.1 compliant REST API for driving the scrape session,
//! downloading the corpus and requesting an analysis.

use crate::{CorpusCreator, Result};
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Projects
/// - `GET /projects` - List selectable projects
///
/// ## Scrape Session
/// - `POST /scrapes` - Start a run
/// - `POST /scrapes/stop` - Stop the active run
/// - `GET /scrapes/status` - Session status
/// - `GET /scrapes/corpus` - NDJSON corpus of the last finished run
///
/// ## Analysis
/// - `POST /analysis` - Analyze the latest corpus
///
/// ## System
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled)
/// - `GET /events` - Server-sent events stream
pub fn create_router(creator: Arc<CorpusCreator>) -> Router {
    let api_config = creator.config().api.clone();
    let state = AppState::new(creator);

    let router = Router::new()
        // Projects
        .route("/projects", get(routes::list_projects))
        // Scrape session
        .route("/scrapes", post(routes::start_scrape))
        .route("/scrapes/stop", post(routes::stop_scrape))
        .route("/scrapes/status", get(routes::scrape_status))
        .route("/scrapes/corpus", get(routes::get_corpus))
        // Analysis
        .route("/analysis", post(routes::analyze_corpus))
        // System
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec))
        .route("/events", get(routes::event_stream));

    // Merge Swagger UI routes if enabled (before applying state); the UI serves
    // its own copy of the document so it must not reuse the /openapi.json path
    let router = if api_config.swagger_ui {
        router.merge(
            SwaggerUi::new("/swagger-ui").url("/swagger-ui/openapi.json", ApiDoc::openapi()),
        )
    } else {
        router
    };

    let router = router.with_state(state).layer(TraceLayer::new_for_http());

    if api_config.cors_enabled {
        router.layer(build_cors_layer(&api_config.cors_origins))
    } else {
        router
    }
}

/// Build a CORS layer based on configured origins
///
/// `"*"` (or an empty list) allows any origin.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address.
///
/// Serves until SIGTERM/SIGINT (Ctrl+C), then stops any active run and
/// waits for it to deliver its corpus.
///
/// # Example
///
/// ```no_run
/// use issue_corpus::{Config, CorpusCreator};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let creator = Arc::new(CorpusCreator::new(Config::default())?);
///
/// // Start API server (blocks until shutdown)
/// issue_corpus::api::start_api_server(creator).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(creator: Arc<CorpusCreator>) -> Result<()> {
    let bind_address = creator.config().api.bind_address;

    tracing::info!(address = %bind_address, "Starting API server");

    let app = create_router(Arc::clone(&creator));

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(address = %bind_address, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(crate::wait_for_signal())
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    creator.shutdown().await?;
    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
