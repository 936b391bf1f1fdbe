//! Scrape session handlers.

use super::StartScrapeRequest;
use crate::api::AppState;
use crate::error::Error;
use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// POST /scrapes - Start a scrape run
#[utoipa::path(
    post,
    path = "/scrapes",
    tag = "scrapes",
    request_body = StartScrapeRequest,
    responses(
        (status = 202, description = "Run started", body = crate::types::ScrapeProgress),
        (status = 400, description = "No projects selected", body = crate::error::ApiError),
        (status = 409, description = "A run is already in progress", body = crate::error::ApiError)
    )
)]
pub async fn start_scrape(
    State(state): State<AppState>,
    Json(request): Json<StartScrapeRequest>,
) -> Result<Response, Error> {
    let progress = state.creator.start_scrape(request.projects)?;
    Ok((StatusCode::ACCEPTED, Json(progress)).into_response())
}

/// POST /scrapes/stop - Stop the active run
#[utoipa::path(
    post,
    path = "/scrapes/stop",
    tag = "scrapes",
    responses(
        (status = 200, description = "Stop requested (or nothing to stop)", body = crate::types::SessionStatus)
    )
)]
pub async fn stop_scrape(State(state): State<AppState>) -> impl IntoResponse {
    state.creator.stop_scrape();
    Json(state.creator.status())
}

/// GET /scrapes/status - Current session status
#[utoipa::path(
    get,
    path = "/scrapes/status",
    tag = "scrapes",
    responses(
        (status = 200, description = "Session status", body = crate::types::SessionStatus)
    )
)]
pub async fn scrape_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.creator.status())
}

/// GET /scrapes/corpus - Corpus of the most recent finished run
#[utoipa::path(
    get,
    path = "/scrapes/corpus",
    tag = "scrapes",
    responses(
        (status = 200, description = "Newline-delimited corpus records", content_type = "application/x-ndjson"),
        (status = 404, description = "No corpus available", body = crate::error::ApiError)
    )
)]
pub async fn get_corpus(State(state): State<AppState>) -> Result<Response, Error> {
    let corpus = state.creator.corpus()?;
    Ok(([(header::CONTENT_TYPE, "application/x-ndjson")], corpus).into_response())
}
