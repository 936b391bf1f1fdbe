//! Corpus analysis handler.

use crate::api::AppState;
use crate::error::Error;
use crate::types::AnalysisResult;
use axum::{Json, extract::State};

/// POST /analysis - Analyze the latest corpus
#[utoipa::path(
    post,
    path = "/analysis",
    tag = "analysis",
    responses(
        (status = 200, description = "Analysis text", body = AnalysisResult),
        (status = 404, description = "No corpus available", body = crate::error::ApiError),
        (status = 502, description = "Analysis service failed", body = crate::error::ApiError),
        (status = 503, description = "Analysis service not configured", body = crate::error::ApiError)
    )
)]
pub async fn analyze_corpus(State(state): State<AppState>) -> Result<Json<AnalysisResult>, Error> {
    let result = state.creator.analyze().await?;
    Ok(Json(result))
}
