//! Project catalog handler.

use crate::api::AppState;
use axum::{Json, extract::State, response::IntoResponse};

/// GET /projects - List selectable projects
#[utoipa::path(
    get,
    path = "/projects",
    tag = "projects",
    responses(
        (status = 200, description = "Selectable projects", body = Vec<crate::types::Project>)
    )
)]
pub async fn list_projects(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.creator.projects().to_vec())
}
