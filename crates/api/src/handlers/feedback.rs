//! Handlers for fashion feedback on try-on results.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use vton_core::types::DbId;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/feedback/{result_id}
///
/// Return the newest stored feedback, generating it on first request.
pub async fn get_feedback(
    State(state): State<AppState>,
    Path(result_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let view = state.pipeline.feedback_for(result_id).await?;

    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/feedback/{result_id}
///
/// Generate fresh feedback even if some is already stored.
pub async fn regenerate_feedback(
    State(state): State<AppState>,
    Path(result_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let view = state.pipeline.generate_feedback(result_id).await?;

    tracing::info!(result_id, feedback_id = ?view.feedback_id, "Feedback regenerated");

    Ok(Json(DataResponse { data: view }))
}
