//! Handlers for try-on history.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use vton_core::types::DbId;

use crate::error::AppResult;
use crate::response::{DataResponse, SuccessResponse};
use crate::state::AppState;

/// GET /api/v1/history/{user_id}
///
/// List a user's try-on results, newest first. Unknown users get an empty
/// list.
pub async fn list_history(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let history = state.pipeline.history(user_id).await?;

    Ok(Json(DataResponse { data: history }))
}

/// DELETE /api/v1/history/{result_id}
///
/// Delete a result, its stored image and its feedback.
pub async fn delete_result(
    State(state): State<AppState>,
    Path(result_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.pipeline.delete_result(result_id).await?;

    Ok(Json(DataResponse {
        data: SuccessResponse { success: true },
    }))
}
