//! Handlers resolving the images that belong to a try-on result.

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use vton_core::types::DbId;
use vton_pipeline::history::ResultImage;

use crate::error::AppResult;
use crate::query::RedirectParams;
use crate::response::{DataResponse, UrlResponse};
use crate::state::AppState;

/// GET /api/v1/results/{result_id}/person-image
pub async fn person_image(
    State(state): State<AppState>,
    Path(result_id): Path<DbId>,
    Query(params): Query<RedirectParams>,
) -> AppResult<Response> {
    respond(&state, result_id, ResultImage::Person, &params).await
}

/// GET /api/v1/results/{result_id}/clothing-image
pub async fn clothing_image(
    State(state): State<AppState>,
    Path(result_id): Path<DbId>,
    Query(params): Query<RedirectParams>,
) -> AppResult<Response> {
    respond(&state, result_id, ResultImage::Clothing, &params).await
}

/// GET /api/v1/results/{result_id}/image
pub async fn result_image(
    State(state): State<AppState>,
    Path(result_id): Path<DbId>,
    Query(params): Query<RedirectParams>,
) -> AppResult<Response> {
    respond(&state, result_id, ResultImage::TryOn, &params).await
}

async fn respond(
    state: &AppState,
    result_id: DbId,
    image: ResultImage,
    params: &RedirectParams,
) -> AppResult<Response> {
    let url = state.pipeline.result_image_url(result_id, image).await?;

    if params.redirect {
        return Ok(Redirect::temporary(&url).into_response());
    }
    Ok(Json(DataResponse {
        data: UrlResponse { url },
    })
    .into_response())
}
