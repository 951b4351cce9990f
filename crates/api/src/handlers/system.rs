//! Diagnostic handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use vton_db::repositories::SchemaVersionRepo;

use crate::config::mask_password;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

const MASKED_NOTE: &str = "Password has been masked for security reasons";

#[derive(Debug, Serialize)]
pub struct DatabaseInfo {
    pub connection_string: String,
    pub note: &'static str,
}

/// GET /api/v1/system/database-info
///
/// The configured connection string with its password masked.
pub async fn database_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(DataResponse {
        data: DatabaseInfo {
            connection_string: mask_password(&state.config.database_url),
            note: MASKED_NOTE,
        },
    })
}

/// GET /api/v1/system/schema-version
///
/// The most recently applied migration.
pub async fn schema_version(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let version = SchemaVersionRepo::latest(&state.pool)
        .await?
        .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;

    Ok(Json(DataResponse { data: version }))
}
