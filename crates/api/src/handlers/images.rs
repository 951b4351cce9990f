//! Handler for person/clothing image intake.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use vton_pipeline::intake::{ImageUpload, IntakeRequest, IntakeResponse};

use crate::error::{AppError, AppResult};
use crate::handlers::parse_optional_id;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/images
///
/// Accepts a multipart form with optional `person_image` and
/// `clothing_image` file fields and an optional `user_id` field. At least
/// one image is required. Empty file fields count as not supplied.
pub async fn upload_images(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<IntakeResponse>>)> {
    let mut request = IntakeRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "person_image" | "clothing_image" => {
                let filename = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if data.is_empty() {
                    continue;
                }
                let upload = ImageUpload {
                    bytes: data.to_vec(),
                    filename,
                };
                if name == "person_image" {
                    request.person_image = Some(upload);
                } else {
                    request.clothing_image = Some(upload);
                }
            }
            "user_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                request.user_id = parse_optional_id("user_id", Some(&text))?;
            }
            _ => {} // ignore unknown fields
        }
    }

    let user_id = request.user_id;
    let response = state.pipeline.intake(request).await?;

    tracing::info!(
        person_id = ?response.person_id,
        clothing_id = ?response.clothing_id,
        ?user_id,
        "Images uploaded",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}
