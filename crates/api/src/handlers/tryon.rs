//! Handler for running a virtual try-on.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Form, Json};
use serde::Deserialize;
use vton_core::synthesis::ClothRegion;
use vton_pipeline::processing::{TryOnOutcome, TryOnRequest};

use crate::error::AppResult;
use crate::handlers::{parse_optional_id, parse_required_id};
use crate::response::DataResponse;
use crate::state::AppState;

/// Raw try-on form. Numeric fields arrive as text so blank values can be
/// told apart from malformed ones.
#[derive(Debug, Deserialize)]
pub struct TryOnForm {
    pub person_id: Option<String>,
    pub clothing_id: Option<String>,
    pub user_id: Option<String>,
    pub cloth_type: Option<String>,
}

impl TryOnForm {
    fn into_request(self) -> AppResult<TryOnRequest> {
        let cloth_type = match self.cloth_type.as_deref().map(str::trim) {
            None | Some("") => ClothRegion::default(),
            Some(raw) => raw.parse::<ClothRegion>()?,
        };
        Ok(TryOnRequest {
            person_id: parse_required_id("person_id", self.person_id.as_deref())?,
            clothing_id: parse_required_id("clothing_id", self.clothing_id.as_deref())?,
            user_id: parse_optional_id("user_id", self.user_id.as_deref())?,
            cloth_type,
        })
    }
}

/// POST /api/v1/tryon
///
/// Synthesizes the person wearing the garment and records the result.
/// `cloth_type` is one of `upper` (default), `lower` or `overall`.
pub async fn run_tryon(
    State(state): State<AppState>,
    Form(form): Form<TryOnForm>,
) -> AppResult<(StatusCode, Json<DataResponse<TryOnOutcome>>)> {
    let request = form.into_request()?;
    let cloth_type = request.cloth_type;
    let outcome = state.pipeline.process(request).await?;

    tracing::info!(
        result_id = outcome.result_id,
        person_id = outcome.person_id,
        clothing_id = outcome.clothing_id,
        user_id = ?outcome.user_id,
        cloth_type = cloth_type.as_str(),
        "Try-on completed",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}
