use axum::routing::get;
use axum::Router;

use crate::handlers::results;
use crate::state::AppState;

/// Per-result image routes mounted at `/results`.
///
/// Each accepts `?redirect=true` to answer with a 307 to the image.
///
/// ```text
/// GET    /{result_id}/person-image      -> person_image
/// GET    /{result_id}/clothing-image    -> clothing_image
/// GET    /{result_id}/image             -> result_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{result_id}/person-image", get(results::person_image))
        .route("/{result_id}/clothing-image", get(results::clothing_image))
        .route("/{result_id}/image", get(results::result_image))
}
