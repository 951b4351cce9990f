use axum::routing::post;
use axum::Router;

use crate::handlers::images;
use crate::state::AppState;

/// Image intake routes mounted at `/images`.
///
/// ```text
/// POST   /                  -> upload_images (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(images::upload_images))
}
