use axum::routing::get;
use axum::Router;

use crate::handlers::feedback;
use crate::state::AppState;

/// Feedback routes mounted at `/feedback`.
///
/// ```text
/// GET    /{result_id}       -> get_feedback (stored, or generated on first use)
/// POST   /{result_id}       -> regenerate_feedback
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{result_id}",
        get(feedback::get_feedback).post(feedback::regenerate_feedback),
    )
}
