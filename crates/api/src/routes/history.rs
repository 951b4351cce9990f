use axum::routing::get;
use axum::Router;

use crate::handlers::history;
use crate::state::AppState;

/// History routes mounted at `/history`.
///
/// The path segment is a user id for `GET` and a result id for `DELETE`.
///
/// ```text
/// GET    /{id}              -> list_history
/// DELETE /{id}              -> delete_result
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(history::list_history).delete(history::delete_result),
    )
}
