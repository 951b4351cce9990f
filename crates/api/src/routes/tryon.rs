use axum::routing::post;
use axum::Router;

use crate::handlers::tryon;
use crate::state::AppState;

/// Try-on routes mounted at `/tryon`.
///
/// ```text
/// POST   /                  -> run_tryon (urlencoded form)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(tryon::run_tryon))
}
