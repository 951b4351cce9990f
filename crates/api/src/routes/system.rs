use axum::routing::get;
use axum::Router;

use crate::handlers::system;
use crate::state::AppState;

/// Diagnostic routes mounted at `/system`.
///
/// ```text
/// GET    /database-info     -> database_info
/// GET    /schema-version    -> schema_version
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/database-info", get(system::database_info))
        .route("/schema-version", get(system::schema_version))
}
