pub mod feedback;
pub mod health;
pub mod history;
pub mod images;
pub mod results;
pub mod system;
pub mod tryon;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /images                                   upload person/clothing images (POST)
/// /tryon                                    run a try-on (POST)
///
/// /history/{user_id}                        list a user's results (GET)
/// /history/{result_id}                      delete a result (DELETE)
///
/// /feedback/{result_id}                     retrieve-or-generate (GET), regenerate (POST)
///
/// /results/{result_id}/person-image         source person image URL (GET)
/// /results/{result_id}/clothing-image       source clothing image URL (GET)
/// /results/{result_id}/image                try-on image URL (GET)
///
/// /system/database-info                     masked connection string (GET)
/// /system/schema-version                    latest applied migration (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/images", images::router())
        .nest("/tryon", tryon::router())
        .nest("/history", history::router())
        .nest("/feedback", feedback::router())
        .nest("/results", results::router())
        .nest("/system", system::router())
}
