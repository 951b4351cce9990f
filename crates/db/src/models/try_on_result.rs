//! Try-on result models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vton_core::types::{DbId, Timestamp};

/// A row from the `try_on_results` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TryOnResult {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub person_image_id: DbId,
    pub clothing_image_id: DbId,
    pub public_id: String,
    pub url: String,
    pub created_at: Timestamp,
}

/// DTO for recording a synthesized result.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTryOnResult {
    pub user_id: Option<DbId>,
    pub person_image_id: DbId,
    pub clothing_image_id: DbId,
    pub public_id: String,
    pub url: String,
}

/// One entry of a user's try-on history, joined with its source image URLs.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HistoryEntry {
    pub result_id: DbId,
    pub result_url: String,
    pub person_url: String,
    pub clothing_url: String,
    pub created_at: Timestamp,
    pub person_id: DbId,
    pub clothing_id: DbId,
}
