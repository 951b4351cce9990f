//! Source image models.
//!
//! Person and clothing images share one row shape but live in separate
//! tables (`person_images`, `clothing_images`) so their id spaces never mix.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vton_core::types::{DbId, Timestamp};

/// A row from `person_images` or `clothing_images`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SourceImage {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub public_id: String,
    pub url: String,
    pub uploaded_at: Timestamp,
}

/// DTO for recording an uploaded image.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSourceImage {
    pub user_id: Option<DbId>,
    pub public_id: String,
    pub url: String,
}
