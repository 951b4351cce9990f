//! Feedback models.

use serde::Serialize;
use sqlx::FromRow;
use vton_core::types::{DbId, Timestamp};

/// A row from the `feedback` table. `feedback` holds the payload text as
/// produced by the vision model (usually JSON, possibly raw text).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Feedback {
    pub id: DbId,
    pub try_on_result_id: DbId,
    pub feedback: String,
    pub created_at: Timestamp,
}
