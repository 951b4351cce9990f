//! Applied schema version, read from the sqlx migration ledger.

use serde::Serialize;
use sqlx::FromRow;
use vton_core::types::Timestamp;

/// The most recently applied migration.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SchemaVersion {
    pub version: i64,
    pub description: String,
    pub applied_at: Timestamp,
}
