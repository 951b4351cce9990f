//! Reads the applied schema version from sqlx's `_sqlx_migrations` ledger.

use sqlx::PgExecutor;

use crate::models::schema_version::SchemaVersion;

pub struct SchemaVersionRepo;

impl SchemaVersionRepo {
    /// The latest successfully applied migration, if any.
    pub async fn latest<'e, E>(executor: E) -> Result<Option<SchemaVersion>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, SchemaVersion>(
            "SELECT version, description, installed_on AS applied_at
             FROM _sqlx_migrations
             WHERE success
             ORDER BY version DESC
             LIMIT 1",
        )
        .fetch_optional(executor)
        .await
    }
}
