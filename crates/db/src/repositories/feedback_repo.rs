//! Repository for the append-only `feedback` table.

use sqlx::PgExecutor;
use vton_core::types::DbId;

use crate::models::feedback::Feedback;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, try_on_result_id, feedback, created_at";

/// Provides inserts and newest-first lookups for feedback rows.
pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Append a feedback row for a result, returning the created row.
    pub async fn create<'e, E>(
        executor: E,
        try_on_result_id: DbId,
        payload: &str,
    ) -> Result<Feedback, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO feedback (try_on_result_id, feedback)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(try_on_result_id)
            .bind(payload)
            .fetch_one(executor)
            .await
    }

    /// The current (most recently created) feedback for a result.
    pub async fn find_latest_for_result<'e, E>(
        executor: E,
        try_on_result_id: DbId,
    ) -> Result<Option<Feedback>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM feedback
             WHERE try_on_result_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(try_on_result_id)
            .fetch_optional(executor)
            .await
    }

    /// All feedback for a result, newest first.
    pub async fn list_for_result<'e, E>(
        executor: E,
        try_on_result_id: DbId,
    ) -> Result<Vec<Feedback>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM feedback
             WHERE try_on_result_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(try_on_result_id)
            .fetch_all(executor)
            .await
    }
}
