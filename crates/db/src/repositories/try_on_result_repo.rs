//! Repository for the `try_on_results` table.

use sqlx::PgExecutor;
use vton_core::types::DbId;

use crate::models::try_on_result::{CreateTryOnResult, HistoryEntry, TryOnResult};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, person_image_id, clothing_image_id, public_id, url, created_at";

/// Provides CRUD and history queries for try-on results.
pub struct TryOnResultRepo;

impl TryOnResultRepo {
    /// Insert a new result, returning the created row.
    ///
    /// Fails with a foreign-key violation if either source image is missing.
    pub async fn create<'e, E>(
        executor: E,
        input: &CreateTryOnResult,
    ) -> Result<TryOnResult, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO try_on_results
                (user_id, person_image_id, clothing_image_id, public_id, url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TryOnResult>(&query)
            .bind(input.user_id)
            .bind(input.person_image_id)
            .bind(input.clothing_image_id)
            .bind(&input.public_id)
            .bind(&input.url)
            .fetch_one(executor)
            .await
    }

    /// Find a result by ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<TryOnResult>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM try_on_results WHERE id = $1");
        sqlx::query_as::<_, TryOnResult>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List a user's results with their source image URLs, newest first.
    pub async fn list_history_for_user<'e, E>(
        executor: E,
        user_id: DbId,
    ) -> Result<Vec<HistoryEntry>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, HistoryEntry>(
            "SELECT
                t.id         AS result_id,
                t.url        AS result_url,
                p.url        AS person_url,
                c.url        AS clothing_url,
                t.created_at AS created_at,
                p.id         AS person_id,
                c.id         AS clothing_id
             FROM try_on_results t
             JOIN person_images p ON t.person_image_id = p.id
             JOIN clothing_images c ON t.clothing_image_id = c.id
             WHERE t.user_id = $1
             ORDER BY t.created_at DESC, t.id DESC",
        )
        .bind(user_id)
        .fetch_all(executor)
        .await
    }

    /// URL of the person image a result was generated from.
    pub async fn find_person_image_url<'e, E>(
        executor: E,
        result_id: DbId,
    ) -> Result<Option<String>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            "SELECT p.url
             FROM try_on_results t
             JOIN person_images p ON t.person_image_id = p.id
             WHERE t.id = $1",
        )
        .bind(result_id)
        .fetch_optional(executor)
        .await
    }

    /// URL of the clothing image a result was generated from.
    pub async fn find_clothing_image_url<'e, E>(
        executor: E,
        result_id: DbId,
    ) -> Result<Option<String>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            "SELECT c.url
             FROM try_on_results t
             JOIN clothing_images c ON t.clothing_image_id = c.id
             WHERE t.id = $1",
        )
        .bind(result_id)
        .fetch_optional(executor)
        .await
    }

    /// Delete a result by ID. Returns `true` if a row was removed.
    ///
    /// Feedback rows for the result are removed by `ON DELETE CASCADE`.
    pub async fn delete<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM try_on_results WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
