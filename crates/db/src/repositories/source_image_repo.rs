//! Repositories for the `person_images` and `clothing_images` tables.
//!
//! Both tables share one row shape, so the SQL lives in private helpers
//! parameterized by table name (a compile-time constant, never user input).

use sqlx::PgExecutor;
use vton_core::types::DbId;

use crate::models::image::{CreateSourceImage, SourceImage};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, public_id, url, uploaded_at";

const PERSON_TABLE: &str = "person_images";
const CLOTHING_TABLE: &str = "clothing_images";

/// Person photos uploaded for try-on.
pub struct PersonImageRepo;

/// Garment photos uploaded for try-on.
pub struct ClothingImageRepo;

impl PersonImageRepo {
    /// Insert a person image, returning the created row.
    pub async fn create<'e, E>(
        executor: E,
        input: &CreateSourceImage,
    ) -> Result<SourceImage, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        insert(executor, PERSON_TABLE, input).await
    }

    /// Find a person image by ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<SourceImage>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        find(executor, PERSON_TABLE, id).await
    }
}

impl ClothingImageRepo {
    /// Insert a clothing image, returning the created row.
    pub async fn create<'e, E>(
        executor: E,
        input: &CreateSourceImage,
    ) -> Result<SourceImage, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        insert(executor, CLOTHING_TABLE, input).await
    }

    /// Find a clothing image by ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<SourceImage>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        find(executor, CLOTHING_TABLE, id).await
    }
}

async fn insert<'e, E>(
    executor: E,
    table: &'static str,
    input: &CreateSourceImage,
) -> Result<SourceImage, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let query = format!(
        "INSERT INTO {table} (user_id, public_id, url)
         VALUES ($1, $2, $3)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, SourceImage>(&query)
        .bind(input.user_id)
        .bind(&input.public_id)
        .bind(&input.url)
        .fetch_one(executor)
        .await
}

async fn find<'e, E>(
    executor: E,
    table: &'static str,
    id: DbId,
) -> Result<Option<SourceImage>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let query = format!("SELECT {COLUMNS} FROM {table} WHERE id = $1");
    sqlx::query_as::<_, SourceImage>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await
}
