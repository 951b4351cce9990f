//! Try-on processing: synthesize and record a result from two source images.

use serde::Serialize;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;
use vton_core::error::CoreError;
use vton_core::naming::scratch_filename;
use vton_core::storage::public_id_from_url;
use vton_core::synthesis::ClothRegion;
use vton_core::types::DbId;
use vton_db::models::try_on_result::{CreateTryOnResult, TryOnResult};
use vton_db::repositories::{ClothingImageRepo, PersonImageRepo, TryOnResultRepo};

use crate::{resolve_user, PipelineError, TryOnPipeline};

#[derive(Debug, Clone)]
pub struct TryOnRequest {
    pub person_id: DbId,
    pub clothing_id: DbId,
    pub user_id: Option<DbId>,
    pub cloth_type: ClothRegion,
}

/// A recorded try-on result together with its source image URLs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TryOnOutcome {
    pub result_id: DbId,
    pub result_url: String,
    pub person_url: String,
    pub clothing_url: String,
    pub person_id: DbId,
    pub clothing_id: DbId,
    pub user_id: Option<DbId>,
}

impl TryOnPipeline {
    /// Run the synthesis engine on a recorded person/clothing pair and store
    /// the result.
    ///
    /// Every call creates a new result row. Both source rows must exist; the
    /// owner falls back to the person image's owner when no valid user id is
    /// supplied.
    pub async fn process(&self, request: TryOnRequest) -> Result<TryOnOutcome, PipelineError> {
        let mut scratch = self.scratch();
        let mut tx = self.pool.begin().await?;

        let explicit_user = resolve_user(&mut tx, request.user_id).await?;

        let person = PersonImageRepo::find_by_id(&mut *tx, request.person_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "PersonImage",
                id: request.person_id,
            })?;
        let clothing = ClothingImageRepo::find_by_id(&mut *tx, request.clothing_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ClothingImage",
                id: request.clothing_id,
            })?;

        let user_id = explicit_user.or(person.user_id);

        let person_bytes = self.storage.fetch_bytes(&person.url).await?;
        let person_path = scratch
            .write(&scratch_filename("person", Uuid::new_v4(), "jpg"), &person_bytes)
            .await?;
        let clothing_bytes = self.storage.fetch_bytes(&clothing.url).await?;
        let clothing_path = scratch
            .write(&scratch_filename("clothing", Uuid::new_v4(), "jpg"), &clothing_bytes)
            .await?;

        tracing::info!(
            person_id = person.id,
            clothing_id = clothing.id,
            cloth_type = request.cloth_type.as_str(),
            "Starting try-on synthesis",
        );
        let result_path = self
            .synthesizer
            .synthesize(&person_path, &clothing_path, request.cloth_type, scratch.dir())
            .await?;
        scratch.adopt(result_path.clone());

        let result_url = self.storage.upload(&result_path, true).await?;
        let input = CreateTryOnResult {
            user_id,
            person_image_id: person.id,
            clothing_image_id: clothing.id,
            public_id: public_id_from_url(&result_url),
            url: result_url,
        };

        let result = match record_result(tx, &input).await {
            Ok(row) => row,
            Err(err) => {
                self.discard_uploads(std::slice::from_ref(&input.public_id)).await;
                return Err(err);
            }
        };
        scratch.release_deferred();

        tracing::info!(result_id = result.id, "Recorded try-on result");
        Ok(TryOnOutcome {
            result_id: result.id,
            result_url: result.url,
            person_url: person.url,
            clothing_url: clothing.url,
            person_id: person.id,
            clothing_id: clothing.id,
            user_id,
        })
    }
}

/// Insert the result row and commit.
async fn record_result(
    mut tx: Transaction<'static, Postgres>,
    input: &CreateTryOnResult,
) -> Result<TryOnResult, PipelineError> {
    let row = TryOnResultRepo::create(&mut *tx, input).await?;
    tx.commit().await?;
    Ok(row)
}
