//! History listing, per-result image lookups, and result deletion.

use vton_core::error::CoreError;
use vton_core::storage::DeleteOutcome;
use vton_core::types::DbId;
use vton_db::models::try_on_result::HistoryEntry;
use vton_db::repositories::TryOnResultRepo;

use crate::{PipelineError, TryOnPipeline};

/// Which image of a result a lookup refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultImage {
    /// The source person image.
    Person,
    /// The source clothing image.
    Clothing,
    /// The synthesized try-on image.
    TryOn,
}

impl TryOnPipeline {
    /// All results owned by `user_id`, newest first. Unknown users get an
    /// empty list.
    pub async fn history(&self, user_id: DbId) -> Result<Vec<HistoryEntry>, PipelineError> {
        Ok(TryOnResultRepo::list_history_for_user(&self.pool, user_id).await?)
    }

    /// URL of one of the images belonging to a result.
    pub async fn result_image_url(
        &self,
        result_id: DbId,
        image: ResultImage,
    ) -> Result<String, PipelineError> {
        let url = match image {
            ResultImage::Person => {
                TryOnResultRepo::find_person_image_url(&self.pool, result_id).await?
            }
            ResultImage::Clothing => {
                TryOnResultRepo::find_clothing_image_url(&self.pool, result_id).await?
            }
            ResultImage::TryOn => TryOnResultRepo::find_by_id(&self.pool, result_id)
                .await?
                .map(|r| r.url),
        };
        url.ok_or_else(|| {
            CoreError::NotFound {
                entity: "TryOnResult",
                id: result_id,
            }
            .into()
        })
    }

    /// Delete a result: its stored image first, then its row (feedback rows
    /// cascade).
    ///
    /// Storage deletion is best-effort: a missing object or a storage fault
    /// is logged and the row is deleted regardless.
    pub async fn delete_result(&self, result_id: DbId) -> Result<(), PipelineError> {
        let result = TryOnResultRepo::find_by_id(&self.pool, result_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "TryOnResult",
                id: result_id,
            })?;

        match self.storage.delete(&result.public_id).await {
            Ok(DeleteOutcome::Deleted) => {
                tracing::info!(result_id, public_id = %result.public_id, "Deleted result image");
            }
            Ok(DeleteOutcome::NotFound) => {
                tracing::warn!(result_id, public_id = %result.public_id, "Result image already absent from storage");
            }
            Err(err) => {
                tracing::warn!(result_id, public_id = %result.public_id, error = %err, "Failed to delete result image");
            }
        }

        if !TryOnResultRepo::delete(&self.pool, result_id).await? {
            // Removed concurrently between lookup and delete.
            return Err(CoreError::NotFound {
                entity: "TryOnResult",
                id: result_id,
            }
            .into());
        }
        tracing::info!(result_id, "Deleted try-on result");
        Ok(())
    }
}
