//! Feedback retrieval and generation for try-on results.

use serde::Serialize;
use uuid::Uuid;
use vton_core::error::CoreError;
use vton_core::feedback::FeedbackContent;
use vton_core::image_format::detect_extension;
use vton_core::naming::scratch_filename;
use vton_core::types::DbId;
use vton_db::repositories::{FeedbackRepo, TryOnResultRepo};

use crate::{PipelineError, TryOnPipeline};

/// Feedback for a result as presented to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackView {
    /// Structured JSON payload, or the raw text when it is not JSON.
    pub feedback: FeedbackContent,
    /// Sectioned display text.
    pub formatted_text: String,
    /// Id of the feedback row; absent when a generated payload could not be
    /// saved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_id: Option<DbId>,
    /// Whether the feedback engine ran for this request.
    pub generated: bool,
}

impl FeedbackView {
    fn new(content: FeedbackContent, feedback_id: Option<DbId>, generated: bool) -> Self {
        let formatted_text = content.to_display_text();
        Self {
            feedback: content,
            formatted_text,
            feedback_id,
            generated,
        }
    }
}

impl TryOnPipeline {
    /// Return the newest stored feedback for a result, generating one if
    /// none exists yet.
    pub async fn feedback_for(&self, result_id: DbId) -> Result<FeedbackView, PipelineError> {
        if let Some(row) = FeedbackRepo::find_latest_for_result(&self.pool, result_id).await? {
            tracing::debug!(result_id, feedback_id = row.id, "Using stored feedback");
            return Ok(FeedbackView::new(
                FeedbackContent::parse(&row.feedback),
                Some(row.id),
                false,
            ));
        }
        self.generate_feedback(result_id).await
    }

    /// Run the feedback engine on a result's image and store the payload.
    ///
    /// Failing to store the payload is logged and does not fail the call.
    pub async fn generate_feedback(&self, result_id: DbId) -> Result<FeedbackView, PipelineError> {
        let result = TryOnResultRepo::find_by_id(&self.pool, result_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "TryOnResult",
                id: result_id,
            })?;

        let mut scratch = self.scratch();
        let bytes = self.storage.fetch_bytes(&result.url).await?;
        let image_path = scratch
            .write(
                &scratch_filename("result", Uuid::new_v4(), detect_extension(&bytes).unwrap_or("jpg")),
                &bytes,
            )
            .await?;

        let payload = self.feedback.critique(&image_path).await?;
        let content = FeedbackContent::Structured(payload);

        let feedback_id = match FeedbackRepo::create(&self.pool, result_id, &content.to_stored()).await {
            Ok(row) => Some(row.id),
            Err(err) => {
                tracing::error!(result_id, error = %err, "Failed to save generated feedback");
                None
            }
        };

        scratch.release_deferred();
        Ok(FeedbackView::new(content, feedback_id, true))
    }
}
