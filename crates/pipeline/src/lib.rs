//! Try-on orchestration.
//!
//! [`TryOnPipeline`] coordinates the persistence layer with the object
//! storage, synthesis and feedback collaborators. Each workflow lives in its
//! own module as an `impl TryOnPipeline` block:
//!
//! - [`intake`]: stage and upload source images, record them.
//! - [`processing`]: synthesize a try-on image from two recorded sources.
//! - [`history`]: list, look up and delete results.
//! - [`feedback`]: retrieve or generate fashion feedback for a result.
//!
//! Every write-path workflow runs inside one database transaction and owns
//! its local files through a [`scratch::ScratchSpace`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sqlx::PgConnection;
use vton_core::feedback::FeedbackEngine;
use vton_core::storage::ObjectStorage;
use vton_core::synthesis::TryOnSynthesizer;
use vton_core::types::{normalize_user_id, DbId};
use vton_db::repositories::UserRepo;
use vton_db::DbPool;

pub mod error;
pub mod feedback;
pub mod history;
pub mod intake;
pub mod processing;
pub mod scratch;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::PipelineError;

/// The try-on orchestrator. Cheap to clone; share one per process.
#[derive(Clone)]
pub struct TryOnPipeline {
    pool: DbPool,
    storage: Arc<dyn ObjectStorage>,
    synthesizer: Arc<dyn TryOnSynthesizer>,
    feedback: Arc<dyn FeedbackEngine>,
    scratch_dir: PathBuf,
}

impl TryOnPipeline {
    pub fn new(
        pool: DbPool,
        storage: Arc<dyn ObjectStorage>,
        synthesizer: Arc<dyn TryOnSynthesizer>,
        feedback: Arc<dyn FeedbackEngine>,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            pool,
            storage,
            synthesizer,
            feedback,
            scratch_dir: scratch_dir.into(),
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Create the scratch directory if it does not exist yet.
    pub async fn ensure_scratch_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.scratch_dir).await
    }

    fn scratch(&self) -> scratch::ScratchSpace {
        scratch::ScratchSpace::new(&self.scratch_dir)
    }

    /// Remove objects uploaded by a call whose transaction did not commit.
    /// Failures are logged; the caller's original error is what matters.
    async fn discard_uploads(&self, public_ids: &[String]) {
        for public_id in public_ids {
            match self.storage.delete(public_id).await {
                Ok(_) => tracing::info!(public_id = %public_id, "Removed orphaned upload"),
                Err(err) => {
                    tracing::warn!(public_id = %public_id, error = %err, "Failed to remove orphaned upload")
                }
            }
        }
    }
}

/// Resolve a caller-supplied user id to an existing user.
///
/// Absent, non-positive and unknown ids all resolve to `None`; an unknown id
/// is logged but never fails the request.
pub(crate) async fn resolve_user(
    conn: &mut PgConnection,
    requested: Option<DbId>,
) -> Result<Option<DbId>, sqlx::Error> {
    let Some(user_id) = normalize_user_id(requested) else {
        return Ok(None);
    };
    if UserRepo::exists(&mut *conn, user_id).await? {
        Ok(Some(user_id))
    } else {
        tracing::warn!(user_id, "User not found, continuing without owner");
        Ok(None)
    }
}
