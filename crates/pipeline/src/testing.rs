//! In-memory collaborator doubles for tests.
//!
//! Each double records the calls it receives so tests can assert on call
//! counts and ordering, and can be configured to fail.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use uuid::Uuid;
use vton_core::error::CoreError;
use vton_core::feedback::{FeedbackEngine, FEEDBACK_SERVICE};
use vton_core::naming::upload_filename;
use vton_core::storage::{public_id_from_url, DeleteOutcome, ObjectStorage, STORAGE_SERVICE};
use vton_core::synthesis::{ClothRegion, TryOnSynthesizer, SYNTHESIS_SERVICE};

use crate::TryOnPipeline;

/// Smallest payload that sniffs as PNG.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

/// Smallest payload that sniffs as JPEG.
pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F', 0];

/// Base URL of objects held by [`MemoryStorage`].
pub const MEMORY_STORAGE_BASE: &str = "https://res.cloudinary.com/test/image/upload/v1/tryon";

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// A call received by [`MemoryStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageCall {
    Upload { file_name: String, preserve_filename: bool },
    Delete(String),
    Fetch(String),
}

#[derive(Default)]
struct StorageState {
    objects: HashMap<String, Vec<u8>>,
    calls: Vec<StorageCall>,
    successful_uploads: usize,
    fail_uploads_after: Option<usize>,
    fail_deletes: bool,
}

/// Object storage kept in memory, keyed by public URL.
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<StorageState>,
}

impl MemoryStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Let the first `n` uploads succeed and fail every later one.
    pub fn fail_uploads_after(&self, n: usize) {
        self.lock().fail_uploads_after = Some(n);
    }

    /// Make every delete call fail with a dependency error.
    pub fn fail_deletes(&self) {
        self.lock().fail_deletes = true;
    }

    /// Place an object in storage and return its URL.
    pub fn put(&self, name: &str, bytes: &[u8]) -> String {
        let url = format!("{MEMORY_STORAGE_BASE}/{name}");
        self.lock().objects.insert(url.clone(), bytes.to_vec());
        url
    }

    /// Number of objects currently stored.
    pub fn object_count(&self) -> usize {
        self.lock().objects.len()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.lock().objects.contains_key(url)
    }

    pub fn calls(&self) -> Vec<StorageCall> {
        self.lock().calls.clone()
    }

    pub fn upload_count(&self) -> usize {
        self.count(|c| matches!(c, StorageCall::Upload { .. }))
    }

    pub fn delete_count(&self) -> usize {
        self.count(|c| matches!(c, StorageCall::Delete(_)))
    }

    fn count(&self, pred: impl Fn(&StorageCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| pred(c)).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StorageState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(&self, local_path: &Path, preserve_filename: bool) -> Result<String, CoreError> {
        let file_name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = tokio::fs::read(local_path)
            .await
            .map_err(|e| CoreError::dependency(STORAGE_SERVICE, e))?;

        let mut state = self.lock();
        state.calls.push(StorageCall::Upload {
            file_name: file_name.clone(),
            preserve_filename,
        });
        if state.fail_uploads_after.is_some_and(|n| state.successful_uploads >= n) {
            return Err(CoreError::dependency(STORAGE_SERVICE, "upload rejected"));
        }
        state.successful_uploads += 1;

        let stored_name = if preserve_filename {
            file_name
        } else {
            format!("{}.png", Uuid::new_v4().simple())
        };
        let url = format!("{MEMORY_STORAGE_BASE}/{stored_name}");
        state.objects.insert(url.clone(), bytes);
        Ok(url)
    }

    async fn delete(&self, public_id: &str) -> Result<DeleteOutcome, CoreError> {
        let mut state = self.lock();
        state.calls.push(StorageCall::Delete(public_id.to_string()));
        if state.fail_deletes {
            return Err(CoreError::dependency(STORAGE_SERVICE, "delete rejected"));
        }
        let key = state
            .objects
            .keys()
            .find(|url| public_id_from_url(url) == public_id)
            .cloned();
        Ok(match key {
            Some(url) => {
                state.objects.remove(&url);
                DeleteOutcome::Deleted
            }
            None => DeleteOutcome::NotFound,
        })
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, CoreError> {
        let mut state = self.lock();
        state.calls.push(StorageCall::Fetch(url.to_string()));
        state
            .objects
            .get(url)
            .cloned()
            .ok_or_else(|| CoreError::dependency(STORAGE_SERVICE, format!("404 for {url}")))
    }
}

// ---------------------------------------------------------------------------
// Synthesis
// ---------------------------------------------------------------------------

/// A call received by [`StubSynthesizer`], with the input bytes it saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisCall {
    pub person_bytes: Vec<u8>,
    pub cloth_bytes: Vec<u8>,
    pub region: ClothRegion,
    pub output: Option<PathBuf>,
}

/// Synthesizer that writes a fixed PNG into the output directory.
#[derive(Default)]
pub struct StubSynthesizer {
    calls: Mutex<Vec<SynthesisCall>>,
    fail: bool,
}

impl StubSynthesizer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A synthesizer whose every call fails.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::default(),
            fail: true,
        })
    }

    pub fn calls(&self) -> Vec<SynthesisCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl TryOnSynthesizer for StubSynthesizer {
    async fn synthesize(
        &self,
        person_image: &Path,
        cloth_image: &Path,
        region: ClothRegion,
        output_dir: &Path,
    ) -> Result<PathBuf, CoreError> {
        let person_bytes = tokio::fs::read(person_image)
            .await
            .map_err(|e| CoreError::dependency(SYNTHESIS_SERVICE, e))?;
        let cloth_bytes = tokio::fs::read(cloth_image)
            .await
            .map_err(|e| CoreError::dependency(SYNTHESIS_SERVICE, e))?;

        let output = if self.fail {
            None
        } else {
            let path = output_dir.join(upload_filename(chrono::Utc::now(), Uuid::new_v4(), "png"));
            tokio::fs::write(&path, PNG_BYTES)
                .await
                .map_err(|e| CoreError::dependency(SYNTHESIS_SERVICE, e))?;
            Some(path)
        };

        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(SynthesisCall {
                person_bytes,
                cloth_bytes,
                region,
                output: output.clone(),
            });

        output.ok_or_else(|| CoreError::dependency(SYNTHESIS_SERVICE, "CUDA out of memory"))
    }
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

/// Feedback engine returning a fixed payload.
pub struct StubFeedbackEngine {
    payload: Value,
    images: Mutex<Vec<String>>,
}

impl StubFeedbackEngine {
    pub fn new() -> Arc<Self> {
        Self::returning(json!({
            "feedback": "The jacket sits well on the shoulders.",
            "recommendations": ["Try a slimmer belt", "Roll the sleeves once"],
            "overall_score": 8
        }))
    }

    pub fn returning(payload: Value) -> Arc<Self> {
        Arc::new(Self {
            payload,
            images: Mutex::default(),
        })
    }

    pub fn call_count(&self) -> usize {
        self.image_names().len()
    }

    /// File names of the images critiqued so far, in call order.
    pub fn image_names(&self) -> Vec<String> {
        self.images
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl FeedbackEngine for StubFeedbackEngine {
    async fn critique(&self, image_path: &Path) -> Result<Value, CoreError> {
        self.images
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(
                image_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );
        if !tokio::fs::try_exists(image_path)
            .await
            .map_err(|e| CoreError::dependency(FEEDBACK_SERVICE, e))?
        {
            return Err(CoreError::dependency(FEEDBACK_SERVICE, "image missing"));
        }
        Ok(self.payload.clone())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// A pipeline wired to in-memory doubles plus handles to inspect them.
pub struct TestHarness {
    pub pipeline: TryOnPipeline,
    pub storage: Arc<MemoryStorage>,
    pub synthesizer: Arc<StubSynthesizer>,
    pub feedback: Arc<StubFeedbackEngine>,
    pub scratch: tempfile::TempDir,
}

impl TestHarness {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self::with(pool, MemoryStorage::new(), StubSynthesizer::new(), StubFeedbackEngine::new())
    }

    pub fn with(
        pool: sqlx::PgPool,
        storage: Arc<MemoryStorage>,
        synthesizer: Arc<StubSynthesizer>,
        feedback: Arc<StubFeedbackEngine>,
    ) -> Self {
        let scratch = tempfile::tempdir().expect("create scratch dir");
        let pipeline = TryOnPipeline::new(
            pool,
            storage.clone(),
            synthesizer.clone(),
            feedback.clone(),
            scratch.path(),
        );
        Self {
            pipeline,
            storage,
            synthesizer,
            feedback,
            scratch,
        }
    }

    /// Number of files currently in the scratch directory.
    pub fn scratch_file_count(&self) -> usize {
        std::fs::read_dir(self.scratch.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    /// Wait for deferred scratch cleanup to finish, up to two seconds.
    pub async fn wait_for_empty_scratch(&self) -> bool {
        for _ in 0..40 {
            if self.scratch_file_count() == 0 {
                return true;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        false
    }
}
