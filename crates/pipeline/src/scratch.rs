//! Per-request scratch files with guaranteed cleanup.
//!
//! A [`ScratchSpace`] owns every local file a workflow creates or adopts.
//! On success the workflow calls [`ScratchSpace::release_deferred`], which
//! hands the files to a blocking task so removal happens after the response
//! is produced. If the workflow bails out early the guard is simply dropped
//! and the files are removed synchronously.

use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tokio::task::JoinHandle;

/// Scratch files belonging to a single workflow invocation.
#[derive(Debug)]
pub struct ScratchSpace {
    dir: PathBuf,
    files: Vec<TempPath>,
}

impl ScratchSpace {
    /// Create an empty scratch space rooted at `dir`.
    ///
    /// The directory itself must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of files currently owned.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Write `bytes` to `dir/name` and take ownership of the file.
    ///
    /// The path is registered before writing so a partially written file is
    /// cleaned up too.
    pub async fn write(&mut self, name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let path = self.dir.join(name);
        self.files.push(TempPath::from_path(&path));
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    /// Take ownership of a file created by someone else (e.g. a synthesis
    /// result written into the scratch directory).
    pub fn adopt(&mut self, path: impl Into<PathBuf>) {
        self.files.push(TempPath::from_path(path.into()));
    }

    /// Remove all owned files on a background blocking thread.
    ///
    /// Must be called from within a tokio runtime. The returned handle may be
    /// dropped; removal still happens.
    pub fn release_deferred(self) -> JoinHandle<()> {
        let files = self.files;
        let count = files.len();
        tokio::task::spawn_blocking(move || {
            drop(files);
            tracing::debug!(count, "Removed scratch files");
        })
    }
}
