//! Object storage contract and storage-identifier helpers.
//!
//! The orchestrator never talks to a storage provider directly; it holds an
//! `Arc<dyn ObjectStorage>` so the Cloudinary gateway and in-memory test
//! doubles are interchangeable.

use std::path::Path;

use async_trait::async_trait;

use crate::error::CoreError;

/// Service name reported in [`CoreError::Dependency`] for storage faults.
pub const STORAGE_SERVICE: &str = "Object storage";

/// Result of a delete request against object storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The object existed and was removed.
    Deleted,
    /// No object with that identifier exists. Not an error.
    NotFound,
}

/// Durable object storage for images.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload a local file and return its public URL.
    ///
    /// With `preserve_filename` the object key is derived from the file stem,
    /// otherwise the provider assigns a unique key.
    async fn upload(&self, local_path: &Path, preserve_filename: bool) -> Result<String, CoreError>;

    /// Delete an object by its storage identifier.
    async fn delete(&self, public_id: &str) -> Result<DeleteOutcome, CoreError>;

    /// Download the bytes behind a public URL.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, CoreError>;
}

/// Extract the storage identifier (public id) from a delivery URL.
///
/// Takes every path segment after `/upload/`, skips a leading version
/// segment (`v<digits>`), and strips the file extension from the last
/// segment, so folder-qualified ids survive:
///
/// ```
/// use vton_core::storage::public_id_from_url;
///
/// assert_eq!(
///     public_id_from_url("https://res.cloudinary.com/demo/image/upload/v1712/tryon/abc.jpg"),
///     "tryon/abc"
/// );
/// assert_eq!(public_id_from_url("https://cdn.example.com/x/photo.png"), "photo");
/// ```
///
/// URLs without an `/upload/` segment fall back to the last path segment.
pub fn public_id_from_url(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);

    let key = match without_query.split_once("/upload/") {
        Some((_, rest)) => {
            let mut segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
            if segments.len() > 1 && is_version_segment(segments[0]) {
                segments.remove(0);
            }
            segments.join("/")
        }
        None => without_query
            .rsplit('/')
            .next()
            .unwrap_or(without_query)
            .to_string(),
    };

    strip_extension(&key).to_string()
}

fn is_version_segment(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

/// Strip the extension from the final path segment only.
fn strip_extension(key: &str) -> &str {
    let last_start = key.rfind('/').map_or(0, |i| i + 1);
    match key[last_start..].rfind('.') {
        Some(dot) if dot > 0 => &key[..last_start + dot],
        _ => key,
    }
}
