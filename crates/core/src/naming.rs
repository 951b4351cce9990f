//! Scratch and upload filename conventions.
//!
//! Filenames double as storage identifiers: when an upload preserves its
//! name, the object-storage key is the file stem, so every generated name
//! must be unique and free of path separators.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Timestamp layout used as the filename prefix (`YYYYmmddHHMMSS`).
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Name for an uploaded image staged before it is pushed to storage.
///
/// Convention: `{timestamp}_{uuid}{.ext}`
///
/// - `timestamp` = upload time, `YYYYmmddHHMMSS`
/// - `uuid` = simple (hyphen-free) v4 UUID
/// - `.ext` = lowercased extension including the dot, omitted when empty
///
/// # Examples
///
/// ```
/// use chrono::TimeZone;
/// use uuid::Uuid;
/// use vton_core::naming::upload_filename;
///
/// let at = chrono::Utc.with_ymd_and_hms(2025, 3, 16, 23, 5, 1).unwrap();
/// let id = Uuid::nil();
/// assert_eq!(
///     upload_filename(at, id, "jpg"),
///     "20250316230501_00000000000000000000000000000000.jpg"
/// );
/// ```
pub fn upload_filename(at: DateTime<Utc>, id: Uuid, extension: &str) -> String {
    let mut name = format!("{}_{}", at.format(TIMESTAMP_FORMAT), id.simple());
    push_extension(&mut name, extension);
    name
}

/// Name for a source image downloaded ahead of synthesis or critique,
/// e.g. `person_<uuid>.jpg`.
pub fn scratch_filename(role: &str, id: Uuid, extension: &str) -> String {
    let mut name = format!("{role}_{}", id.simple());
    push_extension(&mut name, extension);
    name
}

/// Extract the lowercased extension of a client-supplied filename.
///
/// Returns `None` when the name has no extension or the extension contains
/// anything other than ASCII alphanumerics.
pub fn extension_of(filename: &str) -> Option<String> {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn push_extension(name: &mut String, extension: &str) {
    let ext = extension.trim_start_matches('.');
    if !ext.is_empty() {
        name.push('.');
        name.push_str(&ext.to_ascii_lowercase());
    }
}
