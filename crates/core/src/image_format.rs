//! Header-only image format detection for uploaded payloads.

use image::ImageFormat;

use crate::error::CoreError;

/// Formats accepted for person and clothing uploads.
const ACCEPTED_FORMATS: &[ImageFormat] = &[ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::WebP];

/// Check that `bytes` is a non-empty JPEG, PNG or WebP image and return the
/// canonical file extension for it.
///
/// `field` names the form field in validation messages.
pub fn sniff_image(field: &str, bytes: &[u8]) -> Result<&'static str, CoreError> {
    if bytes.is_empty() {
        return Err(CoreError::Validation(format!("{field} is empty")));
    }
    let format = image::guess_format(bytes)
        .map_err(|_| CoreError::Validation(format!("{field} is not a recognised image")))?;
    if !ACCEPTED_FORMATS.contains(&format) {
        return Err(CoreError::Validation(format!(
            "{field} has unsupported format {format:?}. Supported: jpeg, png, webp"
        )));
    }
    Ok(canonical_extension(format))
}

fn canonical_extension(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "png",
        ImageFormat::WebP => "webp",
        _ => "jpg",
    }
}

/// Canonical extension for a payload recognised from its header.
pub fn detect_extension(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(canonical_extension)
}

/// MIME type of an image payload read from its header bytes. The file
/// extension is consulted only when the header is not recognised.
pub fn mime_for_image(bytes: &[u8], extension: &str) -> &'static str {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        Ok(ImageFormat::WebP) => "image/webp",
        Ok(ImageFormat::Gif) => "image/gif",
        _ => mime_for_extension(extension),
    }
}

/// MIME type implied by a file extension, defaulting to JPEG.
pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "image/jpeg",
    }
}
