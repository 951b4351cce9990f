pub mod feedback;
pub mod history;
pub mod images;
pub mod results;
pub mod system;
pub mod tryon;

use vton_core::types::DbId;

use crate::error::AppError;

/// Parse an optional numeric form field. Blank values count as absent.
pub(crate) fn parse_optional_id(field: &str, raw: Option<&str>) -> Result<Option<DbId>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("'{field}' must be an integer, got '{value}'"))),
    }
}

/// Parse a required numeric form field.
pub(crate) fn parse_required_id(field: &str, raw: Option<&str>) -> Result<DbId, AppError> {
    parse_optional_id(field, raw)?
        .ok_or_else(|| AppError::BadRequest(format!("Missing required '{field}' field")))
}
