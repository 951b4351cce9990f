//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?redirect=true` switch for image lookups.
///
/// When set, the handler answers with a temporary redirect to the image
/// instead of a JSON body carrying its URL.
#[derive(Debug, Default, Deserialize)]
pub struct RedirectParams {
    #[serde(default)]
    pub redirect: bool,
}
