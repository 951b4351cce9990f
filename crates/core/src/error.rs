use crate::types::DbId;

/// Domain-level error shared by every crate in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// An external collaborator (object storage, synthesis engine, vision
    /// model) failed. `message` carries the upstream detail for logging and
    /// must not be echoed to clients verbatim.
    #[error("{service} failed: {message}")]
    Dependency {
        service: &'static str,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Build a [`CoreError::Dependency`] from any displayable upstream error.
    pub fn dependency(service: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Dependency {
            service,
            message: err.to_string(),
        }
    }
}
