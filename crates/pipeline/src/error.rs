use vton_core::error::CoreError;

/// Error type returned by every orchestrator workflow.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Scratch file error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Shorthand for a [`CoreError::Validation`] failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Core(CoreError::Validation(message.into()))
    }
}
