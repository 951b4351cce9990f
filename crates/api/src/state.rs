use std::sync::Arc;

use vton_pipeline::TryOnPipeline;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vton_db::DbPool,
    /// Try-on orchestrator wired to the configured collaborators.
    pub pipeline: TryOnPipeline,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
