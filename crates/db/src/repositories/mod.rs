//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! any [`sqlx::PgExecutor`] as the first argument: `&PgPool` for standalone
//! calls, `&mut *tx` to join a workflow's transaction.

pub mod feedback_repo;
pub mod schema_version_repo;
pub mod source_image_repo;
pub mod try_on_result_repo;
pub mod user_repo;

pub use feedback_repo::FeedbackRepo;
pub use schema_version_repo::SchemaVersionRepo;
pub use source_image_repo::{ClothingImageRepo, PersonImageRepo};
pub use try_on_result_repo::TryOnResultRepo;
pub use user_repo::UserRepo;
