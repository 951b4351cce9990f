//! Row types and DTOs, one module per table group.

pub mod feedback;
pub mod image;
pub mod schema_version;
pub mod try_on_result;
pub mod user;
