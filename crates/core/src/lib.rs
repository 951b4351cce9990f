//! Domain types and collaborator contracts for the virtual try-on service.

pub mod error;
pub mod feedback;
pub mod image_format;
pub mod naming;
pub mod storage;
pub mod synthesis;
pub mod types;
