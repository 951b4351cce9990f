//! Cloudinary-backed object storage.
//!
//! Implements [`vton_core::storage::ObjectStorage`] over the Cloudinary
//! upload API using signed requests.

pub mod client;
pub mod config;
pub mod signing;

pub use client::{CloudinaryError, CloudinaryStorage};
pub use config::CloudinaryConfig;
