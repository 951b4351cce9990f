//! ComfyUI-backed try-on synthesis.
//!
//! Provides a REST client for a ComfyUI server, workflow templating, and a
//! [`vton_core::synthesis::TryOnSynthesizer`] implementation that runs a
//! CatVTON workflow and collects the rendered image.

pub mod api;
pub mod config;
pub mod history;
pub mod synthesizer;
pub mod workflow;

pub use api::{ComfyUIApi, ComfyUIApiError};
pub use config::SynthesisConfig;
pub use synthesizer::ComfyUISynthesizer;
