//! Gemini-backed fashion feedback.
//!
//! [`GeminiFeedbackEngine`] sends a try-on image to the Gemini
//! `generateContent` endpoint and returns the model's structured critique.
//! Model and transport failures are folded into an error payload instead of
//! being raised, so callers always receive something displayable.

pub mod config;
pub mod engine;
pub mod response;

pub use config::GeminiConfig;
pub use engine::{GeminiError, GeminiFeedbackEngine};
