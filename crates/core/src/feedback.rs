//! Fashion feedback payloads, the feedback engine contract, and display
//! formatting.
//!
//! A feedback payload is whatever the vision model produced: normally a JSON
//! object with `feedback`, `recommendations` and `overall_score`, sometimes an
//! error object, and for legacy rows plain text. Payloads are stored as text
//! and re-parsed on read.

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::CoreError;

/// Service name reported in [`CoreError::Dependency`] for feedback faults.
pub const FEEDBACK_SERVICE: &str = "Feedback engine";

/// Number of slots in the star-scale score rendering.
pub const SCORE_SCALE: u32 = 10;

/// Produces a critique of a try-on image.
#[async_trait]
pub trait FeedbackEngine: Send + Sync {
    /// Critique the image at `image_path`.
    ///
    /// Model-side failures are reported inside the returned payload (an
    /// object with an `error` key) rather than as `Err`.
    async fn critique(&self, image_path: &Path) -> Result<Value, CoreError>;
}

/// A feedback payload as returned to clients.
///
/// Serializes untagged: structured payloads as their JSON value, raw
/// payloads as a plain string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeedbackContent {
    Structured(Value),
    Raw(String),
}

impl FeedbackContent {
    /// Decode a stored payload, falling back to raw text when it is not JSON.
    pub fn parse(stored: &str) -> Self {
        match serde_json::from_str::<Value>(stored) {
            Ok(value) => Self::Structured(value),
            Err(_) => Self::Raw(stored.to_string()),
        }
    }

    /// Text form used for persistence. String payloads are stored unquoted.
    pub fn to_stored(&self) -> String {
        match self {
            Self::Structured(Value::String(s)) => s.clone(),
            Self::Structured(value) => value.to_string(),
            Self::Raw(text) => text.clone(),
        }
    }

    /// Render the payload as sectioned text for display.
    pub fn to_display_text(&self) -> String {
        match self {
            Self::Raw(text) => text.clone(),
            Self::Structured(value) => format_value(value),
        }
    }
}

/// Format a JSON payload for display.
///
/// A JSON string is decoded once more (payloads are sometimes double
/// encoded); if that fails the string is returned verbatim.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(inner) => format_sections(&inner),
            Err(_) => text.clone(),
        },
        other => format_sections(other),
    }
}

fn format_sections(value: &Value) -> String {
    let mut sections: Vec<String> = Vec::new();

    if let Some(narrative) = value.get("feedback").and_then(Value::as_str) {
        if !narrative.is_empty() {
            sections.push(format!("💬 DETAILED FEEDBACK:\n{narrative}"));
        }
    }

    if let Some(items) = value.get("recommendations").and_then(Value::as_array) {
        if !items.is_empty() {
            let mut lines = vec!["✨ RECOMMENDATIONS:".to_string()];
            for (i, item) in items.iter().enumerate() {
                lines.push(format!("▶️ {}. {}", i + 1, display_scalar(item)));
            }
            sections.push(lines.join("\n"));
        }
    }

    match value.get("overall_score") {
        None | Some(Value::Null) => {}
        Some(score) => {
            let rendered = match score.as_f64() {
                Some(n) => format!("{} ({score}/10)", star_scale(n)),
                None => display_scalar(score),
            };
            sections.push(format!("💯 OVERALL SCORE:\n{rendered}"));
        }
    }

    if sections.is_empty() {
        return serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    }
    sections.join("\n\n")
}

/// Render a score as filled and empty stars on a fixed 10-slot scale.
///
/// Fractional scores are truncated; out-of-range scores are clamped.
pub fn star_scale(score: f64) -> String {
    let filled = if score.is_finite() {
        score.clamp(0.0, f64::from(SCORE_SCALE)) as u32
    } else {
        0
    };
    let mut out = "★".repeat(filled as usize);
    out.push_str(&"☆".repeat((SCORE_SCALE - filled) as usize));
    out
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
