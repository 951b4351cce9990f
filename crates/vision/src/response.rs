//! Decoding of model text into feedback payloads.

use serde_json::{json, Value};

/// Remove a leading Markdown code fence (```` ```json ```` or ```` ``` ````)
/// and a trailing ```` ``` ````, then trim.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let body = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match body {
        Some(body) => body.strip_suffix("```").unwrap_or(body).trim(),
        None => text,
    }
}

/// Parse model output as a JSON payload.
///
/// Unparseable output becomes an error payload that keeps the raw text.
pub fn parse_model_output(text: &str) -> Value {
    match serde_json::from_str::<Value>(strip_code_fence(text)) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(error = %err, "Feedback response was not valid JSON");
            json!({
                "error": "Failed to parse response as JSON",
                "raw_response": text,
                "error_details": err.to_string(),
            })
        }
    }
}

/// Payload returned when the model could not be called at all.
pub fn generation_error(details: impl std::fmt::Display) -> Value {
    json!({
        "error": "Error generating fashion feedback",
        "details": details.to_string(),
    })
}
