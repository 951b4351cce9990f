//! Interpretation of `/history/{prompt_id}` responses.

use serde::Deserialize;
use serde_json::Value;

use crate::api::ComfyUIApiError;

/// A file produced by an output node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputImage {
    pub filename: String,
    #[serde(default)]
    pub subfolder: String,
    #[serde(rename = "type", default = "default_output_type")]
    pub folder_type: String,
}

fn default_output_type() -> String {
    "output".to_string()
}

/// Inspect a history response for `prompt_id`.
///
/// Returns `Ok(None)` while the prompt is still queued or running, the first
/// output image (by node id) once it has finished, and an error if it failed
/// or finished without images.
pub fn first_output_image(
    history: &Value,
    prompt_id: &str,
) -> Result<Option<OutputImage>, ComfyUIApiError> {
    let Some(entry) = history.get(prompt_id) else {
        return Ok(None);
    };

    let status = entry.get("status");
    if status.and_then(|s| s.get("status_str")).and_then(Value::as_str) == Some("error") {
        return Err(ComfyUIApiError::ExecutionFailed(execution_error_message(status)));
    }

    let image = entry
        .get("outputs")
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|outputs| outputs.values())
        .filter_map(|node| node.get("images").and_then(Value::as_array))
        .flatten()
        .find_map(|img| serde_json::from_value::<OutputImage>(img.clone()).ok());

    if image.is_some() {
        return Ok(image);
    }

    let completed = status
        .and_then(|s| s.get("completed"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if completed {
        Err(ComfyUIApiError::NoOutput(prompt_id.to_string()))
    } else {
        Ok(None)
    }
}

/// Pull the exception message out of an `execution_error` status entry.
fn execution_error_message(status: Option<&Value>) -> String {
    status
        .and_then(|s| s.get("messages"))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_array)
        .find(|msg| msg.first().and_then(Value::as_str) == Some("execution_error"))
        .and_then(|msg| msg.get(1))
        .and_then(|data| data.get("exception_message"))
        .and_then(Value::as_str)
        .map(|m| m.trim().to_string())
        .unwrap_or_else(|| "unknown error".to_string())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn pending_prompt_has_no_output_yet() {
        assert_eq!(first_output_image(&json!({}), "p1").unwrap(), None);
        let running = json!({ "p1": { "outputs": {}, "status": { "completed": false } } });
        assert_eq!(first_output_image(&running, "p1").unwrap(), None);
    }

    #[test]
    fn finished_prompt_yields_first_image() {
        let history = json!({
            "p1": {
                "outputs": {
                    "4": { "masks": [] },
                    "7": { "images": [
                        { "filename": "tryon_00001_.png", "subfolder": "", "type": "output" },
                        { "filename": "tryon_00002_.png", "subfolder": "", "type": "output" }
                    ] }
                },
                "status": { "status_str": "success", "completed": true }
            }
        });
        let image = first_output_image(&history, "p1").unwrap().unwrap();
        assert_eq!(image.filename, "tryon_00001_.png");
        assert_eq!(image.folder_type, "output");
    }

    #[test]
    fn completed_without_images_is_an_error() {
        let history = json!({ "p1": { "outputs": {}, "status": { "status_str": "success", "completed": true } } });
        assert_matches!(
            first_output_image(&history, "p1"),
            Err(ComfyUIApiError::NoOutput(id)) if id == "p1"
        );
    }

    #[test]
    fn execution_error_reports_exception_message() {
        let history = json!({
            "p1": {
                "outputs": {},
                "status": {
                    "status_str": "error",
                    "completed": false,
                    "messages": [
                        ["execution_start", { "prompt_id": "p1" }],
                        ["execution_error", { "node_id": "6", "exception_message": "CUDA out of memory\n" }]
                    ]
                }
            }
        });
        assert_matches!(
            first_output_image(&history, "p1"),
            Err(ComfyUIApiError::ExecutionFailed(msg)) if msg == "CUDA out of memory"
        );
    }
}
