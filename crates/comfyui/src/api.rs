//! REST API client for the ComfyUI HTTP endpoints.
//!
//! Wraps the ComfyUI HTTP API (input upload, workflow submission, history
//! retrieval, output download) using [`reqwest`].

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use vton_core::error::CoreError;
use vton_core::synthesis::SYNTHESIS_SERVICE;

/// HTTP client for a single ComfyUI instance.
pub struct ComfyUIApi {
    client: reqwest::Client,
    api_url: String,
}

/// Response returned by the ComfyUI `/prompt` endpoint after
/// successfully queuing a workflow.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    /// Server-assigned identifier for the queued prompt.
    pub prompt_id: String,
    /// Position in the execution queue.
    pub number: i32,
}

/// Response returned by `/upload/image`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedImage {
    /// Name the server stored the file under (may differ from the request).
    pub name: String,
    #[serde(default)]
    pub subfolder: String,
    #[serde(rename = "type", default = "default_folder_type")]
    pub folder_type: String,
}

fn default_folder_type() -> String {
    "input".to_string()
}

impl UploadedImage {
    /// Reference usable as a `LoadImage` input.
    pub fn reference(&self) -> String {
        if self.subfolder.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.subfolder, self.name)
        }
    }
}

/// Errors from the ComfyUI REST API layer and the synthesis run built on it.
#[derive(Debug, thiserror::Error)]
pub enum ComfyUIApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// ComfyUI returned a non-2xx status code.
    #[error("ComfyUI API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The prompt finished with an execution error.
    #[error("Workflow execution failed: {0}")]
    ExecutionFailed(String),

    /// The prompt finished without producing an image.
    #[error("Workflow {0} produced no output image")]
    NoOutput(String),

    /// The prompt did not finish within the polling budget.
    #[error("Workflow {prompt_id} did not finish within {secs}s")]
    Timeout { prompt_id: String, secs: u64 },

    /// The workflow template could not be read or parsed.
    #[error("Invalid workflow template: {0}")]
    Template(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ComfyUIApiError> for CoreError {
    fn from(err: ComfyUIApiError) -> Self {
        CoreError::dependency(SYNTHESIS_SERVICE, err)
    }
}

impl ComfyUIApi {
    /// Create a new API client for a ComfyUI instance.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://host:8188`.
    pub fn new(api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Upload an input image so workflows can reference it by name.
    ///
    /// Sends a multipart `POST /upload/image` with `overwrite=true`.
    pub async fn upload_image(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<UploadedImage, ComfyUIApiError> {
        let form = Form::new()
            .part("image", Part::bytes(bytes).file_name(file_name.to_string()))
            .text("overwrite", "true");

        let response = self
            .client
            .post(format!("{}/upload/image", self.api_url))
            .multipart(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Submit a workflow for execution.
    ///
    /// Sends a `POST /prompt` request with the given workflow JSON and
    /// client ID.  Returns the server-assigned `prompt_id` and queue
    /// position.
    pub async fn submit_workflow(
        &self,
        workflow: &serde_json::Value,
        client_id: &str,
    ) -> Result<SubmitResponse, ComfyUIApiError> {
        let body = serde_json::json!({
            "prompt": workflow,
            "client_id": client_id,
        });

        let response = self
            .client
            .post(format!("{}/prompt", self.api_url))
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Retrieve execution history for a specific prompt.
    ///
    /// Sends a `GET /history/{prompt_id}` request.  The body is an empty
    /// object until the prompt has finished.
    pub async fn get_history(&self, prompt_id: &str) -> Result<serde_json::Value, ComfyUIApiError> {
        let response = self
            .client
            .get(format!("{}/history/{}", self.api_url, prompt_id))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Download a produced file via `GET /view`.
    pub async fn view(
        &self,
        filename: &str,
        subfolder: &str,
        folder_type: &str,
    ) -> Result<Vec<u8>, ComfyUIApiError> {
        let response = self
            .client
            .get(format!("{}/view", self.api_url))
            .query(&[
                ("filename", filename),
                ("subfolder", subfolder),
                ("type", folder_type),
            ])
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`ComfyUIApiError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ComfyUIApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ComfyUIApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ComfyUIApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uploaded_image_reference_includes_subfolder() {
        let img: UploadedImage =
            serde_json::from_str(r#"{"name":"a.png","subfolder":"tryon","type":"input"}"#).unwrap();
        assert_eq!(img.reference(), "tryon/a.png");

        let flat: UploadedImage = serde_json::from_str(r#"{"name":"b.png"}"#).unwrap();
        assert_eq!(flat.reference(), "b.png");
        assert_eq!(flat.folder_type, "input");
    }

    #[test]
    fn api_url_trailing_slash_is_trimmed() {
        let api = ComfyUIApi::new("http://localhost:8188/".into());
        assert_eq!(api.api_url, "http://localhost:8188");
    }

    #[test]
    fn errors_convert_to_synthesis_dependency_failure() {
        let err: CoreError = ComfyUIApiError::Timeout {
            prompt_id: "p1".into(),
            secs: 600,
        }
        .into();
        match err {
            CoreError::Dependency { service, message } => {
                assert_eq!(service, SYNTHESIS_SERVICE);
                assert_eq!(message, "Workflow p1 did not finish within 600s");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
