//! HTTP client for the Cloudinary image upload API.
//!
//! Uploads and deletions are signed with the account secret (see
//! [`crate::signing`]); downloads use the public delivery URL directly.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use vton_core::error::CoreError;
use vton_core::image_format::mime_for_extension;
use vton_core::storage::{DeleteOutcome, ObjectStorage, STORAGE_SERVICE};

use crate::config::CloudinaryConfig;
use crate::signing::sign;

/// Errors from the Cloudinary API layer.
#[derive(Debug, thiserror::Error)]
pub enum CloudinaryError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Cloudinary returned a non-2xx status code.
    #[error("Cloudinary API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// A destroy call answered with a result other than `ok` / `not found`.
    #[error("Unexpected destroy result: {0}")]
    UnexpectedResult(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<CloudinaryError> for CoreError {
    fn from(err: CloudinaryError) -> Self {
        CoreError::dependency(STORAGE_SERVICE, err)
    }
}

/// Subset of the upload response the service needs.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub public_id: String,
    pub secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

/// [`ObjectStorage`] implementation backed by Cloudinary.
pub struct CloudinaryStorage {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryStorage {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a storage client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: CloudinaryConfig) -> Self {
        Self { client, config }
    }

    /// Upload the file at `local_path` into the configured folder.
    ///
    /// With `preserve_filename` the public id is the file stem, so the stored
    /// object keeps the timestamped name the caller generated.
    pub async fn upload_file(
        &self,
        local_path: &Path,
        preserve_filename: bool,
    ) -> Result<UploadResponse, CloudinaryError> {
        let bytes = tokio::fs::read(local_path)
            .await
            .map_err(|source| CloudinaryError::Io {
                path: local_path.display().to_string(),
                source,
            })?;

        let file_name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let extension = local_path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut params = self.base_params();
        params.insert("folder", self.config.folder.clone());
        if preserve_filename {
            if let Some(stem) = local_path.file_stem() {
                params.insert("public_id", stem.to_string_lossy().into_owned());
            }
            params.insert("use_filename", "true".into());
            params.insert("unique_filename", "false".into());
        }
        let signature = sign(&params, &self.config.api_secret);

        let file_part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for_extension(&extension))?;
        let mut form = Form::new()
            .part("file", file_part)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature);
        for (key, value) in params {
            form = form.text(key, value);
        }

        let response = self
            .client
            .post(self.config.image_endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        let uploaded: UploadResponse = Self::parse_response(response).await?;
        tracing::info!(public_id = %uploaded.public_id, "Uploaded image to Cloudinary");
        Ok(uploaded)
    }

    /// Delete an image by public id.
    pub async fn destroy(&self, public_id: &str) -> Result<DeleteOutcome, CloudinaryError> {
        let mut params = self.base_params();
        params.insert("public_id", public_id.to_string());
        let signature = sign(&params, &self.config.api_secret);
        params.insert("api_key", self.config.api_key.clone());
        params.insert("signature", signature);

        let response = self
            .client
            .post(self.config.image_endpoint("destroy"))
            .form(&params)
            .send()
            .await?;

        let body: DestroyResponse = Self::parse_response(response).await?;
        destroy_outcome(&body.result)
    }

    /// Download the bytes behind a delivery URL.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, CloudinaryError> {
        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ---- private helpers ----

    fn base_params(&self) -> BTreeMap<&'static str, String> {
        let mut params = BTreeMap::new();
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());
        params
    }

    /// Ensure the response has a success status code, capturing the body of
    /// failed responses for diagnostics.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, CloudinaryError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CloudinaryError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CloudinaryError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Map the `result` field of a destroy response.
fn destroy_outcome(result: &str) -> Result<DeleteOutcome, CloudinaryError> {
    match result {
        "ok" => Ok(DeleteOutcome::Deleted),
        "not found" => Ok(DeleteOutcome::NotFound),
        other => Err(CloudinaryError::UnexpectedResult(other.to_string())),
    }
}

#[async_trait]
impl ObjectStorage for CloudinaryStorage {
    async fn upload(&self, local_path: &Path, preserve_filename: bool) -> Result<String, CoreError> {
        Ok(self.upload_file(local_path, preserve_filename).await?.secure_url)
    }

    async fn delete(&self, public_id: &str) -> Result<DeleteOutcome, CoreError> {
        Ok(self.destroy(public_id).await?)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, CoreError> {
        Ok(self.download(url).await?)
    }
}
