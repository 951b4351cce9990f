//! [`TryOnSynthesizer`] implementation that drives a ComfyUI server.
//!
//! One synthesis run uploads both inputs, submits the filled workflow, polls
//! the prompt history until an output image appears, and writes that image
//! into the caller's output directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;
use vton_core::error::CoreError;
use vton_core::naming::upload_filename;
use vton_core::synthesis::{ClothRegion, TryOnSynthesizer};

use crate::api::{ComfyUIApi, ComfyUIApiError, UploadedImage};
use crate::config::SynthesisConfig;
use crate::history::{first_output_image, OutputImage};
use crate::workflow::{fill_template, load_template, WorkflowParams};

/// Runs the try-on workflow on a ComfyUI instance.
pub struct ComfyUISynthesizer {
    api: ComfyUIApi,
    config: SynthesisConfig,
    template: Value,
    client_id: String,
}

impl ComfyUISynthesizer {
    /// Build a synthesizer, loading the workflow template eagerly so a bad
    /// template fails at startup rather than on the first request.
    pub fn new(config: SynthesisConfig) -> Result<Self, ComfyUIApiError> {
        let template = load_template(config.workflow_path.as_deref())?;
        Ok(Self {
            api: ComfyUIApi::new(config.api_url.clone()),
            config,
            template,
            client_id: Uuid::new_v4().to_string(),
        })
    }

    /// Generation parameters for one run.
    pub fn params_for(
        &self,
        person_image: String,
        cloth_image: String,
        region: ClothRegion,
    ) -> WorkflowParams {
        WorkflowParams {
            person_image,
            cloth_image,
            cloth_type: region,
            seed: self.config.seed,
            steps: self.config.steps,
            cfg: self.config.guidance,
            width: self.config.width,
            height: self.config.height,
        }
    }

    async fn run(
        &self,
        person_image: &Path,
        cloth_image: &Path,
        region: ClothRegion,
        output_dir: &Path,
    ) -> Result<PathBuf, ComfyUIApiError> {
        let person = self.upload_input(person_image).await?;
        let cloth = self.upload_input(cloth_image).await?;

        let params = self.params_for(person.reference(), cloth.reference(), region);
        let workflow = fill_template(&self.template, &params);

        let submitted = self.api.submit_workflow(&workflow, &self.client_id).await?;
        tracing::info!(
            prompt_id = %submitted.prompt_id,
            queue_position = submitted.number,
            cloth_type = region.as_str(),
            "Submitted try-on workflow",
        );

        let output = self.wait_for_output(&submitted.prompt_id).await?;
        let bytes = self
            .api
            .view(&output.filename, &output.subfolder, &output.folder_type)
            .await?;

        let result_path =
            output_dir.join(upload_filename(chrono::Utc::now(), Uuid::new_v4(), "png"));
        tokio::fs::write(&result_path, &bytes).await?;

        tracing::info!(
            prompt_id = %submitted.prompt_id,
            path = %result_path.display(),
            "Try-on synthesis complete",
        );
        Ok(result_path)
    }

    async fn upload_input(
        &self,
        path: &Path,
    ) -> Result<UploadedImage, ComfyUIApiError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.jpg", Uuid::new_v4()));
        self.api.upload_image(bytes, &file_name).await
    }

    /// Poll `/history` until the prompt yields an image or the timeout passes.
    async fn wait_for_output(
        &self,
        prompt_id: &str,
    ) -> Result<OutputImage, ComfyUIApiError> {
        tokio::time::timeout(self.config.poll_timeout, self.poll_history(prompt_id))
            .await
            .map_err(|_| ComfyUIApiError::Timeout {
                prompt_id: prompt_id.to_string(),
                secs: self.config.poll_timeout.as_secs(),
            })?
    }

    async fn poll_history(&self, prompt_id: &str) -> Result<OutputImage, ComfyUIApiError> {
        let mut ticker = tokio::time::interval(self.config.poll_interval);
        loop {
            ticker.tick().await;
            let history = self.api.get_history(prompt_id).await?;
            if let Some(image) = first_output_image(&history, prompt_id)? {
                return Ok(image);
            }
            tracing::debug!(prompt_id, "Workflow still running");
        }
    }
}

#[async_trait]
impl TryOnSynthesizer for ComfyUISynthesizer {
    async fn synthesize(
        &self,
        person_image: &Path,
        cloth_image: &Path,
        region: ClothRegion,
        output_dir: &Path,
    ) -> Result<PathBuf, CoreError> {
        self.run(person_image, cloth_image, region, output_dir)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "Try-on synthesis failed");
                CoreError::from(err)
            })
    }
}
