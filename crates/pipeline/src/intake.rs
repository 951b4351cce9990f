//! Image intake: stage, upload and record person/clothing images.

use serde::Serialize;
use uuid::Uuid;
use vton_core::image_format::sniff_image;
use vton_core::naming::{extension_of, upload_filename};
use vton_core::storage::public_id_from_url;
use vton_core::types::DbId;
use vton_db::models::image::{CreateSourceImage, SourceImage};
use vton_db::repositories::{ClothingImageRepo, PersonImageRepo};

use crate::scratch::ScratchSpace;
use crate::{resolve_user, PipelineError, TryOnPipeline};

/// One uploaded image payload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    /// Client-supplied filename, used only for its extension.
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct IntakeRequest {
    pub person_image: Option<ImageUpload>,
    pub clothing_image: Option<ImageUpload>,
    pub user_id: Option<DbId>,
}

/// Rows created by an intake call. Images that were not supplied are
/// omitted from the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntakeResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_public_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clothing_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clothing_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clothing_public_id: Option<String>,
}

/// An upload that passed validation, with the name it will be stored under.
struct StagedImage<'a> {
    bytes: &'a [u8],
    filename: String,
}

fn validate(field: &str, upload: &ImageUpload) -> Result<String, PipelineError> {
    let sniffed = sniff_image(field, &upload.bytes)?;
    let extension = upload
        .filename
        .as_deref()
        .and_then(extension_of)
        .unwrap_or_else(|| sniffed.to_string());
    Ok(upload_filename(chrono::Utc::now(), Uuid::new_v4(), &extension))
}

impl TryOnPipeline {
    /// Upload the supplied images and record them.
    ///
    /// At least one image is required. All inserts share one transaction; any
    /// upload or database failure rolls back every row written by this call
    /// and removes the objects it already uploaded.
    pub async fn intake(&self, request: IntakeRequest) -> Result<IntakeResponse, PipelineError> {
        if request.person_image.is_none() && request.clothing_image.is_none() {
            return Err(PipelineError::validation(
                "At least one of person_image or clothing_image is required",
            ));
        }

        // Validate everything before touching storage or the database.
        let person = request
            .person_image
            .as_ref()
            .map(|img| {
                validate("person_image", img).map(|filename| StagedImage {
                    bytes: &img.bytes,
                    filename,
                })
            })
            .transpose()?;
        let clothing = request
            .clothing_image
            .as_ref()
            .map(|img| {
                validate("clothing_image", img).map(|filename| StagedImage {
                    bytes: &img.bytes,
                    filename,
                })
            })
            .transpose()?;

        let mut scratch = self.scratch();
        let mut uploaded = Vec::new();
        match self
            .record_staged(&mut scratch, person, clothing, request.user_id, &mut uploaded)
            .await
        {
            Ok(response) => {
                scratch.release_deferred();
                Ok(response)
            }
            Err(err) => {
                self.discard_uploads(&uploaded).await;
                Err(err)
            }
        }
    }

    /// Upload and insert the validated images in one transaction. Public ids
    /// of successful uploads are pushed to `uploaded` as they happen.
    async fn record_staged(
        &self,
        scratch: &mut ScratchSpace,
        person: Option<StagedImage<'_>>,
        clothing: Option<StagedImage<'_>>,
        requested_user: Option<DbId>,
        uploaded: &mut Vec<String>,
    ) -> Result<IntakeResponse, PipelineError> {
        let mut tx = self.pool.begin().await?;
        let user_id = resolve_user(&mut tx, requested_user).await?;

        let mut response = IntakeResponse::default();

        if let Some(staged) = person {
            let input = self.store_source(scratch, staged, user_id).await?;
            uploaded.push(input.public_id.clone());
            let row = PersonImageRepo::create(&mut *tx, &input).await?;
            tracing::info!(person_id = row.id, public_id = %row.public_id, "Recorded person image");
            fill(&mut response.person_id, &mut response.person_url, &mut response.person_public_id, row);
        }

        if let Some(staged) = clothing {
            let input = self.store_source(scratch, staged, user_id).await?;
            uploaded.push(input.public_id.clone());
            let row = ClothingImageRepo::create(&mut *tx, &input).await?;
            tracing::info!(clothing_id = row.id, public_id = %row.public_id, "Recorded clothing image");
            fill(
                &mut response.clothing_id,
                &mut response.clothing_url,
                &mut response.clothing_public_id,
                row,
            );
        }

        tx.commit().await?;
        Ok(response)
    }

    /// Stage one image locally and push it to storage under its derived name.
    async fn store_source(
        &self,
        scratch: &mut ScratchSpace,
        staged: StagedImage<'_>,
        user_id: Option<DbId>,
    ) -> Result<CreateSourceImage, PipelineError> {
        let path = scratch.write(&staged.filename, staged.bytes).await?;
        let url = self.storage.upload(&path, true).await?;
        Ok(CreateSourceImage {
            user_id,
            public_id: public_id_from_url(&url),
            url,
        })
    }
}

fn fill(
    id: &mut Option<DbId>,
    url: &mut Option<String>,
    public_id: &mut Option<String>,
    row: SourceImage,
) {
    *id = Some(row.id);
    *url = Some(row.url);
    *public_id = Some(row.public_id);
}
