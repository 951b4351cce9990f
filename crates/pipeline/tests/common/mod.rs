#![allow(dead_code)]

use sqlx::PgPool;
use vton_core::synthesis::ClothRegion;
use vton_core::types::DbId;
use vton_db::models::user::CreateUser;
use vton_db::repositories::UserRepo;
use vton_pipeline::intake::{ImageUpload, IntakeRequest, IntakeResponse};
use vton_pipeline::processing::{TryOnOutcome, TryOnRequest};
use vton_pipeline::testing::{TestHarness, JPEG_BYTES, PNG_BYTES};

pub fn person_upload() -> ImageUpload {
    ImageUpload {
        bytes: JPEG_BYTES.to_vec(),
        filename: Some("me.jpg".into()),
    }
}

pub fn clothing_upload() -> ImageUpload {
    ImageUpload {
        bytes: PNG_BYTES.to_vec(),
        filename: Some("shirt.png".into()),
    }
}

pub async fn create_user(pool: &PgPool, name: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "x".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

/// Upload a person and a clothing image through the intake workflow.
pub async fn seed_pair(h: &TestHarness, user_id: Option<DbId>) -> IntakeResponse {
    h.pipeline
        .intake(IntakeRequest {
            person_image: Some(person_upload()),
            clothing_image: Some(clothing_upload()),
            user_id,
        })
        .await
        .unwrap()
}

/// Seed a pair and run one try-on on it.
pub async fn seed_result(h: &TestHarness, user_id: Option<DbId>) -> TryOnOutcome {
    let pair = seed_pair(h, user_id).await;
    h.pipeline
        .process(TryOnRequest {
            person_id: pair.person_id.unwrap(),
            clothing_id: pair.clothing_id.unwrap(),
            user_id,
            cloth_type: ClothRegion::Upper,
        })
        .await
        .unwrap()
}

pub async fn count(pool: &PgPool, table: &str) -> i64 {
    let row: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}
