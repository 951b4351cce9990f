//! HTTP-level integration tests for running a try-on.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_form};
use sqlx::PgPool;
use vton_core::synthesis::ClothRegion;
use vton_pipeline::intake::{ImageUpload, IntakeRequest, IntakeResponse};
use vton_pipeline::testing::{
    MemoryStorage, StubFeedbackEngine, StubSynthesizer, TestHarness, JPEG_BYTES, PNG_BYTES,
};

async fn seed_pair(h: &TestHarness) -> IntakeResponse {
    h.pipeline
        .intake(IntakeRequest {
            person_image: Some(ImageUpload {
                bytes: JPEG_BYTES.to_vec(),
                filename: Some("me.jpg".into()),
            }),
            clothing_image: Some(ImageUpload {
                bytes: PNG_BYTES.to_vec(),
                filename: Some("shirt.png".into()),
            }),
            user_id: None,
        })
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_tryon_returns_201_with_result(pool: PgPool) {
    let h = TestHarness::new(pool);
    let pair = seed_pair(&h).await;
    let (person_id, clothing_id) = (pair.person_id.unwrap(), pair.clothing_id.unwrap());

    let response = post_form(
        common::build_test_app(&h),
        "/api/v1/tryon",
        &format!("person_id={person_id}&clothing_id={clothing_id}&user_id=&cloth_type=overall"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let data = &json["data"];
    assert!(data["result_id"].is_number());
    assert!(data["result_url"].is_string());
    assert_eq!(data["person_id"], person_id);
    assert_eq!(data["clothing_id"], clothing_id);
    assert_eq!(data["person_url"], pair.person_url.unwrap());
    assert!(data["user_id"].is_null());

    let calls = h.synthesizer.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].region, ClothRegion::Overall);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_cloth_type_defaults_to_upper(pool: PgPool) {
    let h = TestHarness::new(pool);
    let pair = seed_pair(&h).await;

    let response = post_form(
        common::build_test_app(&h),
        "/api/v1/tryon",
        &format!(
            "person_id={}&clothing_id={}",
            pair.person_id.unwrap(),
            pair.clothing_id.unwrap()
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(h.synthesizer.calls()[0].region, ClothRegion::Upper);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_clothing_returns_404(pool: PgPool) {
    let h = TestHarness::new(pool);
    let pair = seed_pair(&h).await;

    let response = post_form(
        common::build_test_app(&h),
        "/api/v1/tryon",
        &format!("person_id={}&clothing_id=999999", pair.person_id.unwrap()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "ClothingImage with id 999999 not found");
    assert!(h.synthesizer.calls().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_missing_or_malformed_fields_return_400(pool: PgPool) {
    let h = TestHarness::new(pool);

    let response = post_form(common::build_test_app(&h), "/api/v1/tryon", "clothing_id=1").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Missing required 'person_id' field");

    let response = post_form(
        common::build_test_app(&h),
        "/api/v1/tryon",
        "person_id=1&clothing_id=2&cloth_type=shoes",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_synthesis_failure_returns_502(pool: PgPool) {
    let h = TestHarness::with(
        pool,
        MemoryStorage::new(),
        StubSynthesizer::failing(),
        StubFeedbackEngine::new(),
    );
    let pair = seed_pair(&h).await;

    let response = post_form(
        common::build_test_app(&h),
        "/api/v1/tryon",
        &format!(
            "person_id={}&clothing_id={}",
            pair.person_id.unwrap(),
            pair.clothing_id.unwrap()
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "DEPENDENCY_FAILURE");
    assert_eq!(json["error"], "Image synthesis request failed");
}
