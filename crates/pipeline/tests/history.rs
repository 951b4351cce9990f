//! Integration tests for history listing, image lookups and deletion.

mod common;

use assert_matches::assert_matches;
use common::{count, create_user, seed_pair, seed_result};
use sqlx::PgPool;
use vton_core::error::CoreError;
use vton_db::models::try_on_result::CreateTryOnResult;
use vton_db::repositories::{FeedbackRepo, TryOnResultRepo};
use vton_pipeline::history::ResultImage;
use vton_pipeline::testing::{
    MemoryStorage, StorageCall, StubFeedbackEngine, StubSynthesizer, TestHarness,
};
use vton_pipeline::PipelineError;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_history_lists_newest_first(pool: PgPool) {
    let h = TestHarness::new(pool.clone());
    let user = create_user(&pool, "alice").await;

    let older = seed_result(&h, Some(user)).await;
    let newer = seed_result(&h, Some(user)).await;
    seed_result(&h, None).await;

    let history = h.pipeline.history(user).await.unwrap();
    let ids: Vec<_> = history.iter().map(|e| e.result_id).collect();
    assert_eq!(ids, [newer.result_id, older.result_id]);
    assert_eq!(history[0].person_url, newer.person_url);
    assert_eq!(history[0].clothing_url, newer.clothing_url);

    assert!(h.pipeline.history(999_999).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_result_image_lookups(pool: PgPool) {
    let h = TestHarness::new(pool);
    let outcome = seed_result(&h, None).await;
    let id = outcome.result_id;

    let person = h.pipeline.result_image_url(id, ResultImage::Person).await.unwrap();
    let clothing = h.pipeline.result_image_url(id, ResultImage::Clothing).await.unwrap();
    let result = h.pipeline.result_image_url(id, ResultImage::TryOn).await.unwrap();
    assert_eq!(person, outcome.person_url);
    assert_eq!(clothing, outcome.clothing_url);
    assert_eq!(result, outcome.result_url);

    for image in [ResultImage::Person, ResultImage::Clothing, ResultImage::TryOn] {
        let err = h.pipeline.result_image_url(id + 100, image).await.unwrap_err();
        assert_matches!(err, PipelineError::Core(CoreError::NotFound { .. }));
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_deleting_unknown_result_makes_no_storage_call(pool: PgPool) {
    let h = TestHarness::new(pool);
    let err = h.pipeline.delete_result(12_345).await.unwrap_err();
    assert_matches!(
        err,
        PipelineError::Core(CoreError::NotFound { entity: "TryOnResult", id: 12_345 })
    );
    assert_eq!(h.storage.delete_count(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_removes_object_then_row_and_feedback(pool: PgPool) {
    let h = TestHarness::new(pool.clone());
    let outcome = seed_result(&h, None).await;
    FeedbackRepo::create(&pool, outcome.result_id, r#"{"feedback":"ok"}"#)
        .await
        .unwrap();
    let row = TryOnResultRepo::find_by_id(&pool, outcome.result_id)
        .await
        .unwrap()
        .unwrap();

    h.pipeline.delete_result(outcome.result_id).await.unwrap();

    assert_eq!(h.storage.delete_count(), 1);
    assert_matches!(
        h.storage.calls().last(),
        Some(StorageCall::Delete(public_id)) if *public_id == row.public_id
    );
    assert!(!h.storage.contains(&outcome.result_url));
    assert_eq!(count(&pool, "try_on_results").await, 0);
    assert_eq!(count(&pool, "feedback").await, 0);
    // Source images survive.
    assert_eq!(count(&pool, "person_images").await, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_proceeds_when_object_is_already_gone(pool: PgPool) {
    let h = TestHarness::new(pool.clone());
    let pair = seed_pair(&h, None).await;
    let orphan = TryOnResultRepo::create(
        &pool,
        &CreateTryOnResult {
            user_id: None,
            person_image_id: pair.person_id.unwrap(),
            clothing_image_id: pair.clothing_id.unwrap(),
            public_id: "tryon/never-uploaded".into(),
            url: "https://res.cloudinary.com/test/image/upload/v1/tryon/never-uploaded.png".into(),
        },
    )
    .await
    .unwrap();

    h.pipeline.delete_result(orphan.id).await.unwrap();

    assert_eq!(h.storage.delete_count(), 1);
    assert_eq!(count(&pool, "try_on_results").await, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_proceeds_when_storage_fails(pool: PgPool) {
    let storage = MemoryStorage::new();
    let h = TestHarness::with(
        pool.clone(),
        storage.clone(),
        StubSynthesizer::new(),
        StubFeedbackEngine::new(),
    );
    let outcome = seed_result(&h, None).await;
    storage.fail_deletes();

    h.pipeline.delete_result(outcome.result_id).await.unwrap();

    assert_eq!(storage.delete_count(), 1);
    assert_eq!(count(&pool, "try_on_results").await, 0);
}
