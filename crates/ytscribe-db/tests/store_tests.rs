//! Postgres store integration tests.
//!
//! These exercise the persistence laws against a real database.

use uuid::Uuid;

use ytscribe_db::{Store, TranscriptStore};
use ytscribe_models::{FetchOutcome, FetchStatus, FetchedTranscript, TranscriptSegment, VideoId};

async fn store() -> Store {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let store = Store::connect(&url).await.expect("Failed to connect");
    store.run_migrations().await.expect("Failed to migrate");
    store
}

fn fresh_id(prefix: &str) -> VideoId {
    VideoId::from_string(format!("{}-{}", prefix, Uuid::new_v4().simple()))
}

fn success_outcome(video_id: &VideoId) -> FetchOutcome {
    FetchOutcome::success(
        video_id.clone(),
        FetchedTranscript {
            language: "en".to_string(),
            segments: vec![TranscriptSegment {
                start: 0.0,
                duration: 2.0,
                text: "hi".to_string(),
            }],
        },
    )
}

async fn insert_catalog_row(store: &Store, video_id: &VideoId) {
    sqlx::query("INSERT INTO youtube_videos (video_id) VALUES ($1) ON CONFLICT DO NOTHING")
        .bind(video_id)
        .execute(store.pool())
        .await
        .expect("Failed to insert catalog row");
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn first_write_creates_record_with_one_attempt() {
    let store = store().await;
    let id = fresh_id("first");

    store
        .upsert_outcome(&success_outcome(&id))
        .await
        .expect("Failed to upsert");

    let record = store
        .transcript_record(&id)
        .await
        .expect("Failed to read")
        .expect("Record should exist");

    assert_eq!(record.fetch_status, FetchStatus::Success);
    assert_eq!(record.fetch_attempts, 1);
    assert_eq!(record.transcript_text.as_deref(), Some("hi"));
    assert!(record.has_content());
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn attempts_increment_by_one_per_write() {
    let store = store().await;
    let id = fresh_id("attempts");

    for expected in 1..=3 {
        store
            .upsert_outcome(&FetchOutcome::failure(
                id.clone(),
                FetchStatus::Error,
                "boom",
            ))
            .await
            .expect("Failed to upsert");

        let record = store.transcript_record(&id).await.unwrap().unwrap();
        assert_eq!(record.fetch_attempts, expected);
    }
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn failed_retry_never_erases_content() {
    let store = store().await;
    let id = fresh_id("coalesce");

    store.upsert_outcome(&success_outcome(&id)).await.unwrap();
    store
        .upsert_outcome(&FetchOutcome::failure(
            id.clone(),
            FetchStatus::RateLimited,
            "too many requests",
        ))
        .await
        .unwrap();

    let record = store.transcript_record(&id).await.unwrap().unwrap();

    // Status and error reflect the latest attempt, content survives.
    assert_eq!(record.fetch_status, FetchStatus::RateLimited);
    assert_eq!(record.error_message.as_deref(), Some("too many requests"));
    assert_eq!(record.transcript_text.as_deref(), Some("hi"));
    assert!(record.transcript_json.is_some());
    assert_eq!(record.fetch_attempts, 2);
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn repeated_success_is_idempotent() {
    let store = store().await;
    let id = fresh_id("idem");

    store.upsert_outcome(&success_outcome(&id)).await.unwrap();
    let first = store.transcript_record(&id).await.unwrap().unwrap();

    store.upsert_outcome(&success_outcome(&id)).await.unwrap();
    let second = store.transcript_record(&id).await.unwrap().unwrap();

    assert_eq!(first.transcript_text, second.transcript_text);
    assert_eq!(first.transcript_json, second.transcript_json);
    assert_eq!(second.fetch_attempts, first.fetch_attempts + 1);
    assert!(second.fetched_at >= first.fetched_at);
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn pending_excludes_videos_with_any_record() {
    let store = store().await;
    let recorded = fresh_id("recorded");
    let pending = fresh_id("pending");

    insert_catalog_row(&store, &recorded).await;
    insert_catalog_row(&store, &pending).await;
    store
        .upsert_outcome(&FetchOutcome::failure(
            recorded.clone(),
            FetchStatus::Error,
            "boom",
        ))
        .await
        .unwrap();

    let ids = store.pending_video_ids(10_000).await.unwrap();
    assert!(ids.contains(&pending));
    assert!(!ids.contains(&recorded));
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn retryable_excludes_permanent_statuses() {
    let store = store().await;
    let disabled = fresh_id("disabled");
    let unavailable = fresh_id("unavailable");
    let transient = fresh_id("transient");

    store
        .upsert_outcome(&FetchOutcome::failure(
            disabled.clone(),
            FetchStatus::Disabled,
            "captions disabled",
        ))
        .await
        .unwrap();
    store
        .upsert_outcome(&FetchOutcome::failure(
            unavailable.clone(),
            FetchStatus::Unavailable,
            "video gone",
        ))
        .await
        .unwrap();
    store
        .upsert_outcome(&FetchOutcome::failure(
            transient.clone(),
            FetchStatus::RateLimited,
            "slow down",
        ))
        .await
        .unwrap();

    let ids = store.retryable_video_ids(10_000, 3).await.unwrap();
    assert!(ids.contains(&transient));
    assert!(!ids.contains(&disabled));
    assert!(!ids.contains(&unavailable));
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn retryable_respects_attempts_ceiling() {
    let store = store().await;
    let id = fresh_id("ceiling");

    for _ in 0..3 {
        store
            .upsert_outcome(&FetchOutcome::failure(
                id.clone(),
                FetchStatus::Error,
                "boom",
            ))
            .await
            .unwrap();
    }

    let ids = store.retryable_video_ids(10_000, 3).await.unwrap();
    assert!(!ids.contains(&id));

    let ids = store.retryable_video_ids(10_000, 4).await.unwrap();
    assert!(ids.contains(&id));
}
