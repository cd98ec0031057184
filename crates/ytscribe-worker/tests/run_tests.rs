//! End-to-end runner tests over an in-memory store and scripted source.

use std::time::Duration;

use chrono::Utc;

use ytscribe_models::{FetchStatus, FetchedTranscript, TranscriptSegment, VideoId};
use ytscribe_worker::testing::{MemoryStore, ScriptedSource};
use ytscribe_worker::{Runner, WorkerConfig};

fn test_config() -> WorkerConfig {
    WorkerConfig {
        database_url: "postgres://unused".to_string(),
        batch_limit: 10,
        pacing_delay: Duration::ZERO,
        languages: vec!["en".to_string()],
        max_retries: 3,
        retry_delay: Duration::ZERO,
    }
}

fn hi_transcript() -> FetchedTranscript {
    FetchedTranscript {
        language: "en".to_string(),
        segments: vec![TranscriptSegment {
            start: 0.0,
            duration: 2.0,
            text: "hi".to_string(),
        }],
    }
}

#[tokio::test]
async fn run_persists_success_and_failure_with_one_attempt_each() {
    let store = MemoryStore::new();
    let now = Utc::now();
    // v1 discovered after v2, so v1 is selected (and scripted) first.
    store.add_catalog_video("v1", now);
    store.add_catalog_video("v2", now - chrono::Duration::hours(1));

    let source = ScriptedSource::new(vec![
        Ok(hi_transcript()),
        Err(ytscribe_captions::CaptionError::VideoUnavailable {
            video_id: "v2".to_string(),
            reason: "video unavailable".to_string(),
        }),
    ]);

    let runner = Runner::new(source, store, test_config());
    let stats = runner.run().await.expect("run should succeed");

    assert_eq!(stats.success, 1);
    assert_eq!(stats.unavailable, 1);
    assert_eq!(stats.total(), 2);
}

#[tokio::test]
async fn run_writes_expected_records() {
    let store = std::sync::Arc::new(MemoryStore::new());
    let now = Utc::now();
    store.add_catalog_video("v1", now);
    store.add_catalog_video("v2", now - chrono::Duration::hours(1));

    let source = ScriptedSource::new(vec![
        Ok(hi_transcript()),
        Err(ytscribe_captions::CaptionError::VideoUnavailable {
            video_id: "v2".to_string(),
            reason: "video unavailable".to_string(),
        }),
    ]);

    let runner = Runner::new(source, std::sync::Arc::clone(&store), test_config());
    runner.run().await.expect("run should succeed");

    let v1 = store.record(&VideoId::from("v1")).expect("v1 record");
    assert_eq!(v1.fetch_status, FetchStatus::Success);
    assert_eq!(v1.transcript_text.as_deref(), Some("hi"));
    assert!(v1.transcript_json.is_some());
    assert_eq!(v1.fetch_attempts, 1);

    let v2 = store.record(&VideoId::from("v2")).expect("v2 record");
    assert_eq!(v2.fetch_status, FetchStatus::Unavailable);
    assert!(v2.transcript_text.is_none());
    assert!(v2.transcript_json.is_none());
    assert_eq!(v2.fetch_attempts, 1);
    assert!(v2.error_message.as_deref().unwrap().contains("unavailable"));
}

#[tokio::test]
async fn failed_video_is_reselected_on_a_later_run() {
    let store = std::sync::Arc::new(MemoryStore::new());
    store.add_catalog_video("flaky", Utc::now());

    // First run: every attempt rate-limited, outcome recorded once.
    let source = ScriptedSource::always_with(|| ytscribe_captions::CaptionError::RateLimited);
    let runner = Runner::new(source, std::sync::Arc::clone(&store), test_config());
    let stats = runner.run().await.unwrap();
    assert_eq!(stats.rate_limited, 1);

    let record = store.record(&VideoId::from("flaky")).unwrap();
    assert_eq!(record.fetch_status, FetchStatus::RateLimited);
    assert_eq!(record.fetch_attempts, 1);

    // Second run: the video comes back through the retryable population
    // and succeeds; content fills in, attempts keep counting.
    let source = ScriptedSource::new(vec![Ok(hi_transcript())]);
    let runner = Runner::new(source, std::sync::Arc::clone(&store), test_config());
    let stats = runner.run().await.unwrap();
    assert_eq!(stats.success, 1);

    let record = store.record(&VideoId::from("flaky")).unwrap();
    assert_eq!(record.fetch_status, FetchStatus::Success);
    assert_eq!(record.transcript_text.as_deref(), Some("hi"));
    assert_eq!(record.fetch_attempts, 2);
}

#[tokio::test]
async fn empty_batch_is_a_clean_noop() {
    let store = MemoryStore::new();
    let source = ScriptedSource::new(vec![]);

    let runner = Runner::new(source, store, test_config());
    let stats = runner.run().await.expect("run should succeed");

    assert_eq!(stats.total(), 0);
}
