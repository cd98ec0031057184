//! Test doubles for the caption source and the transcript store.
//!
//! `ScriptedSource` replays a canned response sequence; `MemoryStore`
//! implements the store contract (coalescing upsert, attempt counting,
//! selection rules) over a HashMap so selector and runner behavior can be
//! exercised without Postgres.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use ytscribe_captions::{CaptionError, CaptionResult, CaptionSource};
use ytscribe_db::{StoreResult, TranscriptStore};
use ytscribe_models::{
    transcript::flatten_segments, CatalogVideo, FetchOutcome, FetchedTranscript, TranscriptRecord,
    VideoId,
};

/// Caption source replaying a scripted sequence of responses.
pub struct ScriptedSource {
    script: Mutex<VecDeque<CaptionResult<FetchedTranscript>>>,
    fallback: Option<Box<dyn Fn() -> CaptionError + Send + Sync>>,
    calls: AtomicU32,
}

impl ScriptedSource {
    /// Replay the given responses in order; error once they run out.
    pub fn new(responses: Vec<CaptionResult<FetchedTranscript>>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            fallback: None,
            calls: AtomicU32::new(0),
        }
    }

    /// Produce a fresh error from `make` on every call.
    pub fn always_with(make: impl Fn() -> CaptionError + Send + Sync + 'static) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(Box::new(make)),
            calls: AtomicU32::new(0),
        }
    }

    /// How many times `fetch` was called.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptionSource for ScriptedSource {
    async fn fetch(
        &self,
        _video_id: &VideoId,
        _languages: &[String],
    ) -> CaptionResult<FetchedTranscript> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }
        if let Some(make) = &self.fallback {
            return Err(make());
        }
        Err(CaptionError::invalid_response("scripted source exhausted"))
    }
}

/// In-memory transcript store honoring the same contract as Postgres.
#[derive(Default)]
pub struct MemoryStore {
    catalog: Mutex<Vec<CatalogVideo>>,
    records: Mutex<HashMap<String, TranscriptRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a catalog row the selector can discover.
    pub fn add_catalog_video(&self, video_id: impl Into<VideoId>, scraped_at: DateTime<Utc>) {
        self.catalog.lock().unwrap().push(CatalogVideo {
            video_id: video_id.into(),
            scraped_at,
        });
    }

    /// Read one record back, if present.
    pub fn record(&self, video_id: &VideoId) -> Option<TranscriptRecord> {
        self.records.lock().unwrap().get(video_id.as_str()).cloned()
    }
}

#[async_trait]
impl TranscriptStore for MemoryStore {
    async fn pending_video_ids(&self, limit: i64) -> StoreResult<Vec<VideoId>> {
        let records = self.records.lock().unwrap();
        let mut catalog: Vec<CatalogVideo> = self
            .catalog
            .lock()
            .unwrap()
            .iter()
            .filter(|v| !records.contains_key(v.video_id.as_str()))
            .cloned()
            .collect();
        catalog.sort_by(|a, b| b.scraped_at.cmp(&a.scraped_at));
        Ok(catalog
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|v| v.video_id)
            .collect())
    }

    async fn retryable_video_ids(
        &self,
        limit: i64,
        max_attempts: i32,
    ) -> StoreResult<Vec<VideoId>> {
        let records = self.records.lock().unwrap();
        let mut eligible: Vec<&TranscriptRecord> = records
            .values()
            .filter(|r| {
                r.transcript_text.is_none()
                    && !r.fetch_status.is_permanent()
                    && r.fetch_attempts < max_attempts
            })
            .collect();
        eligible.sort_by(|a, b| a.fetched_at.cmp(&b.fetched_at));
        Ok(eligible
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|r| r.video_id.clone())
            .collect())
    }

    async fn upsert_outcome(&self, outcome: &FetchOutcome) -> StoreResult<()> {
        let segments = outcome.segments.as_deref().filter(|s| !s.is_empty());
        let transcript_text = segments.map(flatten_segments);
        let transcript_json = segments.map(serde_json::to_value).transpose()?;
        let now = Utc::now();

        let mut records = self.records.lock().unwrap();
        match records.get_mut(outcome.video_id.as_str()) {
            Some(existing) => {
                existing.language = outcome.language.clone();
                existing.fetch_status = outcome.status;
                existing.error_message = outcome.error_message.clone();
                if transcript_text.is_some() {
                    existing.transcript_text = transcript_text;
                }
                if transcript_json.is_some() {
                    existing.transcript_json = transcript_json;
                }
                existing.fetch_attempts += 1;
                existing.fetched_at = now;
            }
            None => {
                records.insert(
                    outcome.video_id.as_str().to_string(),
                    TranscriptRecord {
                        video_id: outcome.video_id.clone(),
                        language: outcome.language.clone(),
                        transcript_text,
                        transcript_json,
                        fetch_status: outcome.status,
                        error_message: outcome.error_message.clone(),
                        fetch_attempts: 1,
                        fetched_at: now,
                    },
                );
            }
        }
        Ok(())
    }

    async fn transcript_record(
        &self,
        video_id: &VideoId,
    ) -> StoreResult<Option<TranscriptRecord>> {
        Ok(self.record(video_id))
    }
}
