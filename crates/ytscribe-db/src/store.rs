//! Transcript store over Postgres.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::debug;

use ytscribe_models::{transcript::flatten_segments, FetchOutcome, TranscriptRecord, VideoId};

use crate::error::StoreResult;

/// Operations the orchestrator needs from the transcript store.
///
/// The worker is generic over this trait so its selection and persistence
/// logic can be exercised against an in-memory double.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Video ids in the catalog with no transcript row at all,
    /// most recently discovered first.
    async fn pending_video_ids(&self, limit: i64) -> StoreResult<Vec<VideoId>>;

    /// Video ids whose previous fetches failed but remain retry-eligible:
    /// no stored content, not permanently excluded, and still below the
    /// attempts ceiling. Oldest-attempted first.
    async fn retryable_video_ids(&self, limit: i64, max_attempts: i32)
        -> StoreResult<Vec<VideoId>>;

    /// Create-or-update the transcript row for an outcome.
    ///
    /// Language, status and error text are replaced unconditionally;
    /// content columns only ever go from NULL to a value; the attempts
    /// counter increments by exactly one per call.
    async fn upsert_outcome(&self, outcome: &FetchOutcome) -> StoreResult<()>;

    /// Fetch one transcript row, if it exists.
    async fn transcript_record(&self, video_id: &VideoId)
        -> StoreResult<Option<TranscriptRecord>>;
}

#[async_trait]
impl<T: TranscriptStore + ?Sized> TranscriptStore for std::sync::Arc<T> {
    async fn pending_video_ids(&self, limit: i64) -> StoreResult<Vec<VideoId>> {
        (**self).pending_video_ids(limit).await
    }

    async fn retryable_video_ids(
        &self,
        limit: i64,
        max_attempts: i32,
    ) -> StoreResult<Vec<VideoId>> {
        (**self).retryable_video_ids(limit, max_attempts).await
    }

    async fn upsert_outcome(&self, outcome: &FetchOutcome) -> StoreResult<()> {
        (**self).upsert_outcome(outcome).await
    }

    async fn transcript_record(
        &self,
        video_id: &VideoId,
    ) -> StoreResult<Option<TranscriptRecord>> {
        (**self).transcript_record(video_id).await
    }
}

/// Postgres-backed store.
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    /// Connect to the database.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run embedded migrations.
    pub async fn run_migrations(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Access the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TranscriptStore for Store {
    async fn pending_video_ids(&self, limit: i64) -> StoreResult<Vec<VideoId>> {
        let ids = sqlx::query_scalar::<_, VideoId>(
            r#"
            SELECT v.video_id
            FROM youtube_videos v
            LEFT JOIN youtube_transcripts t ON t.video_id = v.video_id
            WHERE t.video_id IS NULL
            ORDER BY v.scraped_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = ids.len(), "Fetched pending video ids");
        Ok(ids)
    }

    async fn retryable_video_ids(
        &self,
        limit: i64,
        max_attempts: i32,
    ) -> StoreResult<Vec<VideoId>> {
        let ids = sqlx::query_scalar::<_, VideoId>(
            r#"
            SELECT t.video_id
            FROM youtube_transcripts t
            WHERE t.transcript_text IS NULL
              AND t.fetch_status NOT IN ('disabled', 'unavailable')
              AND t.fetch_attempts < $1
            ORDER BY t.fetched_at ASC
            LIMIT $2
            "#,
        )
        .bind(max_attempts)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = ids.len(), "Fetched retryable video ids");
        Ok(ids)
    }

    async fn upsert_outcome(&self, outcome: &FetchOutcome) -> StoreResult<()> {
        // Empty tracks are persisted as a contentless success so a later
        // run can pick the video up again.
        let segments = outcome.segments.as_deref().filter(|s| !s.is_empty());
        let transcript_text = segments.map(flatten_segments);
        let transcript_json = segments.map(serde_json::to_value).transpose()?;

        sqlx::query(
            r#"
            INSERT INTO youtube_transcripts
                (video_id, language, transcript_text, transcript_json, fetch_status, error_message, fetch_attempts)
            VALUES ($1, $2, $3, $4, $5, $6, 1)
            ON CONFLICT (video_id) DO UPDATE SET
                language = EXCLUDED.language,
                transcript_text = COALESCE(EXCLUDED.transcript_text, youtube_transcripts.transcript_text),
                transcript_json = COALESCE(EXCLUDED.transcript_json, youtube_transcripts.transcript_json),
                fetch_status = EXCLUDED.fetch_status,
                error_message = EXCLUDED.error_message,
                fetch_attempts = youtube_transcripts.fetch_attempts + 1,
                fetched_at = NOW()
            "#,
        )
        .bind(&outcome.video_id)
        .bind(&outcome.language)
        .bind(transcript_text)
        .bind(transcript_json)
        .bind(outcome.status)
        .bind(&outcome.error_message)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn transcript_record(
        &self,
        video_id: &VideoId,
    ) -> StoreResult<Option<TranscriptRecord>> {
        let record = sqlx::query_as::<_, TranscriptRecord>(
            r#"
            SELECT video_id, language, transcript_text, transcript_json,
                   fetch_status, error_message, fetch_attempts, fetched_at
            FROM youtube_transcripts
            WHERE video_id = $1
            "#,
        )
        .bind(video_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
