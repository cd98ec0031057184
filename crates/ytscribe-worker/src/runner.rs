//! Run orchestration.

use tracing::{info, warn};

use ytscribe_captions::CaptionSource;
use ytscribe_db::TranscriptStore;
use ytscribe_models::FetchStatus;

use crate::config::WorkerConfig;
use crate::engine::{EngineConfig, FetchEngine};
use crate::error::WorkerResult;
use crate::selector::select_batch;
use crate::stats::RunStats;

/// Drives one run: select a batch, then fetch and persist each video in
/// order. Each item's write commits before the next item starts, so a
/// crash mid-run loses at most the in-flight video.
pub struct Runner<S, T> {
    engine: FetchEngine<S>,
    store: T,
    config: WorkerConfig,
}

impl<S, T> Runner<S, T>
where
    S: CaptionSource,
    T: TranscriptStore,
{
    /// Create a new runner.
    pub fn new(source: S, store: T, config: WorkerConfig) -> Self {
        let engine = FetchEngine::new(source, EngineConfig::from(&config));
        Self {
            engine,
            store,
            config,
        }
    }

    /// Execute one run and return the outcome counters.
    ///
    /// Caption failures are recorded per video and never abort the run;
    /// store failures propagate and do.
    pub async fn run(&self) -> WorkerResult<RunStats> {
        let batch = select_batch(
            &self.store,
            self.config.batch_limit,
            self.config.max_retries as i32,
        )
        .await?;

        let mut stats = RunStats::new();

        if batch.is_empty() {
            info!("No pending videos to process");
            return Ok(stats);
        }

        info!(batch = batch.len(), "Starting transcript fetch");

        for (index, video_id) in batch.iter().enumerate() {
            info!("Processing {}/{}: {}", index + 1, batch.len(), video_id);

            let outcome = self.engine.fetch(video_id).await;
            self.store.upsert_outcome(&outcome).await?;
            stats.record(outcome.status);

            if outcome.status == FetchStatus::Success {
                info!(
                    video_id = %video_id,
                    language = outcome.language.as_deref().unwrap_or(""),
                    chars = outcome.text_chars(),
                    "Transcript stored"
                );
            } else {
                warn!(
                    video_id = %video_id,
                    status = %outcome.status,
                    "Fetch failed: {}",
                    outcome.error_message.as_deref().unwrap_or("unknown")
                );
            }
        }

        info!(total = stats.total(), "Run summary: {}", stats);
        Ok(stats)
    }
}
