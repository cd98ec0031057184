//! Fetch engine: the per-video retry/backoff state machine.

use std::time::Duration;

use tracing::warn;

use ytscribe_captions::CaptionSource;
use ytscribe_models::{FetchOutcome, FetchStatus, VideoId};

use crate::config::WorkerConfig;

/// Engine knobs, split out of [`WorkerConfig`] so tests can build them
/// directly.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Ordered language preference passed to the caption source
    pub languages: Vec<String>,
    /// Attempt budget per call
    pub max_retries: u32,
    /// Base delay for exponential backoff
    pub retry_delay: Duration,
    /// Sleep after each successful fetch
    pub pacing_delay: Duration,
}

impl From<&WorkerConfig> for EngineConfig {
    fn from(config: &WorkerConfig) -> Self {
        Self {
            languages: config.languages.clone(),
            max_retries: config.max_retries,
            retry_delay: config.retry_delay,
            pacing_delay: config.pacing_delay,
        }
    }
}

/// Drives a caption source through bounded attempts for one video at a
/// time, classifying every failure into a [`FetchStatus`].
pub struct FetchEngine<S> {
    source: S,
    config: EngineConfig,
}

impl<S: CaptionSource> FetchEngine<S> {
    /// Create a new fetch engine.
    pub fn new(source: S, config: EngineConfig) -> Self {
        Self { source, config }
    }

    /// Fetch captions for one video.
    ///
    /// Structural failures (captions disabled, no matching track, video
    /// unavailable) return immediately: the answer will not change on
    /// retry. Transient failures back off `retry_delay * 2^attempt` and
    /// retry until the attempt budget runs out. Successes are followed by
    /// the fixed pacing sleep. This never returns an error: anything the
    /// source throws is folded into the outcome.
    pub async fn fetch(&self, video_id: &VideoId) -> FetchOutcome {
        let mut last_error: Option<String> = None;

        for attempt in 0..self.config.max_retries {
            match self.source.fetch(video_id, &self.config.languages).await {
                Ok(transcript) => {
                    tokio::time::sleep(self.config.pacing_delay).await;
                    return FetchOutcome::success(video_id.clone(), transcript);
                }
                Err(err) => {
                    if let Some(status) = err.permanent_status() {
                        return FetchOutcome::failure(video_id.clone(), status, err.to_string());
                    }

                    let message = err.to_string();
                    if attempt + 1 < self.config.max_retries {
                        let delay = backoff_delay(self.config.retry_delay, attempt);
                        warn!(
                            video_id = %video_id,
                            attempt = attempt + 1,
                            max_retries = self.config.max_retries,
                            delay_secs = delay.as_secs_f64(),
                            "Transient caption failure, retrying: {}",
                            message
                        );
                        last_error = Some(message);
                        tokio::time::sleep(delay).await;
                    } else {
                        return FetchOutcome::failure(
                            video_id.clone(),
                            err.exhausted_status(),
                            message,
                        );
                    }
                }
            }
        }

        FetchOutcome::failure(
            video_id.clone(),
            FetchStatus::Error,
            last_error.unwrap_or_else(|| "unknown error after retries".to_string()),
        )
    }
}

/// Exponential backoff: `base * 2^attempt`, 0-based attempt index.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}
