//! Job selection: which videos one run will attempt.

use tracing::debug;

use ytscribe_db::{StoreResult, TranscriptStore};
use ytscribe_models::VideoId;

/// Assemble the ordered batch for one run.
///
/// Never-attempted catalog videos come first (most recently discovered
/// first); remaining capacity is filled with retry-eligible failures
/// (oldest-attempted first). Each id appears at most once, and videos with
/// a permanent status never appear at all.
pub async fn select_batch<T: TranscriptStore + ?Sized>(
    store: &T,
    batch_limit: i64,
    max_attempts: i32,
) -> StoreResult<Vec<VideoId>> {
    let mut batch = store.pending_video_ids(batch_limit).await?;
    let pending_count = batch.len();

    let remaining = batch_limit - pending_count as i64;
    if remaining > 0 {
        let retryable = store.retryable_video_ids(remaining, max_attempts).await?;
        for id in retryable {
            if !batch.contains(&id) {
                batch.push(id);
            }
        }
    }

    debug!(
        pending = pending_count,
        retryable = batch.len() - pending_count,
        "Selected batch"
    );
    Ok(batch)
}
