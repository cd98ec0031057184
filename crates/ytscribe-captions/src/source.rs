//! Caption source capability.

use async_trait::async_trait;

use ytscribe_models::{FetchedTranscript, VideoId};

use crate::error::CaptionResult;

/// A provider of timed caption tracks.
///
/// `languages` is an ordered preference list; implementations return the
/// first track they can satisfy and report which language that was.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// Fetch the transcript for one video, or fail with a classified error.
    async fn fetch(&self, video_id: &VideoId, languages: &[String])
        -> CaptionResult<FetchedTranscript>;
}
