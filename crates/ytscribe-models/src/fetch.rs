//! Fetch outcome taxonomy.
//!
//! Every caption fetch for a video ends in exactly one [`FetchStatus`], and
//! the status (not an exception chain) is what drives retry and selection
//! decisions downstream.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::transcript::{FetchedTranscript, TranscriptSegment};
use crate::video::VideoId;

/// Final status of a caption fetch for one video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "fetch_status", rename_all = "snake_case")]
pub enum FetchStatus {
    /// Captions fetched and parsed
    Success,
    /// Captions are turned off for the video
    Disabled,
    /// No caption track exists in any requested language
    NotFound,
    /// Video is deleted, private or region-blocked
    Unavailable,
    /// Caption endpoint rate-limited us and retries ran out
    RateLimited,
    /// Unclassified failure after retries ran out
    Error,
}

impl FetchStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchStatus::Success => "success",
            FetchStatus::Disabled => "disabled",
            FetchStatus::NotFound => "not_found",
            FetchStatus::Unavailable => "unavailable",
            FetchStatus::RateLimited => "rate_limited",
            FetchStatus::Error => "error",
        }
    }

    /// True for statuses that describe the video itself rather than the
    /// conditions of the attempt. The fetch engine never retries these
    /// within a call.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            FetchStatus::Disabled | FetchStatus::NotFound | FetchStatus::Unavailable
        )
    }

    /// True for statuses that permanently exclude a video from selection.
    ///
    /// `NotFound` is structural for a single call but stays eligible for
    /// re-selection below the attempts ceiling: a caption track can appear
    /// later, a deleted video cannot.
    pub fn is_permanent(&self) -> bool {
        matches!(self, FetchStatus::Disabled | FetchStatus::Unavailable)
    }

    /// True for statuses caused by transient conditions, retried with
    /// backoff until the in-call attempt budget runs out.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchStatus::RateLimited | FetchStatus::Error)
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of one fetch-engine call for one video.
///
/// A success carries the language and segments; failures carry the last
/// error text and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchOutcome {
    /// Video the outcome belongs to
    pub video_id: VideoId,
    /// Final status of the call
    pub status: FetchStatus,
    /// Language code actually obtained (success only)
    pub language: Option<String>,
    /// Ordered timed segments (success only)
    pub segments: Option<Vec<TranscriptSegment>>,
    /// Last error detail (failures only)
    pub error_message: Option<String>,
}

impl FetchOutcome {
    /// Build a success outcome from a fetched transcript.
    pub fn success(video_id: VideoId, transcript: FetchedTranscript) -> Self {
        Self {
            video_id,
            status: FetchStatus::Success,
            language: Some(transcript.language),
            segments: Some(transcript.segments),
            error_message: None,
        }
    }

    /// Build a failure outcome with the given status and error text.
    pub fn failure(video_id: VideoId, status: FetchStatus, error: impl Into<String>) -> Self {
        Self {
            video_id,
            status,
            language: None,
            segments: None,
            error_message: Some(error.into()),
        }
    }

    /// Flattened plain-text form of the segments, if any.
    pub fn flattened_text(&self) -> Option<String> {
        self.segments
            .as_ref()
            .map(|segments| crate::transcript::flatten_segments(segments))
    }

    /// Total character count of the flattened text (0 for failures).
    pub fn text_chars(&self) -> usize {
        self.flattened_text().map(|t| t.chars().count()).unwrap_or(0)
    }
}
