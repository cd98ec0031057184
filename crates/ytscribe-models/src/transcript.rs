//! Transcript segments and persisted records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fetch::FetchStatus;
use crate::video::VideoId;

/// One timed unit of caption text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Offset from the start of the video, in seconds
    pub start: f64,
    /// Display duration in seconds
    pub duration: f64,
    /// Caption text
    pub text: String,
}

/// A transcript as returned by the caption endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedTranscript {
    /// Language code of the track actually used
    pub language: String,
    /// Ordered timed segments
    pub segments: Vec<TranscriptSegment>,
}

impl FetchedTranscript {
    /// Flattened plain-text form of the transcript.
    pub fn flattened_text(&self) -> String {
        flatten_segments(&self.segments)
    }
}

/// Join segment texts with single spaces and trim the ends.
pub fn flatten_segments(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// A persisted transcript row, one per video.
///
/// Created on the first write for a video (success or failure) and mutated
/// on every later attempt; never deleted by the worker.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TranscriptRecord {
    /// Video identifier (unique key)
    pub video_id: VideoId,
    /// Language of the stored transcript, if one was ever fetched
    pub language: Option<String>,
    /// Flattened plain text, if one was ever fetched
    pub transcript_text: Option<String>,
    /// Full timed-segment form, if one was ever fetched
    pub transcript_json: Option<serde_json::Value>,
    /// Status of the most recent fetch
    pub fetch_status: FetchStatus,
    /// Error detail of the most recent failed fetch
    pub error_message: Option<String>,
    /// Number of persisted attempts for this video
    pub fetch_attempts: i32,
    /// When the row was last written
    pub fetched_at: DateTime<Utc>,
}

impl TranscriptRecord {
    /// True when the row holds transcript content.
    ///
    /// Text and JSON are written together, so either both are present or
    /// neither is.
    pub fn has_content(&self) -> bool {
        self.transcript_text.is_some() && self.transcript_json.is_some()
    }
}
