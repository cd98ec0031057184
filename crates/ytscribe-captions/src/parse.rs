//! Wire formats of the innertube player response and `json3` caption tracks.

use serde::Deserialize;

use ytscribe_models::TranscriptSegment;

use crate::error::{CaptionError, CaptionResult};

/// Subset of the innertube `/player` response the worker cares about.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub playability_status: Option<PlayabilityStatus>,
    pub captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayabilityStatus {
    pub status: Option<String>,
    pub reason: Option<String>,
}

impl PlayabilityStatus {
    /// True when the video can be played at all. Anything else means the
    /// video is deleted, private or blocked and captions cannot exist.
    pub fn is_playable(&self) -> bool {
        matches!(self.status.as_deref(), None | Some("OK"))
    }

    /// Human-readable reason for an unplayable video.
    pub fn describe(&self) -> String {
        match (&self.status, &self.reason) {
            (Some(status), Some(reason)) => format!("{}: {}", status, reason),
            (Some(status), None) => status.clone(),
            (None, Some(reason)) => reason.clone(),
            (None, None) => "unplayable".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Captions {
    pub player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TracklistRenderer {
    #[serde(default)]
    pub caption_tracks: Vec<CaptionTrack>,
}

/// One entry of the player response track list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    /// "asr" marks an auto-generated track
    #[serde(default)]
    pub kind: Option<String>,
}

impl CaptionTrack {
    /// True for speech-recognition tracks (no human-authored captions).
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

impl PlayerResponse {
    /// Pull the caption track list out of the response, if present.
    pub fn caption_tracks(&self) -> Option<&[CaptionTrack]> {
        self.captions
            .as_ref()
            .and_then(|c| c.player_captions_tracklist_renderer.as_ref())
            .map(|r| r.caption_tracks.as_slice())
    }
}

/// Pick the track to fetch for an ordered language preference list.
///
/// For each preferred language in order, a manually created track beats a
/// generated one; the first language with any track wins.
pub fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    for lang in languages {
        if let Some(track) = tracks
            .iter()
            .find(|t| !t.is_generated() && t.language_code == *lang)
        {
            return Some(track);
        }
        if let Some(track) = tracks.iter().find(|t| t.language_code == *lang) {
            return Some(track);
        }
    }
    None
}

#[derive(Debug, Deserialize)]
struct Json3Track {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    t_start_ms: Option<i64>,
    d_duration_ms: Option<i64>,
    segs: Option<Vec<Json3Seg>>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    utf8: Option<String>,
}

/// Parse a `fmt=json3` caption track body into timed segments.
///
/// Events without text (window styling, empty cues) are skipped; newlines
/// inside a cue become spaces.
pub fn parse_json3(body: &str) -> CaptionResult<Vec<TranscriptSegment>> {
    let track: Json3Track =
        serde_json::from_str(body).map_err(CaptionError::Json)?;

    let mut segments = Vec::with_capacity(track.events.len());
    for event in track.events {
        let Some(segs) = event.segs else { continue };
        let text = segs
            .into_iter()
            .filter_map(|s| s.utf8)
            .collect::<String>()
            .replace('\n', " ")
            .trim()
            .to_string();
        if text.is_empty() {
            continue;
        }
        segments.push(TranscriptSegment {
            start: event.t_start_ms.unwrap_or(0) as f64 / 1000.0,
            duration: event.d_duration_ms.unwrap_or(0) as f64 / 1000.0,
            text,
        });
    }
    Ok(segments)
}
