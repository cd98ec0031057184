//! Innertube caption client.
//!
//! Talks to YouTube's innertube `/player` endpoint to discover caption
//! tracks, then downloads the selected track as `fmt=json3` and parses it
//! into timed segments.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::debug;
use url::Url;

use ytscribe_models::{FetchedTranscript, VideoId};

use crate::error::{CaptionError, CaptionResult};
use crate::parse::{parse_json3, select_track, PlayerResponse};
use crate::source::CaptionSource;

const ANDROID_CLIENT_NAME: &str = "ANDROID";
const ANDROID_CLIENT_VERSION: &str = "20.10.38";

/// Configuration for the caption client.
#[derive(Debug, Clone)]
pub struct CaptionClientConfig {
    /// Base URL of the caption endpoint
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent presented to the endpoint
    pub user_agent: String,
}

impl Default for CaptionClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!(
                "com.google.android.youtube/{} (Linux; U; Android 11) gzip",
                ANDROID_CLIENT_VERSION
            ),
        }
    }
}

impl CaptionClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("CAPTIONS_BASE_URL").unwrap_or(defaults.base_url),
            timeout: Duration::from_secs(
                std::env::var("CAPTIONS_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            user_agent: std::env::var("CAPTIONS_USER_AGENT").unwrap_or(defaults.user_agent),
        }
    }
}

/// Client for YouTube's innertube player API.
pub struct InnertubeClient {
    http: Client,
    config: CaptionClientConfig,
}

impl InnertubeClient {
    /// Create a new caption client.
    pub fn new(config: CaptionClientConfig) -> CaptionResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(CaptionError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> CaptionResult<Self> {
        Self::new(CaptionClientConfig::from_env())
    }

    async fn player_response(&self, video_id: &VideoId) -> CaptionResult<PlayerResponse> {
        let url = format!("{}/youtubei/v1/player", self.config.base_url);
        let body = json!({
            "context": {
                "client": {
                    "clientName": ANDROID_CLIENT_NAME,
                    "clientVersion": ANDROID_CLIENT_VERSION,
                    "androidSdkVersion": 30,
                }
            },
            "videoId": video_id.as_str(),
        });

        debug!(video_id = %video_id, "Requesting player response");

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(CaptionError::Network)?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(CaptionError::RateLimited);
        }
        if !response.status().is_success() {
            return Err(CaptionError::invalid_response(format!(
                "player endpoint returned {}",
                response.status()
            )));
        }

        let parsed: PlayerResponse = response.json().await.map_err(CaptionError::Network)?;
        Ok(parsed)
    }

    async fn track_body(&self, base_url: &str) -> CaptionResult<String> {
        let mut url = Url::parse(base_url).map_err(|e| {
            CaptionError::invalid_response(format!("bad caption track url: {}", e))
        })?;
        url.query_pairs_mut().append_pair("fmt", "json3");

        debug!(url = %url, "Downloading caption track");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(CaptionError::Network)?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(CaptionError::RateLimited);
        }
        if !response.status().is_success() {
            return Err(CaptionError::invalid_response(format!(
                "caption track returned {}",
                response.status()
            )));
        }

        response.text().await.map_err(CaptionError::Network)
    }
}

#[async_trait]
impl CaptionSource for InnertubeClient {
    async fn fetch(
        &self,
        video_id: &VideoId,
        languages: &[String],
    ) -> CaptionResult<FetchedTranscript> {
        let player = self.player_response(video_id).await?;

        if let Some(status) = &player.playability_status {
            if !status.is_playable() {
                return Err(CaptionError::VideoUnavailable {
                    video_id: video_id.to_string(),
                    reason: status.describe(),
                });
            }
        }

        let tracks = match player.caption_tracks() {
            Some(tracks) if !tracks.is_empty() => tracks,
            _ => return Err(CaptionError::CaptionsDisabled(video_id.to_string())),
        };

        let track = select_track(tracks, languages).ok_or_else(|| {
            CaptionError::NoCaptionsFound {
                video_id: video_id.to_string(),
                languages: languages.to_vec(),
            }
        })?;

        let body = self.track_body(&track.base_url).await?;
        let segments = parse_json3(&body)?;

        debug!(
            video_id = %video_id,
            language = %track.language_code,
            segments = segments.len(),
            "Caption track fetched"
        );

        Ok(FetchedTranscript {
            language: track.language_code.clone(),
            segments,
        })
    }
}
