//! Caption fetch error types.

use thiserror::Error;

use ytscribe_models::FetchStatus;

/// Result type for caption operations.
pub type CaptionResult<T> = Result<T, CaptionError>;

/// Errors that can occur while fetching a caption track.
///
/// The variants form a closed taxonomy: the fetch engine decides between
/// fail-now and retry-with-backoff by asking [`CaptionError::permanent_status`],
/// never by inspecting error strings.
#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("captions are disabled for video {0}")]
    CaptionsDisabled(String),

    #[error("no caption track for video {video_id} in languages {languages:?}")]
    NoCaptionsFound {
        video_id: String,
        languages: Vec<String>,
    },

    #[error("video {video_id} is unavailable: {reason}")]
    VideoUnavailable { video_id: String, reason: String },

    #[error("caption endpoint rate limited the request")]
    RateLimited,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CaptionError {
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Status to record when this error ends the call immediately.
    ///
    /// Returns `None` for transient errors, which are worth another attempt.
    pub fn permanent_status(&self) -> Option<FetchStatus> {
        match self {
            CaptionError::CaptionsDisabled(_) => Some(FetchStatus::Disabled),
            CaptionError::NoCaptionsFound { .. } => Some(FetchStatus::NotFound),
            CaptionError::VideoUnavailable { .. } => Some(FetchStatus::Unavailable),
            _ => None,
        }
    }

    /// Status to record once retries for a transient error run out.
    pub fn exhausted_status(&self) -> FetchStatus {
        match self {
            CaptionError::RateLimited => FetchStatus::RateLimited,
            _ => FetchStatus::Error,
        }
    }

    /// Check if error is retryable within the same call.
    pub fn is_retryable(&self) -> bool {
        self.permanent_status().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_errors_are_permanent() {
        assert_eq!(
            CaptionError::CaptionsDisabled("v1".into()).permanent_status(),
            Some(FetchStatus::Disabled)
        );
        assert_eq!(
            CaptionError::NoCaptionsFound {
                video_id: "v1".into(),
                languages: vec!["en".into()],
            }
            .permanent_status(),
            Some(FetchStatus::NotFound)
        );
        assert_eq!(
            CaptionError::VideoUnavailable {
                video_id: "v1".into(),
                reason: "private".into(),
            }
            .permanent_status(),
            Some(FetchStatus::Unavailable)
        );
    }

    #[test]
    fn test_transient_errors_are_retryable() {
        assert!(CaptionError::RateLimited.is_retryable());
        assert!(CaptionError::invalid_response("garbled").is_retryable());
        assert!(!CaptionError::CaptionsDisabled("v1".into()).is_retryable());
    }

    #[test]
    fn test_exhausted_status_split() {
        assert_eq!(
            CaptionError::RateLimited.exhausted_status(),
            FetchStatus::RateLimited
        );
        assert_eq!(
            CaptionError::invalid_response("garbled").exhausted_status(),
            FetchStatus::Error
        );
    }
}
