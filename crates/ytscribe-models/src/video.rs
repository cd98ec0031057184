//! Video identifier and catalog models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a video in the catalog.
///
/// Ids are minted by the upstream collector; this worker never generates
/// them, it only carries them between the catalog, the caption endpoint
/// and the transcript table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A row of the read-only video catalog.
///
/// The catalog is owned by the upstream scraper; the worker only reads it
/// to find videos that still need a transcript.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CatalogVideo {
    /// Video identifier (primary key in the catalog)
    pub video_id: VideoId,
    /// When the upstream collector discovered the video
    pub scraped_at: DateTime<Utc>,
}
