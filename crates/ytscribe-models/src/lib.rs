//! Shared data models for the ytscribe backend.
//!
//! This crate provides Serde-serializable types for:
//! - Video identifiers and catalog rows
//! - Timed transcript segments and fetched transcripts
//! - Fetch outcomes and their status taxonomy
//! - Persisted transcript records

pub mod fetch;
pub mod transcript;
pub mod video;

// Re-export common types
pub use fetch::{FetchOutcome, FetchStatus};
pub use transcript::{FetchedTranscript, TranscriptRecord, TranscriptSegment};
pub use video::{CatalogVideo, VideoId};
