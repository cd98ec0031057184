//! Postgres store for the ytscribe worker.
//!
//! Two relations: the read-only video catalog and the read-write transcript
//! table. The transcript upsert is idempotent and coalescing: a later failed
//! attempt can never erase previously captured content.

pub mod error;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::{Store, TranscriptStore};
