//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

/// Errors that abort a run.
///
/// Per-video caption failures never show up here; the fetch engine folds
/// them into outcomes. Only store failures and bad configuration are
/// allowed to terminate the process.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Store error: {0}")]
    Store(#[from] ytscribe_db::StoreError),

    #[error("Caption client error: {0}")]
    Captions(#[from] ytscribe_captions::CaptionError),
}

impl WorkerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
