//! Worker configuration.

use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::error::{WorkerError, WorkerResult};

/// Worker configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Postgres connection string
    pub database_url: String,
    /// Max videos selected per run
    pub batch_limit: i64,
    /// Sleep after each successful fetch
    pub pacing_delay: Duration,
    /// Ordered language preference passed to the caption source
    pub languages: Vec<String>,
    /// Attempt budget per video within one run
    pub max_retries: u32,
    /// Base delay for exponential backoff on transient failures
    pub retry_delay: Duration,
}

impl WorkerConfig {
    /// Create config from environment variables.
    ///
    /// `DATABASE_URL` is required; everything else falls back to defaults,
    /// with a warning when a value is present but unparseable.
    pub fn from_env() -> WorkerResult<Self> {
        let database_url = match std::env::var("DATABASE_URL") {
            Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => {
                return Err(WorkerError::config_error(
                    "Missing required environment variable: DATABASE_URL",
                ))
            }
        };

        Ok(Self {
            database_url,
            batch_limit: env_or("TRANSCRIPT_BATCH_LIMIT", 25),
            pacing_delay: Duration::from_secs_f64(env_or("TRANSCRIPT_SLEEP_SECONDS", 1.0)),
            languages: languages_from_env(),
            max_retries: env_or("TRANSCRIPT_MAX_RETRIES", 3),
            retry_delay: Duration::from_secs_f64(env_or("TRANSCRIPT_RETRY_DELAY", 2.0)),
        })
    }
}

/// Parse an environment variable, falling back to the default on absence
/// or a parse failure (with a warning, so typos don't go unnoticed).
fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display + Copy,
{
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Invalid value for {}: {:?}, using default: {}", name, raw, default);
                default
            }
        },
        _ => default,
    }
}

fn languages_from_env() -> Vec<String> {
    let raw = std::env::var("TRANSCRIPT_LANGUAGES").unwrap_or_default();
    let languages: Vec<String> = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect();

    if languages.is_empty() {
        vec!["en".to_string()]
    } else {
        languages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_parses_valid_values() {
        std::env::set_var("YTSCRIBE_TEST_VALID_INT", "7");
        assert_eq!(env_or("YTSCRIBE_TEST_VALID_INT", 25i64), 7);
        std::env::remove_var("YTSCRIBE_TEST_VALID_INT");
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        std::env::set_var("YTSCRIBE_TEST_BAD_INT", "twenty");
        assert_eq!(env_or("YTSCRIBE_TEST_BAD_INT", 25i64), 25);
        std::env::remove_var("YTSCRIBE_TEST_BAD_INT");
    }

    #[test]
    fn test_env_or_falls_back_on_absence() {
        std::env::remove_var("YTSCRIBE_TEST_MISSING");
        assert_eq!(env_or("YTSCRIBE_TEST_MISSING", 1.5f64), 1.5);
    }

    #[test]
    fn test_languages_parsing() {
        std::env::set_var("TRANSCRIPT_LANGUAGES", " en, de ,,fr ");
        assert_eq!(languages_from_env(), vec!["en", "de", "fr"]);

        std::env::remove_var("TRANSCRIPT_LANGUAGES");
        assert_eq!(languages_from_env(), vec!["en"]);
    }
}
