//! Per-run outcome counters.

use std::fmt;

use ytscribe_models::FetchStatus;

/// Counts of fetch outcomes accumulated over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub success: u32,
    pub disabled: u32,
    pub not_found: u32,
    pub unavailable: u32,
    pub rate_limited: u32,
    pub error: u32,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one outcome.
    pub fn record(&mut self, status: FetchStatus) {
        match status {
            FetchStatus::Success => self.success += 1,
            FetchStatus::Disabled => self.disabled += 1,
            FetchStatus::NotFound => self.not_found += 1,
            FetchStatus::Unavailable => self.unavailable += 1,
            FetchStatus::RateLimited => self.rate_limited += 1,
            FetchStatus::Error => self.error += 1,
        }
    }

    /// Total items processed.
    pub fn total(&self) -> u32 {
        self.success + self.disabled + self.not_found + self.unavailable + self.rate_limited
            + self.error
    }

    fn entries(&self) -> [(FetchStatus, u32); 6] {
        [
            (FetchStatus::Success, self.success),
            (FetchStatus::Disabled, self.disabled),
            (FetchStatus::NotFound, self.not_found),
            (FetchStatus::Unavailable, self.unavailable),
            (FetchStatus::RateLimited, self.rate_limited),
            (FetchStatus::Error, self.error),
        ]
    }
}

/// Summary line listing only the statuses that occurred.
impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (status, count) in self.entries() {
            if count == 0 {
                continue;
            }
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", status, count)?;
            first = false;
        }
        if first {
            write!(f, "nothing processed")?;
        }
        Ok(())
    }
}
