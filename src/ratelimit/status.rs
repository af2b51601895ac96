//! Quota status snapshots.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

/// A snapshot of a caller's quota after one hit.
///
/// Derived from a counter entry and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    /// The caller this status describes
    pub identifier: String,
    /// Operations allowed per window
    pub limit: u64,
    /// Count reported by the store, at most `limit + 1`
    pub current: u64,
    /// `limit - current`, floored at zero
    pub remaining: u64,
    /// Epoch second at which the window's counter resets
    pub reset_at: u64,
}

impl Status {
    /// Build a status from the count a store reported after a hit.
    pub fn from_parts(identifier: impl Into<String>, current: u64, limit: u64, reset_at: u64) -> Self {
        Self {
            identifier: identifier.into(),
            limit,
            current,
            remaining: limit.saturating_sub(current),
            reset_at,
        }
    }

    /// Whether the hit that produced this status went past the quota.
    pub fn is_exceeded(&self) -> bool {
        self.current > self.limit
    }

    /// The reset time as a UTC timestamp.
    pub fn reset_at_utc(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.reset_at).ok()?;
        Utc.timestamp_opt(secs, 0).single()
    }

    /// Time left until the counter resets, measured from `now`.
    pub fn retry_after(&self, now: u64) -> Duration {
        Duration::from_secs(self.reset_at.saturating_sub(now))
    }
}
