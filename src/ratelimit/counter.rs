//! Counter entries and the hit transition.

use serde::{Deserialize, Serialize};

use super::rate::Rate;

/// The stored state for one window key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterEntry {
    /// Hits observed in this window, frozen at `operations + 1`
    pub count: u64,
    /// Epoch second at which this entry stops being addressed
    pub reset_at: u64,
}

impl CounterEntry {
    /// A fresh entry for the first hit of a window.
    ///
    /// `reset_at` saturates at `u64::MAX` for very long intervals.
    pub fn first(rate: &Rate, now: u64) -> Self {
        Self {
            count: 1,
            reset_at: now.saturating_add(rate.interval()),
        }
    }

    /// Whether the entry has outlived its window.
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.reset_at
    }
}

/// Apply one hit to the entry stored under a window key.
///
/// - no entry: start at 1 with `reset_at = now + interval`
/// - `count <= operations`: increment
/// - otherwise: unchanged, so repeated violations report a stable
///   `operations + 1`
///
/// `reset_at` is fixed at creation. Stores call this while holding the key
/// exclusively.
pub fn hit(existing: Option<CounterEntry>, rate: &Rate, now: u64) -> CounterEntry {
    match existing {
        None => CounterEntry::first(rate, now),
        Some(entry) if entry.count <= rate.operations() => CounterEntry {
            count: entry.count + 1,
            ..entry
        },
        Some(entry) => entry,
    }
}
