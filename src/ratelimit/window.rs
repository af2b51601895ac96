//! Window key derivation.

/// A key that identifies one counter: a caller, an interval, and the index
/// of the fixed window the current time falls into.
///
/// `window_index = floor(now / interval)`, so every instant inside the same
/// window maps to the same key and the first instant of the next window maps
/// to a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowKey {
    /// The caller identifier
    pub identifier: String,
    /// Window length in seconds
    pub interval: u64,
    /// Index of the window since the epoch
    pub window_index: u64,
}

impl WindowKey {
    /// Derive the key for `identifier` at epoch second `now`.
    ///
    /// `interval` must be non-zero; [`Rate`](super::Rate) guarantees this.
    pub fn derive(identifier: &str, interval: u64, now: u64) -> Self {
        debug_assert!(interval > 0);
        Self {
            identifier: identifier.to_string(),
            interval,
            window_index: now / interval,
        }
    }

    /// Epoch second at which this window starts.
    pub fn window_start(&self) -> u64 {
        self.window_index * self.interval
    }

    /// Epoch second at which the next window starts.
    pub fn window_end(&self) -> u64 {
        self.window_start().saturating_add(self.interval)
    }

    /// Convert the key to its string form, `identifier:interval:window_index`.
    pub fn to_string_key(&self) -> String {
        format!("{}:{}:{}", self.identifier, self.interval, self.window_index)
    }
}

impl std::fmt::Display for WindowKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_key())
    }
}
