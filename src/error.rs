//! Error types for quota enforcement.

use std::time::Duration;

use thiserror::Error;

use crate::ratelimit::Rate;

/// Main error type for quota operations.
#[derive(Error, Debug)]
pub enum QuotaError {
    /// A rate was built from non-positive values
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The strict check found the caller over quota
    #[error(transparent)]
    RateLimitExceeded(#[from] RateLimitExceeded),

    /// The counter store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuotaError {
    /// Returns the violation details when this error is a quota violation.
    pub fn as_exceeded(&self) -> Option<&RateLimitExceeded> {
        match self {
            QuotaError::RateLimitExceeded(e) => Some(e),
            _ => None,
        }
    }
}

/// Raised by the strict check when a caller goes past its quota.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Rate limit exceeded for {identifier}: {rate}")]
pub struct RateLimitExceeded {
    identifier: String,
    rate: Rate,
    reset_at: Option<u64>,
}

impl RateLimitExceeded {
    pub(crate) fn new(identifier: impl Into<String>, rate: Rate, reset_at: Option<u64>) -> Self {
        Self {
            identifier: identifier.into(),
            rate,
            reset_at,
        }
    }

    /// The caller whose quota was exceeded.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The violated rate.
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// Operations allowed per window.
    pub fn operations(&self) -> u64 {
        self.rate.operations()
    }

    /// Window length in seconds.
    pub fn interval(&self) -> u64 {
        self.rate.interval()
    }

    /// Epoch seconds at which the current window's counter resets.
    pub fn reset_at(&self) -> Option<u64> {
        self.reset_at
    }

    /// Time left until the counter resets, measured from `now`.
    pub fn retry_after(&self, now: u64) -> Option<Duration> {
        self.reset_at
            .map(|reset_at| Duration::from_secs(reset_at.saturating_sub(now)))
    }
}

/// Opaque failure reported by a counter store backend.
#[derive(Error, Debug)]
#[error("Counter store error: {message}")]
pub struct StoreError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Create a store error with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a store error wrapping the backend's own error.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The backend's description of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type alias for quota operations.
pub type Result<T> = std::result::Result<T, QuotaError>;
