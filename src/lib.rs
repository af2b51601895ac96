//! Fixed Quota - fixed-window rate limiting
//!
//! A caller identified by an opaque key may perform at most N operations per
//! fixed window of T seconds. The strict limiter fails on violation; the
//! silent limiter always returns a [`ratelimit::Status`] instead. Counters live
//! in a host-supplied [`ratelimit::CounterStore`].

pub mod config;
pub mod error;
pub mod ratelimit;

pub use error::{QuotaError, RateLimitExceeded, Result, StoreError};
pub use ratelimit::{
    FixedWindowLimiter, MemoryStore, Rate, RateLimiter, SessionStore, SilentRateLimiter, Status,
};
