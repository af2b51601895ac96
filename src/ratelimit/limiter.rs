//! Strict and silent fixed-window limiters.

use tracing::{debug, trace};

use super::clock::{Clock, SystemClock};
use super::counter::CounterEntry;
use super::identity::IdentityResolver;
use super::rate::Rate;
use super::status::Status;
use super::store::CounterStore;
use super::window::WindowKey;
use crate::error::{RateLimitExceeded, Result};

/// Enforces a quota by failing once it is exceeded.
pub trait RateLimiter {
    /// Record a hit for the current caller.
    ///
    /// Fails with [`QuotaError::RateLimitExceeded`](crate::error::QuotaError::RateLimitExceeded)
    /// when the hit takes the caller past `rate`. The hit is recorded either way.
    fn limit(&self, rate: &Rate) -> Result<()>;
}

/// Reports quota state without ever failing on quota grounds.
///
/// Store failures still surface as errors.
pub trait SilentRateLimiter {
    /// Record a hit for the current caller and describe the remaining quota.
    fn limit_silently(&self, rate: &Rate) -> Result<Status>;
}

/// Fixed-window limiter over a [`CounterStore`].
///
/// The host owns the store and decides its scope: a shared [`MemoryStore`]
/// behind an `Arc` for process-wide limits, or a [`SessionStore`] per caller
/// context. The limiter keeps no state of its own between calls.
///
/// A caller can make up to `2 × operations` hits across a window boundary;
/// windows are fixed, not sliding.
///
/// [`MemoryStore`]: super::store::MemoryStore
/// [`SessionStore`]: super::store::SessionStore
pub struct FixedWindowLimiter<S, I, C = SystemClock> {
    store: S,
    identity: I,
    clock: C,
}

impl<S, I> FixedWindowLimiter<S, I, SystemClock>
where
    S: CounterStore,
    I: IdentityResolver,
{
    /// Create a limiter that reads the system clock.
    pub fn new(store: S, identity: I) -> Self {
        Self::with_clock(store, identity, SystemClock)
    }
}

impl<S, I, C> FixedWindowLimiter<S, I, C>
where
    S: CounterStore,
    I: IdentityResolver,
    C: Clock,
{
    /// Create a limiter with an explicit clock.
    pub fn with_clock(store: S, identity: I, clock: C) -> Self {
        Self {
            store,
            identity,
            clock,
        }
    }

    /// Get the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record one hit and return the identifier with the resulting entry.
    fn check(&self, rate: &Rate) -> Result<(String, CounterEntry)> {
        let identifier = self.identity.identifier();
        let now = self.clock.now();
        let key = WindowKey::derive(&identifier, rate.interval(), now);

        trace!(key = %key, rate = %rate, "Checking rate limit");

        let entry = self.store.increment_and_get(&key, rate, now)?;

        if entry.count == 1 {
            debug!(
                key = %key,
                reset_at = entry.reset_at,
                "Started new rate limit window"
            );
        }
        if entry.count > rate.operations() {
            debug!(
                identifier = %identifier,
                key = %key,
                count = entry.count,
                limit = rate.operations(),
                "Rate limit exceeded"
            );
        }

        Ok((identifier, entry))
    }
}

impl<S, I, C> RateLimiter for FixedWindowLimiter<S, I, C>
where
    S: CounterStore,
    I: IdentityResolver,
    C: Clock,
{
    fn limit(&self, rate: &Rate) -> Result<()> {
        let (identifier, entry) = self.check(rate)?;

        if entry.count > rate.operations() {
            return Err(RateLimitExceeded::new(identifier, *rate, Some(entry.reset_at)).into());
        }
        Ok(())
    }
}

impl<S, I, C> SilentRateLimiter for FixedWindowLimiter<S, I, C>
where
    S: CounterStore,
    I: IdentityResolver,
    C: Clock,
{
    fn limit_silently(&self, rate: &Rate) -> Result<Status> {
        let (identifier, entry) = self.check(rate)?;

        Ok(Status::from_parts(
            identifier,
            entry.count,
            rate.operations(),
            entry.reset_at,
        ))
    }
}
