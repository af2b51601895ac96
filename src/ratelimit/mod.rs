//! Fixed-window quota enforcement.

mod clock;
mod counter;
mod identity;
mod limiter;
mod rate;
mod rules;
mod status;
mod store;
mod window;

pub use clock::{Clock, ManualClock, SystemClock};
pub use counter::{hit, CounterEntry};
pub use identity::{FixedIdentity, IdentityResolver};
pub use limiter::{FixedWindowLimiter, RateLimiter, SilentRateLimiter};
pub use rate::{Interval, Rate, RateSpec};
pub use rules::RateTable;
pub use status::Status;
pub use store::{CounterStore, MemoryStore, SessionStore};
pub use window::WindowKey;
