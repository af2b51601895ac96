//! Caller identity resolution.

/// Supplies the identifier of the caller whose quota is being checked.
///
/// The limiter treats the value as opaque. Hosts typically return a session
/// id, an API key, or a remote address.
pub trait IdentityResolver: Send + Sync {
    /// The current caller's identifier.
    fn identifier(&self) -> String;
}

/// An identifier fixed when the limiter is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedIdentity(pub String);

impl FixedIdentity {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }
}

impl IdentityResolver for FixedIdentity {
    fn identifier(&self) -> String {
        self.0.clone()
    }
}

impl IdentityResolver for String {
    fn identifier(&self) -> String {
        self.clone()
    }
}

impl IdentityResolver for &'static str {
    fn identifier(&self) -> String {
        (*self).to_string()
    }
}

impl<F> IdentityResolver for F
where
    F: Fn() -> String + Send + Sync,
{
    fn identifier(&self) -> String {
        self()
    }
}
