//! Session credential types.
//!
//! The commerce API issues an opaque bearer token at login. It is carried
//! through the storefront as a [`SessionToken`] so it never ends up in logs.

use secrecy::{ExposeSecret, SecretString};

/// Opaque bearer credential authenticating cart requests.
///
/// `Debug` output is redacted; use [`SessionToken::expose`] only at the point
/// where the token is written into an `Authorization` header or the session
/// store.
#[derive(Clone)]
pub struct SessionToken(SecretString);

impl SessionToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Expose the raw token.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

impl From<String> for SessionToken {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

impl From<&str> for SessionToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}
