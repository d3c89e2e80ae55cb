//! Client-side session state.
//!
//! The commerce API hands out a bearer token at login. The storefront keeps
//! it, together with the username and wallet balance shown in the header, in
//! a small key-value [`SessionStore`]. Logging out clears the store wholesale.
//!
//! Cart code never reads the store directly: it receives an explicit
//! [`Session`] built from it, so the cart logic can be exercised without any
//! ambient state.

mod store;

pub use store::{FileSessionStore, MemorySessionStore, SessionError, SessionStore};

use std::str::FromStr;

use cartlane_core::SessionToken;
use rust_decimal::Decimal;

/// Session store keys.
pub mod keys {
    /// Key for the bearer token.
    pub const TOKEN: &str = "token";

    /// Key for the logged-in username.
    pub const USERNAME: &str = "username";

    /// Key for the wallet balance.
    pub const BALANCE: &str = "balance";
}

/// Explicit session context passed into cart operations.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Bearer token; `None` when logged out.
    pub token: Option<SessionToken>,
    /// Username shown in the header.
    pub username: Option<String>,
    /// Wallet balance reported at login.
    pub balance: Option<Decimal>,
}

impl Session {
    /// A logged-out session.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A logged-in session.
    #[must_use]
    pub fn authenticated(token: SessionToken, username: String, balance: Decimal) -> Self {
        Self {
            token: Some(token),
            username: Some(username),
            balance: Some(balance),
        }
    }

    /// The bearer token, if logged in.
    #[must_use]
    pub const fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    /// Returns `true` if a token is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Build a session from the store.
    ///
    /// An unparseable balance is dropped with a warning; the balance is only
    /// ever displayed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the store cannot be read.
    pub fn load(store: &impl SessionStore) -> Result<Self, SessionError> {
        let token = store
            .get(keys::TOKEN)?
            .filter(|t| !t.is_empty())
            .map(SessionToken::new);
        let username = store.get(keys::USERNAME)?;
        let balance = store
            .get(keys::BALANCE)?
            .and_then(|raw| match Decimal::from_str(&raw) {
                Ok(balance) => Some(balance),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring unparseable balance in session store");
                    None
                }
            });

        Ok(Self {
            token,
            username,
            balance,
        })
    }

    /// Write this session into the store.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the store cannot be written.
    pub fn persist(&self, store: &mut impl SessionStore) -> Result<(), SessionError> {
        if let Some(username) = &self.username {
            store.set(keys::USERNAME, username)?;
        }
        if let Some(balance) = &self.balance {
            store.set(keys::BALANCE, &balance.to_string())?;
        }
        if let Some(token) = &self.token {
            store.set(keys::TOKEN, token.expose())?;
        }
        Ok(())
    }
}
