//! Authentication service.
//!
//! Login and registration against the commerce API. A successful login is
//! persisted into the [`SessionStore`]; logout clears the store wholesale.

mod error;

pub use error::AuthError;

use cartlane_core::SessionToken;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument};

use crate::api::{AccountApi, Credentials};
use crate::error::{clear_sentry_user, report, set_sentry_user};
use crate::session::{Session, SessionError, SessionStore};

/// Minimum username length at registration.
pub const MIN_USERNAME_LENGTH: usize = 6;

/// Minimum password length at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Authentication service.
pub struct AuthService<'a, A> {
    api: &'a A,
}

impl<'a, A: AccountApi> AuthService<'a, A> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Log in and persist the session.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty fields (no request is sent),
    /// `AuthError::Rejected` with the server's message for bad credentials,
    /// `AuthError::Connectivity` if the server could not be reached, or
    /// `AuthError::Session` if the session could not be stored.
    #[instrument(skip(self, store, password))]
    pub async fn login(
        &self,
        store: &mut impl SessionStore,
        username: &str,
        password: &SecretString,
    ) -> Result<Session, AuthError> {
        validate_login(username, password)?;

        let credentials = Credentials {
            username: username.to_string(),
            password: password.expose_secret().to_string(),
        };
        let response = self.api.login(&credentials).await.map_err(|e| {
            let err = AuthError::from(e);
            report(&err);
            err
        })?;

        let session = Session::authenticated(
            SessionToken::new(response.token),
            response.username,
            response.balance,
        );
        session.persist(store)?;

        if let Some(username) = &session.username {
            set_sentry_user(username);
        }
        info!("Logged in successfully");
        Ok(session)
    }

    /// Register a new account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input (no request is sent),
    /// `AuthError::Rejected` with the server's message (e.g. the username is
    /// taken), or `AuthError::Connectivity` if the server could not be
    /// reached.
    #[instrument(skip(self, password, confirm))]
    pub async fn register(
        &self,
        username: &str,
        password: &SecretString,
        confirm: &SecretString,
    ) -> Result<(), AuthError> {
        validate_registration(username, password, confirm)?;

        let credentials = Credentials {
            username: username.to_string(),
            password: password.expose_secret().to_string(),
        };
        self.api.register(&credentials).await.map_err(|e| {
            let err = AuthError::from(e);
            report(&err);
            err
        })?;

        info!("Registered successfully");
        Ok(())
    }
}

/// Clear every session key.
///
/// # Errors
///
/// Returns `SessionError` if the store cannot be cleared.
pub fn logout(store: &mut impl SessionStore) -> Result<(), SessionError> {
    store.clear()?;
    clear_sentry_user();
    info!("Logged out");
    Ok(())
}

/// The session currently held in `store`.
///
/// # Errors
///
/// Returns `SessionError` if the store cannot be read.
pub fn current_session(store: &impl SessionStore) -> Result<Session, SessionError> {
    let session = Session::load(store)?;
    if let Some(username) = &session.username {
        set_sentry_user(username);
    }
    Ok(session)
}

// =============================================================================
// Validation
// =============================================================================

/// Check login input before it is sent.
///
/// # Errors
///
/// Returns `AuthError::MissingUsername` or `AuthError::MissingPassword`.
pub fn validate_login(username: &str, password: &SecretString) -> Result<(), AuthError> {
    if username.is_empty() {
        return Err(AuthError::MissingUsername);
    }
    if password.expose_secret().is_empty() {
        return Err(AuthError::MissingPassword);
    }
    Ok(())
}

/// Check registration input before it is sent.
///
/// # Errors
///
/// Returns the first failing rule: username present, username length,
/// password present, password length, passwords matching.
pub fn validate_registration(
    username: &str,
    password: &SecretString,
    confirm: &SecretString,
) -> Result<(), AuthError> {
    let password = password.expose_secret();

    if username.is_empty() {
        return Err(AuthError::MissingUsername);
    }
    if username.chars().count() < MIN_USERNAME_LENGTH {
        return Err(AuthError::UsernameTooShort {
            min: MIN_USERNAME_LENGTH,
        });
    }
    if password.is_empty() {
        return Err(AuthError::MissingPassword);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    if password != confirm.expose_secret() {
        return Err(AuthError::PasswordMismatch);
    }
    Ok(())
}
