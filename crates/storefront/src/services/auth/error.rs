//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;
use crate::error::{CONNECTIVITY_MESSAGE, Reportable};
use crate::session::SessionError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username is a required field")]
    MissingUsername,

    #[error("Password is a required field")]
    MissingPassword,

    #[error("Username must be at least {min} characters")]
    UsernameTooShort { min: usize },

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Passwords do not match")]
    PasswordMismatch,

    /// The server refused the credentials; the message is the server's.
    #[error("{0}")]
    Rejected(String),

    /// No response from the server.
    #[error("{}", CONNECTIVITY_MESSAGE)]
    Connectivity { detail: String },

    /// Any other remote failure.
    #[error("Commerce API error: {0}")]
    Remote(#[source] ApiError),

    /// The session could not be persisted or cleared.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl AuthError {
    /// Returns `true` for input rejected before any request was sent.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingUsername
                | Self::MissingPassword
                | Self::UsernameTooShort { .. }
                | Self::PasswordTooShort { .. }
                | Self::PasswordMismatch
        )
    }
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        if err.is_client_error() {
            return match err {
                ApiError::Api { message, .. } => Self::Rejected(message),
                other => Self::Remote(other),
            };
        }
        match err {
            ApiError::Connectivity(detail) => Self::Connectivity { detail },
            other => Self::Remote(other),
        }
    }
}

impl Reportable for AuthError {
    fn should_report(&self) -> bool {
        matches!(self, Self::Remote(_) | Self::Session(_))
    }
}
