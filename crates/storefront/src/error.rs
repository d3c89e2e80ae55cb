//! Unified error handling with Sentry integration.
//!
//! Module errors (`ApiError`, `CartError`, `AuthError`, ...) compose into
//! [`AppError`]. Errors with a server-side cause are captured to Sentry by
//! [`report`]; user-input errors are only logged. Every error maps to a
//! user-facing [`Notice`].

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::services::cart::CartError;
use crate::session::SessionError;

/// Message shown when the commerce API could not be reached or answered with
/// something other than a structured error.
pub const CONNECTIVITY_MESSAGE: &str =
    "Something went wrong. Check that the backend is running, reachable and returns valid JSON.";

/// An error that knows whether it belongs in Sentry.
pub trait Reportable: std::error::Error + 'static {
    /// Returns `true` if the error has a server-side cause worth capturing.
    fn should_report(&self) -> bool;
}

/// Log an error, capturing it to Sentry when it is reportable.
pub fn report(err: &impl Reportable) {
    if err.should_report() {
        let event_id = sentry::capture_error(err);
        tracing::error!(
            error = %err,
            sentry_event_id = %event_id,
            "Storefront error"
        );
    } else {
        tracing::warn!(error = %err, "Storefront operation refused");
    }
}

// =============================================================================
// AppError
// =============================================================================

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Commerce API operation failed.
    #[error("Commerce API error: {0}")]
    Api(#[from] ApiError),

    /// Cart operation failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Authentication operation failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Session store could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl Reportable for AppError {
    fn should_report(&self) -> bool {
        match self {
            Self::Api(err) => !err.is_client_error() && !err.is_connectivity(),
            Self::Cart(err) => err.should_report(),
            Self::Auth(err) => err.should_report(),
            Self::Session(_) => true,
            Self::Config(_) => false,
        }
    }
}

// =============================================================================
// Notices
// =============================================================================

/// How prominently a notice should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => f.write_str("info"),
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// A user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

impl From<&ApiError> for Notice {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::Api { status, message } if (400..500).contains(status) => {
                Self::error(message.clone())
            }
            ApiError::InvalidEndpoint(_) | ApiError::Client(_) => Self::error(err.to_string()),
            _ => Self::error(CONNECTIVITY_MESSAGE),
        }
    }
}

impl From<&CartError> for Notice {
    fn from(err: &CartError) -> Self {
        match err {
            _ if err.is_local() => Self::warning(err.to_string()),
            CartError::Connectivity { .. } => Self::error(CONNECTIVITY_MESSAGE),
            CartError::Remote(api) => Self::from(api),
            _ => Self::error(err.to_string()),
        }
    }
}

impl From<&AuthError> for Notice {
    fn from(err: &AuthError) -> Self {
        match err {
            AuthError::Connectivity { .. } => Self::error(CONNECTIVITY_MESSAGE),
            AuthError::Remote(api) => Self::from(api),
            AuthError::Rejected(_) | AuthError::Session(_) => Self::error(err.to_string()),
            _ => Self::warning(err.to_string()),
        }
    }
}

impl From<&AppError> for Notice {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::Api(api) => Self::from(api),
            AppError::Cart(cart) => Self::from(cart),
            AppError::Auth(auth) => Self::from(auth),
            AppError::Session(_) | AppError::Config(_) => Self::error(err.to_string()),
        }
    }
}

// =============================================================================
// Sentry context
// =============================================================================

/// Set the Sentry user context from the logged-in username.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Set quantity of iPhone XR to 2", Some(&[("product_id", "p1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
