//! Command implementations.

pub mod account;
pub mod cart;
pub mod catalog;

use cartlane_storefront::api::ApiError;
use cartlane_storefront::config::ConfigError;
use cartlane_storefront::error::AppError;
use cartlane_storefront::services::auth::AuthError;
use cartlane_storefront::services::cart::CartError;
use cartlane_storefront::session::SessionError;
use thiserror::Error;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    App(#[from] AppError),

    /// Reading interactive input failed.
    #[error("Failed to read input: {0}")]
    Input(#[from] std::io::Error),
}

macro_rules! from_app_error {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for CommandError {
                fn from(err: $source) -> Self {
                    Self::App(err.into())
                }
            }
        )*
    };
}

from_app_error!(ApiError, CartError, AuthError, SessionError, ConfigError);
