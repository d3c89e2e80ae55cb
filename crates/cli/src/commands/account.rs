//! Login, registration and logout.

use cartlane_storefront::error::Notice;
use cartlane_storefront::services::auth::{self, AuthService};
use cartlane_storefront::state::AppState;
use secrecy::SecretString;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::CommandError;
use crate::render;

/// Log in and store the session.
pub async fn login(
    state: &AppState,
    username: &str,
    password: Option<String>,
) -> Result<(), CommandError> {
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let password = match password {
        Some(password) => password,
        None => prompt(&mut input, "Password").await?,
    };

    let mut store = state.session_store();
    let session = AuthService::new(state.client())
        .login(&mut store, username, &SecretString::from(password))
        .await?;

    render::notice(&Notice::info("Logged in successfully"));
    render::session(&session);
    Ok(())
}

/// Create an account. The user logs in separately afterwards.
pub async fn register(
    state: &AppState,
    username: &str,
    password: Option<String>,
    confirm: Option<String>,
) -> Result<(), CommandError> {
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let password = match password {
        Some(password) => password,
        None => prompt(&mut input, "Password").await?,
    };
    let confirm = match confirm {
        Some(confirm) => confirm,
        None => prompt(&mut input, "Confirm password").await?,
    };

    AuthService::new(state.client())
        .register(
            username,
            &SecretString::from(password),
            &SecretString::from(confirm),
        )
        .await?;

    render::notice(&Notice::info("Registered successfully"));
    Ok(())
}

/// Clear the stored session.
pub fn logout(state: &AppState) -> Result<(), CommandError> {
    auth::logout(&mut state.session_store())?;
    render::notice(&Notice::info("Logged out"));
    Ok(())
}

/// Show the stored session.
pub fn whoami(state: &AppState) -> Result<(), CommandError> {
    let session = auth::current_session(&state.session_store())?;
    render::session(&session);
    Ok(())
}

async fn prompt<R>(
    input: &mut tokio::io::Lines<R>,
    label: &str,
) -> Result<String, CommandError>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    render::prompt(label);
    Ok(input.next_line().await?.unwrap_or_default())
}
