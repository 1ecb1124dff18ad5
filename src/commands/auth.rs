//! The `expense auth` command: checks that the stored OAuth credentials still work.
//!
//! The first token comes from Google's installed-app consent flow, which happens outside of this
//! program. This command only refreshes the access token and never opens a browser.

use crate::api::TokenProvider;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// The outcome of a successful refresh.
#[derive(Debug, Clone, Serialize)]
pub struct AuthStatus {
    pub expires_at: DateTime<Utc>,
}

/// Loads the client secret and token, forces a refresh and saves the refreshed token.
///
/// # Errors
/// Returns an authentication error if either file is missing or invalid, if the token lacks the
/// spreadsheets scope, or if Google rejects the refresh.
pub async fn auth(config: &Config) -> Result<Out<AuthStatus>> {
    let mut token_provider = TokenProvider::load(config.client_secret_path(), config.token_path())
        .await
        .context(
            "Unable to use the stored OAuth credentials. Obtain a token for the spreadsheets \
            scope and place it at the token path in config.json.",
        )
        .pub_result(ErrorType::Auth)?;
    token_provider
        .refresh()
        .await
        .context("Unable to refresh the token")
        .pub_result(ErrorType::Auth)?;
    let expires_at = token_provider.expires_at();
    Ok(Out::new(
        format!("Your OAuth token is valid until {expires_at}"),
        AuthStatus { expires_at },
    ))
}
