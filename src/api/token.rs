//! Keeps the OAuth access token fresh.
//!
//! The first token is obtained outside of this program (any installed-app OAuth flow that
//! requests the spreadsheets scope will do) and placed in `token.json`. From there the
//! `TokenProvider` uses the refresh token to get new access tokens as they expire.

use crate::api::files::{SecretFile, TokenFile};
use crate::Result;
use anyhow::Context;
use chrono::{Duration, Utc};
use oauth2::basic::BasicClient;
use oauth2::{AuthUrl, ClientId, ClientSecret, RefreshToken, TokenResponse, TokenUrl};
use std::path::PathBuf;
use tracing::debug;

/// Google access tokens last an hour; used when the refresh response omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Owns the client secret and the token file, refreshing and persisting the token as needed.
pub(crate) struct TokenProvider {
    secret: SecretFile,
    token: TokenFile,
    token_path: PathBuf,
}

impl TokenProvider {
    /// Loads the client secret and token files.
    pub(crate) async fn load(
        client_secret_path: impl Into<PathBuf>,
        token_path: impl Into<PathBuf>,
    ) -> Result<Self> {
        let client_secret_path = client_secret_path.into();
        let token_path = token_path.into();
        let secret = SecretFile::load(&client_secret_path).await.with_context(|| {
            format!(
                "Unable to load the OAuth client secret at {}",
                client_secret_path.display()
            )
        })?;
        let token = TokenFile::load(&token_path).await.with_context(|| {
            format!("Unable to load the OAuth token at {}", token_path.display())
        })?;
        Ok(Self {
            secret,
            token,
            token_path,
        })
    }

    /// The current access token, without checking whether it has expired.
    pub(crate) fn token(&self) -> &str {
        self.token.access_token()
    }

    /// The current access token, refreshed first if it has expired or is about to.
    pub(crate) async fn token_with_refresh(&mut self) -> Result<&str> {
        if self.token.is_expired(Utc::now()) {
            self.refresh().await?;
        }
        Ok(self.token())
    }

    /// Exchanges the refresh token for a new access token and saves it to the token file.
    pub(crate) async fn refresh(&mut self) -> Result<()> {
        debug!("Refreshing the OAuth access token");
        let client = BasicClient::new(ClientId::new(self.secret.client_id().to_string()))
            .set_client_secret(ClientSecret::new(self.secret.client_secret().to_string()))
            .set_auth_uri(
                AuthUrl::new(self.secret.auth_uri().to_string())
                    .context("Invalid auth_uri in the client secret file")?,
            )
            .set_token_uri(
                TokenUrl::new(self.secret.token_uri().to_string())
                    .context("Invalid token_uri in the client secret file")?,
            );

        let http_client = reqwest::ClientBuilder::new()
            // Following redirects opens the client up to SSRF vulnerabilities.
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("Unable to create the HTTP client")?;

        let response = client
            .exchange_refresh_token(&RefreshToken::new(self.token.refresh_token().to_string()))
            .request_async(&http_client)
            .await
            .context("Google rejected the token refresh request")?;

        let lifetime = response
            .expires_in()
            .and_then(|d| Duration::from_std(d).ok())
            .unwrap_or_else(|| Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS));
        let expires_at = Utc::now() + lifetime;

        self.token.update(
            response.access_token().secret().to_string(),
            response.refresh_token().map(|t| t.secret().to_string()),
            expires_at,
        );
        self.token.save(&self.token_path).await?;
        debug!("OAuth access token valid until {expires_at}");
        Ok(())
    }

    /// When the current access token expires.
    pub(crate) fn expires_at(&self) -> chrono::DateTime<Utc> {
        self.token.expires_at()
    }
}
