use crate::args::InitArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory, its `.secrets` subdirectory and:
/// - Creates an initial `config.json` file using the sheet URL and worksheet name
/// - Copies the client secret, and the token if one is given, into `.secrets`
///
/// # Arguments
/// - `home` - The directory that will be the home directory, e.g. `$HOME/expenses`
/// - `args` - The sheet URL, worksheet name and the paths of the OAuth credential files.
///
/// # Errors
/// - Returns an error if the sheet URL is invalid or any file operations fail.
pub async fn init(home: &Path, args: &InitArgs) -> Result<Out<()>> {
    let config = Config::create(
        home,
        args.client_secret(),
        args.token(),
        args.sheet_url(),
        args.worksheet(),
    )
    .await
    .context("Unable to create the home directory and configs")
    .pub_result(ErrorType::Config)?;

    let mut message = format!(
        "Successfully created the expense directory and config at {}",
        config.root().display()
    );
    if args.token().is_none() {
        message.push_str(&format!(
            ". Place your OAuth token at {} before using the sheet",
            config.token_path().display()
        ));
    }
    Ok(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_type;
    use crate::utils;
    use tempfile::TempDir;

    const URL: &str = "https://docs.google.com/spreadsheets/d/abc123/edit";

    #[tokio::test]
    async fn test_init() {
        let dir = TempDir::new().unwrap();
        let secret = dir.path().join("secret.json");
        let token = dir.path().join("token.json");
        utils::write(&secret, "{}").await.unwrap();
        utils::write(&token, "{}").await.unwrap();
        let home = dir.path().join("home");

        let args = InitArgs::new(URL, &secret, Some(token), "Gastos");
        let out = init(&home, &args).await.unwrap();
        assert!(out.message().contains("Successfully created"));
        assert!(!out.message().contains("Place your OAuth token"));

        let config = Config::load(&home).await.unwrap();
        assert_eq!(config.spreadsheet_id(), "abc123");
        assert_eq!(config.worksheet(), "Gastos");
        assert!(config.token_path().is_file());
    }

    #[tokio::test]
    async fn test_init_without_token() {
        let dir = TempDir::new().unwrap();
        let secret = dir.path().join("secret.json");
        utils::write(&secret, "{}").await.unwrap();
        let args = InitArgs::new(URL, &secret, None, "Sheet1");
        let out = init(&dir.path().join("home"), &args).await.unwrap();
        assert!(out.message().contains("Place your OAuth token"));
    }

    #[tokio::test]
    async fn test_init_missing_secret() {
        let dir = TempDir::new().unwrap();
        let args = InitArgs::new(URL, dir.path().join("nope.json"), None, "Sheet1");
        let err = init(&dir.path().join("home"), &args).await.unwrap_err();
        assert_eq!(error_type(&err), Some(ErrorType::Config));
    }
}
