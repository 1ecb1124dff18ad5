//! Command handlers for the expense CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod add;
mod auth;
mod categories;
mod delete;
mod edit;
mod grid;
mod init;
mod list;
mod report;

use crate::api::{self, Ledger, Mode};
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::Debug;
use std::io::Write;
use tracing::{debug, info, warn};

pub use add::add;
pub use auth::{auth, AuthStatus};
pub use categories::categories;
pub use delete::delete;
pub use edit::edit;
pub use grid::{apply, export};
pub use init::init;
pub use list::list;
pub use report::report;

/// The output type for a command. This allows the command to return a consistent message,
/// optionally structured data, and optionally a rendering meant for stdout.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,

    /// Text for stdout, e.g. a table or a CSV document.
    #[serde(skip)]
    display: Option<String>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
            display: None,
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
            display: None,
        }
    }

    /// Adds text that `print` writes to stdout.
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Get the text meant for stdout.
    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    /// Print the display text to stdout, the message to `info!` and the structured data (if it
    /// exists) as JSON to `debug!`.
    pub fn print(&self) {
        if let Some(display) = self.display() {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = stdout
                .write_all(display.as_bytes())
                .and_then(|_| stdout.flush())
            {
                warn!("Unable to write to stdout: {e}");
            }
        }
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Opens the ledger for the configured worksheet. In `Mode::Google` this is where the OAuth
/// token gets loaded and refreshed, so failures are authentication errors.
async fn open_ledger(config: &Config, mode: Mode) -> Result<Box<dyn Ledger + Send>> {
    api::ledger(config, mode).await.pub_result(ErrorType::Auth)
}

/// Writes `table` back in full, tagging failures as store errors.
async fn save(ledger: &mut (dyn Ledger + Send), table: &crate::model::Table) -> Result<()> {
    ledger.save(table).await.pub_result(ErrorType::Store)
}

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{count} {}", if count == 1 { one } else { many })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_message() {
        let out: Out<()> = "done".into();
        assert_eq!(out.message(), "done");
        assert!(out.structure().is_none());
        assert!(out.display().is_none());
    }

    #[test]
    fn test_out_serializes_without_display() {
        let out = Out::new("two", vec![1, 2]).with_display("1\n2\n");
        assert_eq!(out.display(), Some("1\n2\n"));
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["message"], "two");
        assert_eq!(json["structure"], serde_json::json!([1, 2]));
        assert!(json.get("display").is_none());
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "row", "rows"), "1 row");
        assert_eq!(plural(0, "row", "rows"), "0 rows");
    }
}
