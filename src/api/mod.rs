//! Access to the spreadsheet that stores the expenses.
//!
//! The low-level `Sheet` trait reads and writes raw cell values; `GoogleSheet` implements it
//! against Google Sheets and `TestSheet` implements it in memory. The `Ledger` trait sits on top
//! and speaks in whole `Table`s.

mod files;
mod google_sheet;
mod ledger;
mod range;
mod test_sheet;
mod token;

use crate::{Config, Result};
use google_sheet::GoogleSheet;
use serde::{Deserialize, Serialize};

pub use ledger::Ledger;
pub(crate) use ledger::LedgerImpl;
pub(crate) use range::{A1Range, LAST_COLUMN};
pub(crate) use test_sheet::{TestSheet, TestSheetState};
pub(crate) use token::TokenProvider;

/// OAuth scopes required for reading and writing the spreadsheet.
const OAUTH_SCOPES: &[&str] = &["https://www.googleapis.com/auth/spreadsheets"];

/// The environment variable that, when set and non-empty, swaps Google Sheets for the in-memory
/// `TestSheet`.
pub const TEST_MODE_ENV: &str = "EXPENSE_SHEET_IN_TEST_MODE";

/// Whether we are talking to a real Google sheet or to an in-memory one.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Google,
    Testing,
}

serde_plain::derive_display_from_serialize!(Mode);
serde_plain::derive_fromstr_from_deserialize!(Mode);

impl Mode {
    /// `Mode::Testing` when `EXPENSE_SHEET_IN_TEST_MODE` is set to something non-empty,
    /// otherwise `Mode::Google`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Testing,
            _ => Mode::Google,
        }
    }
}

/// Values to be written starting at the anchor cell of `range`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct SheetRange {
    pub(crate) range: String,
    pub(crate) values: Vec<Vec<String>>,
}

/// The raw operations we need from a spreadsheet.
#[async_trait::async_trait]
pub(crate) trait Sheet {
    /// Gets every populated row of the worksheet `tab` as formatted strings.
    async fn get(&mut self, tab: &str) -> Result<Vec<Vec<String>>>;

    /// The spreadsheet's locale, e.g. `en_US` or `pt_BR`, which decides how Sheets formats
    /// values that were typed into the sheet by hand. Empty when unknown.
    async fn locale(&mut self) -> Result<String>;

    /// Clears the values in each of `ranges`.
    async fn clear_ranges(&mut self, ranges: &[&str]) -> Result<()>;

    /// Writes each `SheetRange` in a single batch. Values are stored verbatim, never interpreted
    /// as formulas, numbers or dates.
    async fn write_ranges(&mut self, data: &[SheetRange]) -> Result<()>;
}

/// Creates the `Sheet` for `mode`. In `Mode::Google` this loads and refreshes the OAuth token.
pub(crate) async fn sheet(config: &Config, mode: Mode) -> Result<Box<dyn Sheet + Send>> {
    match mode {
        Mode::Google => {
            let token_provider =
                TokenProvider::load(config.client_secret_path(), config.token_path()).await?;
            let sheet = GoogleSheet::new(config.spreadsheet_id(), token_provider).await?;
            Ok(Box::new(sheet))
        }
        Mode::Testing => Ok(Box::new(TestSheet::new(config.spreadsheet_id()))),
    }
}

/// Creates the `Ledger` for the configured worksheet.
pub async fn ledger(config: &Config, mode: Mode) -> Result<Box<dyn Ledger + Send>> {
    let sheet = sheet(config, mode).await?;
    Ok(Box::new(LedgerImpl::new(sheet, config.worksheet())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_strings() {
        assert_eq!(Mode::Google.to_string(), "google");
        assert_eq!("testing".parse::<Mode>().unwrap(), Mode::Testing);
    }
}
