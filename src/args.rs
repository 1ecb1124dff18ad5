//! These structs provide the CLI interface for the expense CLI.

use crate::model::{coerce_date, Amount, Category};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// expense: record, review and edit your personal expenses in a Google sheet.
///
/// Every expense is one row of a worksheet with four columns: Date, Category, Amount and
/// Description. Each command reads the whole worksheet, and commands that change anything write
/// the whole worksheet back.
///
/// You will need a Google OAuth client secret and a token for the spreadsheets scope. Run
/// `expense init` once to put them, and the URL of your sheet, into the expense home directory.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and initialize the configuration files.
    ///
    /// This is the first command you should run. You need a few things ready beforehand:
    ///
    /// - The URL of your Google Sheet, passed as --sheet-url.
    ///
    /// - The OAuth 2.0 client credentials downloaded from Google Cloud Console, passed as
    ///   --client-secret.
    ///
    /// - A token.json holding an access and refresh token for the spreadsheets scope, passed as
    ///   --token. If you do not have it yet, you can place it in $EXPENSE_HOME/.secrets later.
    Init(InitArgs),
    /// Refresh the OAuth access token and report how long it is valid.
    Auth,
    /// Append an expense as the last row of the sheet.
    Add(AddArgs),
    /// Print every expense with its row number.
    List(ListArgs),
    /// Print the total spent and its breakdown by category.
    Report(ReportArgs),
    /// Change cells of one row.
    Edit(EditArgs),
    /// Delete one or more rows.
    Delete(DeleteArgs),
    /// Write the sheet as an editable CSV grid with a leading Delete column.
    Export(ExportArgs),
    /// Write an edited CSV grid back to the sheet.
    Apply(ApplyArgs),
    /// Print the categories an expense can be registered under.
    Categories,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber EnvFilter for the syntax.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where configuration and credentials are held. Defaults to ~/expenses
    #[arg(long, env = "EXPENSE_HOME", default_value_t = default_expense_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `expense init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The URL of your Google sheet. It looks like this:
    /// https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX
    #[arg(long)]
    sheet_url: String,

    /// The path to your downloaded OAuth client credentials. This file will be copied to the
    /// default secrets location in the home directory.
    #[arg(long)]
    client_secret: PathBuf,

    /// The path to an OAuth token file for the spreadsheets scope. It will be copied next to the
    /// client secret.
    #[arg(long)]
    token: Option<PathBuf>,

    /// The worksheet (tab) that holds the expenses.
    #[arg(long, default_value = crate::config::DEFAULT_WORKSHEET)]
    worksheet: String,
}

impl InitArgs {
    pub fn new(
        sheet_url: impl Into<String>,
        client_secret: impl Into<PathBuf>,
        token: Option<PathBuf>,
        worksheet: impl Into<String>,
    ) -> Self {
        Self {
            sheet_url: sheet_url.into(),
            client_secret: client_secret.into(),
            token,
            worksheet: worksheet.into(),
        }
    }

    pub fn sheet_url(&self) -> &str {
        &self.sheet_url
    }

    pub fn client_secret(&self) -> &Path {
        &self.client_secret
    }

    pub fn token(&self) -> Option<&Path> {
        self.token.as_deref()
    }

    pub fn worksheet(&self) -> &str {
        &self.worksheet
    }
}

/// Args for the `expense add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The category, e.g. Food or "Shopping/Apparel". Case does not matter and the part before
    /// the slash is enough.
    #[arg(long)]
    category: Category,

    /// The amount spent. Must be at least 0.01 and is rounded to two decimal places.
    #[arg(long)]
    amount: Amount,

    /// The date of the expense, e.g. 2024-01-15. Defaults to today.
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// A free-text description.
    #[arg(long, default_value = "")]
    description: String,
}

impl AddArgs {
    pub fn new(
        category: Category,
        amount: Amount,
        date: Option<NaiveDate>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category,
            amount,
            date,
            description: description.into(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// How `expense list` prints the table.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ListFormat {
    /// Aligned columns with row numbers.
    #[default]
    Table,
    /// The four sheet columns as CSV.
    Csv,
    /// A JSON array of expenses.
    Json,
}

serde_plain::derive_display_from_serialize!(ListFormat);

/// Args for the `expense list` command.
#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    #[arg(long, value_enum, default_value_t = ListFormat::Table)]
    format: ListFormat,
}

impl ListArgs {
    pub fn new(format: ListFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> ListFormat {
        self.format
    }
}

/// How `expense report` prints the summary.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// The total and a bar chart of the breakdown.
    #[default]
    Text,
    /// The total and breakdown as JSON.
    Json,
}

serde_plain::derive_display_from_serialize!(ReportFormat);

/// Args for the `expense report` command.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
}

impl ReportArgs {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }
}

/// Args for the `expense edit` command. Only the cells you pass are changed.
#[derive(Debug, Parser, Clone)]
pub struct EditArgs {
    /// The row number shown by `expense list`.
    #[arg(long)]
    row: usize,

    /// The new date.
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// The new category.
    #[arg(long)]
    category: Option<Category>,

    /// The new amount. Unlike `add`, zero and negative amounts are allowed here.
    #[arg(long, allow_hyphen_values = true)]
    amount: Option<Amount>,

    /// The new description.
    #[arg(long)]
    description: Option<String>,
}

impl EditArgs {
    pub fn new(row: usize) -> Self {
        Self {
            row,
            date: None,
            category: None,
            amount: None,
            description: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn amount(&self) -> Option<Amount> {
        self.amount
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// True when no cell would change.
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.category.is_none()
            && self.amount.is_none()
            && self.description.is_none()
    }
}

/// Args for the `expense delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// A row number shown by `expense list`. Repeat to delete several rows at once.
    #[arg(long = "row", required = true)]
    rows: Vec<usize>,
}

impl DeleteArgs {
    pub fn new(rows: Vec<usize>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }
}

/// Args for the `expense export` command.
#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    /// Where to write the grid. Defaults to stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

impl ExportArgs {
    pub fn new(output: Option<PathBuf>) -> Self {
        Self { output }
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}

/// What `expense apply` does with the grid.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ApplyAction {
    /// Write every row, ignoring the Delete column.
    #[default]
    Save,
    /// Write only the rows not marked in the Delete column.
    DeleteMarked,
}

serde_plain::derive_display_from_serialize!(ApplyAction);

/// Args for the `expense apply` command.
#[derive(Debug, Parser, Clone)]
pub struct ApplyArgs {
    /// A grid written by `expense export` and then edited.
    file: PathBuf,

    #[arg(long, value_enum, default_value_t = ApplyAction::Save)]
    action: ApplyAction,
}

impl ApplyArgs {
    pub fn new(file: impl Into<PathBuf>, action: ApplyAction) -> Self {
        Self {
            file: file.into(),
            action,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn action(&self) -> ApplyAction {
        self.action
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    coerce_date(s).ok_or_else(|| format!("'{s}' is not a date, expected e.g. 2024-01-15"))
}

fn default_expense_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("expenses"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or EXPENSE_HOME instead of relying on the default \
                expense home directory. If you continue using the program right now, you may \
                have problems!",
            );
            PathBuf::from("expenses")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
