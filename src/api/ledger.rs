//! The `Ledger` loads and saves the whole expense `Table` from one worksheet.

use crate::api::{A1Range, Sheet, SheetRange, LAST_COLUMN};
use crate::model::{DateOrder, Table, COLUMNS};
use crate::Result;
use anyhow::Context;
use tracing::{debug, warn};

/// Reads and overwrites the expense table held by a spreadsheet worksheet.
#[async_trait::async_trait]
pub trait Ledger {
    /// Fetches the table fresh from the store and normalizes every cell. This never fails: an
    /// unreachable store, an empty worksheet, or a malformed header all produce the empty table.
    async fn load(&mut self) -> Table;

    /// Replaces the whole worksheet with `table`. Any table kept from an earlier `load` is
    /// dropped before this returns, whether or not the write succeeded.
    async fn save(&mut self, table: &Table) -> Result<()>;
}

pub(crate) struct LedgerImpl {
    sheet: Box<dyn Sheet + Send>,
    tab: String,
    /// The table most recently returned by `load`, until the next `save`. `load` never reads it.
    snapshot: Option<Table>,
}

impl LedgerImpl {
    pub(crate) fn new(sheet: Box<dyn Sheet + Send>, tab: impl Into<String>) -> Self {
        Self {
            sheet,
            tab: tab.into(),
            snapshot: None,
        }
    }

    async fn fetch(&mut self) -> Table {
        let values = match self.sheet.get(&self.tab).await {
            Ok(values) => values,
            Err(e) => {
                warn!("Unable to read worksheet '{}', using an empty table: {e:#}", self.tab);
                return Table::empty();
            }
        };
        let order = match self.sheet.locale().await {
            Ok(locale) => DateOrder::from_locale(&locale),
            Err(e) => {
                warn!("Unable to read the spreadsheet locale, reading dates month first: {e:#}");
                DateOrder::default()
            }
        };
        match Table::from_sheet_in(&values, order) {
            Some(table) => table,
            None => {
                warn!(
                    "Worksheet '{}' is empty or its header has fewer than {COLUMNS} columns, \
                    using an empty table",
                    self.tab
                );
                Table::empty()
            }
        }
    }

    async fn write(&mut self, table: &Table) -> Result<()> {
        let values = table.to_sheet();
        let rows_written = values.len();
        let data = [SheetRange {
            range: A1Range::cell(&self.tab, 0, 0).to_string(),
            values,
        }];
        self.sheet
            .write_ranges(&data)
            .await
            .with_context(|| format!("Unable to write to worksheet '{}'", self.tab))?;

        // Everything below the rows just written and right of the persisted columns is stale.
        let below = A1Range::block(&self.tab, rows_written, 0, LAST_COLUMN).to_string();
        let right = A1Range::block(&self.tab, 0, COLUMNS, LAST_COLUMN).to_string();
        self.sheet
            .clear_ranges(&[below.as_str(), right.as_str()])
            .await
            .with_context(|| format!("Unable to clear stale cells in worksheet '{}'", self.tab))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Ledger for LedgerImpl {
    async fn load(&mut self) -> Table {
        let table = self.fetch().await;
        debug!("Loaded {} rows from worksheet '{}'", table.len(), self.tab);
        self.snapshot = Some(table.clone());
        table
    }

    async fn save(&mut self, table: &Table) -> Result<()> {
        let previous = self.snapshot.take();
        self.write(table).await?;
        match previous {
            Some(previous) => debug!(
                "Saved {} rows to worksheet '{}', replacing {} loaded rows",
                table.len(),
                self.tab,
                previous.len()
            ),
            None => debug!("Saved {} rows to worksheet '{}'", table.len(), self.tab),
        }
        Ok(())
    }
}
