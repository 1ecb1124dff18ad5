//! Implements the very simple `Sheet` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the
//! whole app, top-to-bottom, without using Google Sheets.
//!
//! State is process-global and keyed by spreadsheet id, so every `TestSheet` created for the same
//! config sees the same data, and tests using different ids never see each other's data.

use crate::api::{A1Range, Sheet, SheetRange};
use crate::Result;
use anyhow::{bail, Context};
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

static STATE: LazyLock<Mutex<HashMap<String, TestSheetState>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// The contents of one in-memory spreadsheet plus switches to simulate an unreachable store.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub(crate) struct TestSheetState {
    /// The rows of each worksheet, keyed by worksheet name.
    pub(crate) tabs: HashMap<String, Vec<Vec<String>>>,
    /// When true, every `get` fails.
    pub(crate) fail_reads: bool,
    /// When true, every `clear_ranges` and `write_ranges` fails.
    pub(crate) fail_writes: bool,
    /// The spreadsheet locale reported by `locale`.
    pub(crate) locale: String,
}

impl TestSheetState {
    /// A state with a single worksheet holding `rows`.
    pub(crate) fn with_tab(tab: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        let mut tabs = HashMap::new();
        tabs.insert(tab.into(), rows);
        Self {
            tabs,
            ..Default::default()
        }
    }
}

/// An implementation of the `Sheet` trait that does not use Google sheets.
pub(crate) struct TestSheet {
    spreadsheet_id: String,
}

impl TestSheet {
    pub(crate) fn new(spreadsheet_id: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
        }
    }

    /// A copy of the current state. A spreadsheet that was never written is the default state.
    pub(crate) fn get_state(&self) -> TestSheetState {
        lock()
            .get(&self.spreadsheet_id)
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn set_state(&self, state: TestSheetState) {
        lock().insert(self.spreadsheet_id.clone(), state);
    }

    /// Runs `f` against this spreadsheet's state, creating the state if needed.
    fn with_state<T>(&self, f: impl FnOnce(&mut TestSheetState) -> Result<T>) -> Result<T> {
        let mut map = lock();
        let state = map.entry(self.spreadsheet_id.clone()).or_default();
        f(state)
    }
}

fn lock() -> std::sync::MutexGuard<'static, HashMap<String, TestSheetState>> {
    // A test that panicked while holding the lock cannot leave the map half-updated, so the
    // poisoned data is still usable.
    STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait::async_trait]
impl Sheet for TestSheet {
    async fn get(&mut self, tab: &str) -> Result<Vec<Vec<String>>> {
        let map = lock();
        let state = map
            .get(&self.spreadsheet_id)
            .with_context(|| format!("Spreadsheet '{}' not found", self.spreadsheet_id))?;
        if state.fail_reads {
            bail!("Simulated read failure");
        }
        state
            .tabs
            .get(tab)
            .with_context(|| format!("Sheet '{tab}' not found"))
            .cloned()
    }

    async fn locale(&mut self) -> Result<String> {
        let map = lock();
        let state = map
            .get(&self.spreadsheet_id)
            .with_context(|| format!("Spreadsheet '{}' not found", self.spreadsheet_id))?;
        if state.fail_reads {
            bail!("Simulated read failure");
        }
        Ok(state.locale.clone())
    }

    async fn clear_ranges(&mut self, ranges: &[&str]) -> Result<()> {
        let ranges = ranges
            .iter()
            .map(|r| r.parse::<A1Range>())
            .collect::<Result<Vec<_>>>()?;
        self.with_state(|state| {
            if state.fail_writes {
                bail!("Simulated write failure");
            }
            for range in ranges {
                let rows = state.tabs.entry(range.tab().to_string()).or_default();
                clear(rows, &range);
            }
            Ok(())
        })
    }

    async fn write_ranges(&mut self, data: &[SheetRange]) -> Result<()> {
        let writes = data
            .iter()
            .map(|sr| Ok((sr.range.parse::<A1Range>()?, &sr.values)))
            .collect::<Result<Vec<_>>>()?;
        self.with_state(|state| {
            if state.fail_writes {
                bail!("Simulated write failure");
            }
            for (range, values) in writes {
                let rows = state.tabs.entry(range.tab().to_string()).or_default();
                write(rows, &range, values);
            }
            Ok(())
        })
    }
}

/// Blanks the cells of `range`, then trims trailing empty cells and rows the way the Sheets API
/// leaves them out of `get` responses.
fn clear(rows: &mut Vec<Vec<String>>, range: &A1Range) {
    let end_col = range.end_col().unwrap_or(range.col());
    for row in rows.iter_mut().skip(range.row()) {
        for col in range.col()..=end_col.min(row.len().saturating_sub(1)) {
            if let Some(cell) = row.get_mut(col) {
                cell.clear();
            }
        }
        while row.last().is_some_and(|c| c.is_empty()) {
            row.pop();
        }
    }
    while rows.last().is_some_and(|r| r.is_empty()) {
        rows.pop();
    }
}

/// Writes `values` with their top-left corner at the anchor cell of `range`.
fn write(rows: &mut Vec<Vec<String>>, range: &A1Range, values: &[Vec<String>]) {
    for (row_offset, new_row) in values.iter().enumerate() {
        let row_ix = range.row() + row_offset;
        if rows.len() <= row_ix {
            rows.resize(row_ix + 1, Vec::new());
        }
        let row = &mut rows[row_ix];
        for (col_offset, value) in new_row.iter().enumerate() {
            let col_ix = range.col() + col_offset;
            if row.len() <= col_ix {
                row.resize(col_ix + 1, String::new());
            }
            row[col_ix] = value.clone();
        }
    }
}
