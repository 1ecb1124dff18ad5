//! The edit grid: the displayed table with an extra `Delete` column that marks rows for removal.
//!
//! The marker only lives here. Both ways out of the grid, `save_edits` and `delete_marked`,
//! produce a plain `Table` that is then written back in full.

use crate::model::{Expense, Table, HEADERS};
use crate::Result;
use anyhow::{bail, Context};
use std::io::{Read, Write};

/// The header of the marker column.
pub const DELETE_HEADER: &str = "Delete";

#[derive(Debug, Default, Clone, Eq, PartialEq)]
struct GridRow {
    delete: bool,
    expense: Expense,
}

/// A `Table` plus a boolean `Delete` marker per row.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct EditGrid {
    rows: Vec<GridRow>,
}

impl EditGrid {
    /// A grid over `table` with no row marked.
    pub fn new(table: &Table) -> Self {
        Self {
            rows: table
                .rows()
                .iter()
                .map(|expense| GridRow {
                    delete: false,
                    expense: expense.clone(),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Marks the 1-based `row` for deletion.
    pub fn mark(&mut self, row: usize) -> Result<()> {
        self.row_mut(row)?.delete = true;
        Ok(())
    }

    /// The rows currently marked for deletion, 1-based.
    pub fn marked(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.delete)
            .map(|(ix, _)| ix + 1)
            .collect()
    }

    /// The expense in the 1-based `row`, for editing in place.
    pub fn expense_mut(&mut self, row: usize) -> Result<&mut Expense> {
        Ok(&mut self.row_mut(row)?.expense)
    }

    fn row_mut(&mut self, row: usize) -> Result<&mut GridRow> {
        let len = self.rows.len();
        match row.checked_sub(1).and_then(|ix| self.rows.get_mut(ix)) {
            Some(grid_row) => Ok(grid_row),
            None => bail!("Row {row} does not exist, the table has {len} rows"),
        }
    }

    /// Keeps only the unmarked rows and drops the marker.
    pub fn delete_marked(self) -> Table {
        self.rows
            .into_iter()
            .filter(|r| !r.delete)
            .map(|r| r.expense)
            .collect::<Vec<_>>()
            .into()
    }

    /// Drops the marker from every row, keeping marked rows too.
    pub fn save_edits(self) -> Table {
        self.rows
            .into_iter()
            .map(|r| r.expense)
            .collect::<Vec<_>>()
            .into()
    }

    /// Writes the grid as CSV: a header row, then one row per expense with the `Delete` column
    /// first.
    pub fn write_csv<W: Write>(&self, w: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(w);
        let header: Vec<&str> = std::iter::once(DELETE_HEADER).chain(HEADERS).collect();
        writer
            .write_record(&header)
            .context("Unable to write the grid header")?;
        for row in &self.rows {
            let record: Vec<String> = std::iter::once(row.delete.to_string())
                .chain(row.expense.to_cells())
                .collect();
            writer
                .write_record(&record)
                .context("Unable to write a grid row")?;
        }
        writer.flush().context("Unable to flush the grid")?;
        Ok(())
    }

    /// Reads a grid written by `write_csv` and then edited by hand. Rows may have been edited,
    /// added, removed or reordered. Cells are coerced the same way store cells are; only a
    /// `Delete` cell that cannot be read as a yes or no is an error.
    pub fn read_csv<R: Read>(r: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(r);
        let mut records = reader.records();

        let header = match records.next() {
            Some(header) => header.context("Unable to read the grid header")?,
            None => bail!("The grid is empty, expected a header row"),
        };
        if !header
            .get(0)
            .is_some_and(|h| h.eq_ignore_ascii_case(DELETE_HEADER))
        {
            bail!("The first column of the grid must be '{DELETE_HEADER}'");
        }

        let mut rows = Vec::new();
        for (ix, record) in records.enumerate() {
            // Line 1 is the header.
            let line = ix + 2;
            let record = record.with_context(|| format!("Unable to read grid line {line}"))?;
            let delete = parse_flag(record.get(0).unwrap_or_default())
                .with_context(|| format!("Invalid '{DELETE_HEADER}' value on grid line {line}"))?;
            let cells: Vec<&str> = record.iter().skip(1).collect();
            rows.push(GridRow {
                delete,
                expense: Expense::from_cells(&cells),
            });
        }
        Ok(Self { rows })
    }
}

/// Reads a `Delete` cell. Blank means not marked.
fn parse_flag(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "x" => Ok(true),
        "false" | "no" | "n" | "0" | "" => Ok(false),
        other => bail!("Expected true or false, got '{other}'"),
    }
}
