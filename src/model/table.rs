use crate::model::expense::{COLUMNS, HEADERS};
use crate::model::{Amount, DateOrder, Expense};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// The whole expense sheet: every record, in display order. This is the unit of every read and
/// write against the store.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Expense>,
}

impl Table {
    /// The canonical empty table: the four columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(rows: Vec<Expense>) -> Self {
        Self { rows }
    }

    /// Interprets the values of a worksheet, header row first.
    ///
    /// Returns `None` when the worksheet is not a usable expense table: it has no rows, or its
    /// header row has fewer than four cells. Otherwise every data row is normalized.
    pub fn from_sheet<S, R>(values: impl IntoIterator<Item = R>) -> Option<Self>
    where
        S: AsRef<str>,
        R: AsRef<[S]>,
    {
        Self::from_sheet_in(values, DateOrder::default())
    }

    /// Like `from_sheet`, reading numeric dates in the spreadsheet locale's `order`.
    pub fn from_sheet_in<S, R>(
        values: impl IntoIterator<Item = R>,
        order: DateOrder,
    ) -> Option<Self>
    where
        S: AsRef<str>,
        R: AsRef<[S]>,
    {
        let mut rows = values.into_iter();
        let header = rows.next()?;
        if header.as_ref().len() < COLUMNS {
            return None;
        }
        let rows = rows
            .map(|row| Expense::from_cells_in(row.as_ref(), order))
            .collect();
        Some(Self { rows })
    }

    /// The worksheet values for this table, header row first.
    pub fn to_sheet(&self) -> Vec<Vec<String>> {
        std::iter::once(HEADERS.iter().map(|h| h.to_string()).collect())
            .chain(self.rows.iter().map(Expense::to_cells))
            .collect()
    }

    pub fn rows(&self) -> &[Expense] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends `expense` as the last row.
    pub fn push(&mut self, expense: Expense) {
        self.rows.push(expense);
    }

    /// The sum of every row's amount.
    pub fn total(&self) -> Amount {
        self.rows.iter().map(|e| &e.amount).sum()
    }

    /// Renders the table as an aligned text table with 1-based row numbers.
    pub fn render(&self) -> String {
        let numbered: Vec<Vec<String>> = self
            .rows
            .iter()
            .enumerate()
            .map(|(ix, expense)| {
                std::iter::once((ix + 1).to_string())
                    .chain(expense.to_cells())
                    .collect()
            })
            .collect();
        let header: Vec<String> = std::iter::once("#")
            .chain(HEADERS)
            .map(String::from)
            .collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for row in &numbered {
            for (ix, cell) in row.iter().enumerate() {
                widths[ix] = widths[ix].max(cell.chars().count());
            }
        }

        let mut out = String::new();
        for row in std::iter::once(&header).chain(numbered.iter()) {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect();
            let _ = writeln!(out, "{}", line.join("  ").trim_end());
        }
        out
    }
}

impl From<Vec<Expense>> for Table {
    fn from(rows: Vec<Expense>) -> Self {
        Self::new(rows)
    }
}

impl IntoIterator for Table {
    type Item = Expense;
    type IntoIter = std::vec::IntoIter<Expense>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
