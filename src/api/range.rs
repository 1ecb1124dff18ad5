//! A1-notation ranges, e.g. `'Expenses'!A1` or `'Expenses'!A5:ZZ`.

use anyhow::{bail, Context};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The last column we ever read or clear. Sheets rejects unbounded column ranges like `A5:`.
pub(crate) const LAST_COLUMN: usize = 701; // ZZ

/// A rectangular region of a worksheet that is either a single anchor cell (`A1`) or an
/// open-ended block running from a start cell down to the last row and across to `end_col`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub(crate) struct A1Range {
    tab: String,
    /// Zero-based column of the top-left cell.
    col: usize,
    /// Zero-based row of the top-left cell.
    row: usize,
    /// Zero-based last column, inclusive. `None` for an anchor cell.
    end_col: Option<usize>,
}

impl A1Range {
    /// The single cell at (`row`, `col`), used as the anchor of a write.
    pub(crate) fn cell(tab: impl Into<String>, row: usize, col: usize) -> Self {
        Self {
            tab: tab.into(),
            col,
            row,
            end_col: None,
        }
    }

    /// Everything from (`row`, `col`) to the bottom of the sheet and across to `end_col`.
    pub(crate) fn block(tab: impl Into<String>, row: usize, col: usize, end_col: usize) -> Self {
        Self {
            tab: tab.into(),
            col,
            row,
            end_col: Some(end_col),
        }
    }

    pub(crate) fn tab(&self) -> &str {
        &self.tab
    }

    pub(crate) fn row(&self) -> usize {
        self.row
    }

    pub(crate) fn col(&self) -> usize {
        self.col
    }

    pub(crate) fn end_col(&self) -> Option<usize> {
        self.end_col
    }
}

impl Display for A1Range {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}'!{}{}",
            self.tab.replace('\'', "''"),
            column_letters(self.col),
            self.row + 1
        )?;
        if let Some(end_col) = self.end_col {
            write!(f, ":{}", column_letters(end_col))?;
        }
        Ok(())
    }
}

impl FromStr for A1Range {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tab, cells) = s
            .rsplit_once('!')
            .with_context(|| format!("Range '{s}' has no sheet name"))?;
        let tab = match tab.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')) {
            Some(quoted) => quoted.replace("''", "'"),
            None => tab.to_string(),
        };

        let (start, end) = match cells.split_once(':') {
            Some((start, end)) => (start, Some(end)),
            None => (cells, None),
        };

        let letters: String = start.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
        let digits = &start[letters.len()..];
        let col = column_index(&letters)?;
        let row: usize = digits
            .parse()
            .with_context(|| format!("Invalid row in range '{s}'"))?;
        if row == 0 {
            bail!("Rows are numbered from 1 in range '{s}'");
        }

        let end_col = match end {
            Some(end) => {
                if !end.chars().all(|c| c.is_ascii_alphabetic()) {
                    bail!("Only whole-column range ends are supported, got '{s}'");
                }
                Some(column_index(end)?)
            }
            None => None,
        };

        Ok(Self {
            tab,
            col,
            row: row - 1,
            end_col,
        })
    }
}

/// Converts a zero-based column index to its letters: 0 -> A, 25 -> Z, 26 -> AA.
pub(crate) fn column_letters(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Converts column letters to a zero-based index: A -> 0, Z -> 25, AA -> 26.
pub(crate) fn column_index(letters: &str) -> crate::Result<usize> {
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        bail!("Invalid column letters '{letters}'");
    }
    let n = letters
        .to_ascii_uppercase()
        .bytes()
        .fold(0usize, |acc, b| acc * 26 + (b - b'A') as usize + 1);
    Ok(n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(3), "D");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(LAST_COLUMN), "ZZ");
    }

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A").unwrap(), 0);
        assert_eq!(column_index("e").unwrap(), 4);
        assert_eq!(column_index("AA").unwrap(), 26);
        assert_eq!(column_index("ZZ").unwrap(), LAST_COLUMN);
        assert!(column_index("").is_err());
        assert!(column_index("A1").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(A1Range::cell("Sheet1", 0, 0).to_string(), "'Sheet1'!A1");
        assert_eq!(
            A1Range::block("Sheet1", 4, 0, LAST_COLUMN).to_string(),
            "'Sheet1'!A5:ZZ"
        );
        assert_eq!(
            A1Range::block("Bob's Sheet", 0, 4, LAST_COLUMN).to_string(),
            "'Bob''s Sheet'!E1:ZZ"
        );
    }

    #[test]
    fn test_parse() {
        let range: A1Range = "'Bob''s Sheet'!E1:ZZ".parse().unwrap();
        assert_eq!(range, A1Range::block("Bob's Sheet", 0, 4, LAST_COLUMN));

        let range: A1Range = "Sheet1!A1".parse().unwrap();
        assert_eq!(range, A1Range::cell("Sheet1", 0, 0));
        assert_eq!(range.tab(), "Sheet1");
        assert_eq!(range.end_col(), None);
    }

    #[test]
    fn test_parse_invalid() {
        assert!("A1".parse::<A1Range>().is_err());
        assert!("Sheet1!A0".parse::<A1Range>().is_err());
        assert!("Sheet1!1".parse::<A1Range>().is_err());
        assert!("Sheet1!A1:B2".parse::<A1Range>().is_err());
    }

    #[test]
    fn test_roundtrip() {
        let range = A1Range::block("Gastos", 12, 0, LAST_COLUMN);
        let parsed: A1Range = range.to_string().parse().unwrap();
        assert_eq!(parsed, range);
        assert_eq!(parsed.row(), 12);
        assert_eq!(parsed.col(), 0);
    }
}
