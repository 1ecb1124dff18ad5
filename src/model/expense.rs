use crate::model::date::{coerce_date_in, format_date, DateOrder};
use crate::model::{Amount, Category, CategoryLabel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The column headers of the expense sheet, in their fixed positional order.
pub const HEADERS: [&str; 4] = ["Date", "Category", "Amount", "Description"];

/// The number of columns that are read from and written to the sheet.
pub const COLUMNS: usize = HEADERS.len();

const DATE: usize = 0;
const CATEGORY: usize = 1;
const AMOUNT: usize = 2;
const DESCRIPTION: usize = 3;

/// One row of the expense sheet.
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Expense {
    /// `None` when the cell was empty or could not be read as a date.
    pub date: Option<NaiveDate>,
    pub category: CategoryLabel,
    pub amount: Amount,
    pub description: String,
}

impl Expense {
    pub fn new(
        date: NaiveDate,
        category: Category,
        amount: Amount,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date: Some(date),
            category: category.into(),
            amount,
            description: description.into(),
        }
    }

    /// Builds an `Expense` from the cells of one sheet row, coercing each cell to its column's
    /// type. Missing cells are treated as empty and cells past the fourth column are ignored.
    pub fn from_cells<S: AsRef<str>>(cells: &[S]) -> Self {
        Self::from_cells_in(cells, DateOrder::default())
    }

    /// Like `from_cells`, reading numeric dates such as `05/01/2024` in `order`.
    pub fn from_cells_in<S: AsRef<str>>(cells: &[S], order: DateOrder) -> Self {
        let cell = |ix: usize| cells.get(ix).map(|s| s.as_ref()).unwrap_or_default();
        Self {
            date: coerce_date_in(cell(DATE), order),
            category: CategoryLabel::from_cell(cell(CATEGORY)),
            amount: Amount::coerce(cell(AMOUNT)),
            description: cell(DESCRIPTION).to_string(),
        }
    }

    /// Renders the expense as the four cells written to the sheet.
    pub fn to_cells(&self) -> Vec<String> {
        vec![
            format_date(self.date),
            self.category.to_string(),
            self.amount.to_string(),
            self.description.clone(),
        ]
    }
}
