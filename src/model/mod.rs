//! Types that represent the core data model: an `Expense` row and the `Table` of all rows.
mod amount;
mod category;
mod date;
mod expense;
mod table;

pub use amount::{Amount, AmountError};
pub use category::{Category, CategoryLabel};
pub use date::{coerce_date, coerce_date_in, format_date, DateOrder, DATE_FORMAT};
pub use expense::{Expense, COLUMNS, HEADERS};
pub use table::Table;
