//! Date coercion for the `Date` column.
//!
//! Dates are written as `YYYY-MM-DD` text, but people also type dates into the sheet by hand and
//! Sheets hands those back in the spreadsheet's locale format (`1/15/2024` in the US, `15/01/2024`
//! in Brazil), so reading accepts a handful of common layouts. Anything else becomes an unset
//! date.

use chrono::{NaiveDate, NaiveDateTime};

/// The canonical written form of a date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Layouts that are the same in every locale.
const ISO_LAYOUTS: &[&str] = &[DATE_FORMAT, "%Y/%m/%d"];
const DATE_TIME_LAYOUTS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const MONTH_FIRST_LAYOUTS: &[&str] = &["%m/%d/%Y"];
const DAY_FIRST_LAYOUTS: &[&str] = &["%d/%m/%Y", "%d.%m.%Y", "%d-%m-%Y"];

/// Spreadsheet locales that write dates month first. Every other locale writes them day first
/// or year first.
const MONTH_FIRST_LOCALES: &[&str] = &["en_US", "es_US", "en_PH", "fil_PH"];

/// How a locale orders the day and month of a numeric date like `05/01/2024`.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum DateOrder {
    /// `05/01/2024` is May 1st. This is the Sheets default.
    #[default]
    MonthFirst,
    /// `05/01/2024` is January 5th.
    DayFirst,
}

impl DateOrder {
    /// The order used by a spreadsheet locale such as `en_US` or `pt_BR`. An unknown or empty
    /// locale is treated as the Sheets default.
    pub fn from_locale(locale: &str) -> Self {
        let locale = locale.trim().replace('-', "_");
        if locale.is_empty() || MONTH_FIRST_LOCALES.contains(&locale.as_str()) {
            DateOrder::MonthFirst
        } else {
            DateOrder::DayFirst
        }
    }

    /// The locale layouts to try, preferred order first. A date that only reads one way, such as
    /// `15/01/2024`, is accepted in either order.
    fn layouts(self) -> impl Iterator<Item = &'static str> {
        let (preferred, other) = match self {
            DateOrder::MonthFirst => (MONTH_FIRST_LAYOUTS, DAY_FIRST_LAYOUTS),
            DateOrder::DayFirst => (DAY_FIRST_LAYOUTS, MONTH_FIRST_LAYOUTS),
        };
        preferred.iter().chain(other).copied()
    }
}

/// Parses `s` as a calendar date in the default month-first order, returning `None` if it is not
/// recognizable as one.
pub fn coerce_date(s: &str) -> Option<NaiveDate> {
    coerce_date_in(s, DateOrder::default())
}

/// Parses `s` as a calendar date, reading numeric day/month dates in `order`.
pub fn coerce_date_in(s: &str, order: DateOrder) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    ISO_LAYOUTS
        .iter()
        .copied()
        .chain(order.layouts())
        .find_map(|layout| NaiveDate::parse_from_str(s, layout).ok())
        .or_else(|| {
            DATE_TIME_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDateTime::parse_from_str(s, layout).ok())
                .map(|dt| dt.date())
        })
}

/// Formats an optional date for a sheet cell; an unset date is an empty cell.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}
