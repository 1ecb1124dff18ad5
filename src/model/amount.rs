//! Amount type for handling monetary values read from, and written to, the expense sheet.
//!
//! Amounts are written as plain two-decimal text (`42.50`), but people also type numbers into the
//! sheet by hand and Sheets hands those back formatted for the spreadsheet's locale, so a cell can
//! look like `42.5`, `$42.50`, `R$ 1.042,50`, `1,042.50` or `4.25E+01`. The `Amount` type parses
//! all of these.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

/// Currency prefixes that are stripped before parsing. Longest first.
const CURRENCY_PREFIXES: &[&str] = &["R$", "$"];

/// Represents a monetary amount with two-decimal precision.
///
/// Equality and ordering are numeric, so `42.5` and `42.50` are the same amount.
///
/// # Examples
///
/// ```
/// # use expense_sheet::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("R$ 1,042.5").unwrap();
/// assert_eq!(amount.to_string(), "1042.50");
/// ```
///
/// Anything that cannot be parsed coerces to zero:
/// ```
/// # use expense_sheet::model::Amount;
/// assert!(Amount::coerce("lunch").is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates a new `Amount`, rounded half-away-from-zero to two decimal places.
    pub fn new(value: Decimal) -> Self {
        Self(value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Parses `s`, returning zero for anything that is not a number.
    pub fn coerce(s: &str) -> Self {
        Self::from_str(s).unwrap_or_default()
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Formats the amount with thousands separators, e.g. `1,042.50`, for display to the user.
    pub fn grouped(&self) -> String {
        format_num::format_num!(",.2", self.0.to_f64().unwrap_or_default())
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed),
        };

        let without_currency = CURRENCY_PREFIXES
            .iter()
            .find_map(|prefix| unsigned.strip_prefix(prefix))
            .unwrap_or(unsigned);

        let digits = plain_digits(without_currency);

        let value = Decimal::from_str(&digits)
            .or_else(|_| Decimal::from_scientific(&digits))
            .map_err(AmountError)?;

        Ok(Amount::new(if negative { -value } else { value }))
    }
}

/// Rewrites a locale-formatted number as `1234.56`.
///
/// When both `,` and `.` appear, the last one is the decimal separator. A lone `,` followed by one
/// or two digits is a decimal comma (`1,50`). Otherwise `,` groups thousands, and so does `.` when
/// it appears more than once (`1.234.567`). Spaces, which some locales group with, are dropped.
/// Digit groups must be three wide; anything else is returned as is and fails to parse.
fn plain_digits(s: &str) -> String {
    let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    let decimal_comma = match (s.rfind(','), s.rfind('.')) {
        (Some(comma), Some(dot)) => comma > dot,
        (Some(comma), None) => {
            s.matches(',').count() == 1 && (1..=2).contains(&(s.len() - comma - 1))
        }
        _ => false,
    };
    let (group, decimal) = if decimal_comma || s.matches('.').count() > 1 {
        ('.', ',')
    } else {
        (',', '.')
    };

    let (int, frac) = match s.rsplit_once(decimal) {
        Some((int, frac)) => (int, Some(frac)),
        None => (s.as_str(), None),
    };
    let groups: Vec<&str> = int.split(group).collect();
    let well_grouped = groups.len() == 1
        || (groups[0].len() <= 3
            && groups[1..]
                .iter()
                .all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit())));
    if !well_grouped {
        return s;
    }

    let mut digits = groups.concat();
    if let Some(frac) = frac {
        digits.push('.');
        digits.push_str(frac);
    }
    digits
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut value = self.0;
        value.rescale(2);
        if value.is_zero() {
            // Avoids printing "-0.00".
            value.set_sign_positive(true);
        }
        write!(f, "{value}")
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

impl Add for Amount {
    type Output = Amount;

    /// Saturates at the bounds of `Decimal` instead of overflowing.
    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
