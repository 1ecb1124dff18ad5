//! Totals and the per-category breakdown shown by `expense report`.

use crate::model::{Amount, Table};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Width of the longest bar in the rendered chart.
const BAR_WIDTH: usize = 30;

/// One slice of the category breakdown.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CategoryShare {
    pub category: String,
    pub amount: Amount,
    /// Share of the breakdown, in percent with one decimal place.
    pub percent: Decimal,
}

/// The total of every amount and, when that total is positive, how it splits across categories.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Summary {
    pub total: Amount,
    pub count: usize,
    /// `None` unless `total` is greater than zero.
    pub breakdown: Option<Vec<CategoryShare>>,
}

impl Summary {
    pub fn new(table: &Table) -> Self {
        let total = table.total();
        let breakdown = total.is_positive().then(|| breakdown(table));
        Self {
            total,
            count: table.len(),
            breakdown,
        }
    }

    /// The total line followed by a text bar chart of the breakdown.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Total spent: {}", self.total.grouped());
        let breakdown = match &self.breakdown {
            Some(breakdown) if !breakdown.is_empty() => breakdown,
            _ => return out,
        };

        let label_width = breakdown
            .iter()
            .map(|s| s.category.chars().count())
            .max()
            .unwrap_or_default();
        let amounts: Vec<String> = breakdown.iter().map(|s| s.amount.grouped()).collect();
        let amount_width = amounts.iter().map(|a| a.len()).max().unwrap_or_default();
        let largest = breakdown[0].amount.value();

        let _ = writeln!(out);
        for (share, amount) in breakdown.iter().zip(&amounts) {
            let bar = "#".repeat(bar_len(share.amount.value(), largest));
            let _ = writeln!(
                out,
                "{:<label_width$}  {amount:>amount_width$}  {:>5}%  {bar}",
                share.category,
                share.percent.to_string()
            );
        }
        out
    }
}

/// Groups by category label, keeps the groups with a positive sum and orders them largest first.
fn breakdown(table: &Table) -> Vec<CategoryShare> {
    let mut groups: BTreeMap<String, Amount> = BTreeMap::new();
    for expense in table.rows() {
        let sum = groups.entry(expense.category.to_string()).or_default();
        *sum = *sum + expense.amount;
    }
    let mut groups: Vec<(String, Amount)> =
        groups.into_iter().filter(|(_, a)| a.is_positive()).collect();
    groups.sort_by(|(a_label, a), (b_label, b)| b.cmp(a).then_with(|| a_label.cmp(b_label)));

    // Shares are taken over values scaled down by the group count so that their sum fits.
    let scale = Decimal::from(groups.len().max(1));
    let shown = groups
        .iter()
        .map(|(_, a)| a.value() / scale)
        .fold(Decimal::ZERO, Decimal::saturating_add);
    groups
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            percent: percent(amount.value() / scale, shown),
            category,
            amount,
        })
        .collect()
}

/// `part` as a percentage of `whole`. Divides first so that amounts near the bounds of `Decimal`
/// cannot overflow.
fn percent(part: Decimal, whole: Decimal) -> Decimal {
    let ratio = part.checked_div(whole).unwrap_or_default();
    let mut percent = ratio
        .saturating_mul(Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    percent.rescale(1);
    percent
}

fn bar_len(value: Decimal, largest: Decimal) -> usize {
    if largest <= Decimal::ZERO {
        return 0;
    }
    let ratio = value.checked_div(largest).unwrap_or_default();
    ratio
        .saturating_mul(Decimal::from(BAR_WIDTH))
        .round()
        .to_usize()
        .unwrap_or_default()
        .max(1)
}
