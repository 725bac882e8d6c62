//! Dashboard summary statistics.
//!
//! Pure reductions over an already-fetched item set. No I/O and no error
//! cases: an empty slice yields the all-zero summary.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::item::InventoryItem;

/// Aggregate figures shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
  pub total_items: usize,
  pub low_stock:   usize,
  pub total_value: Decimal,
}

impl Summary {
  /// `total_value` with exactly two fractional digits, e.g. `"32.50"`.
  pub fn display_value(&self) -> String { format_amount(self.total_value) }
}

/// A money amount rounded half away from zero to cents, e.g. `"2.99"`.
pub fn format_amount(amount: Decimal) -> String {
  let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
  format!("{rounded:.2}")
}

fn saturating_add(total: Decimal, value: Decimal) -> Decimal {
  total
    .checked_add(value)
    .unwrap_or(if value.is_sign_negative() { Decimal::MIN } else { Decimal::MAX })
}

/// Reduce `items` to a [`Summary`].
pub fn summarize(items: &[InventoryItem]) -> Summary {
  items.iter().fold(Summary::default(), |mut acc, item| {
    acc.total_items += 1;
    if item.is_low_stock() {
      acc.low_stock += 1;
    }
    acc.total_value = saturating_add(acc.total_value, item.value());
    acc
  })
}

/// The items at or below their minimum quantity, in input order.
pub fn low_stock_items(items: &[InventoryItem]) -> Vec<&InventoryItem> {
  items.iter().filter(|i| i.is_low_stock()).collect()
}
