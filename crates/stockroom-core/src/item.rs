//! Inventory items and the inputs used to create and edit them.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FormError;

// ─── Item ────────────────────────────────────────────────────────────────────

/// A row of the `inventory_items` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
  pub id:              Uuid,
  pub name:            String,
  pub sku:             String,
  #[serde(default)]
  pub category:        String,
  pub quantity:        u32,
  pub min_quantity:    u32,
  pub unit_price:      Decimal,
  #[serde(default)]
  pub supplier:        String,
  pub last_updated_by: Option<Uuid>,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

impl InventoryItem {
  /// An item is low on stock once its quantity falls to or below the
  /// configured minimum.
  pub fn is_low_stock(&self) -> bool { self.quantity <= self.min_quantity }

  /// `quantity × unit_price`, saturating at `Decimal::MAX` (or `MIN` for a
  /// negative price) instead of overflowing.
  pub fn value(&self) -> Decimal {
    Decimal::from(self.quantity)
      .checked_mul(self.unit_price)
      .unwrap_or(if self.unit_price.is_sign_negative() { Decimal::MIN } else { Decimal::MAX })
  }
}

// ─── Writes ──────────────────────────────────────────────────────────────────

/// Input for inserting a new item. Ids and timestamps are assigned by the
/// service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewItem {
  pub name:         String,
  pub sku:          String,
  pub category:     String,
  pub quantity:     u32,
  pub min_quantity: u32,
  pub unit_price:   Decimal,
  pub supplier:     String,
}

/// A partial update. Only the fields that are `Some` are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemChanges {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name:         Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sku:          Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub category:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub quantity:     Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min_quantity: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub unit_price:   Option<Decimal>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub supplier:     Option<String>,
}

impl ItemChanges {
  /// The fields of `edited` that differ from `current`.
  pub fn between(current: &InventoryItem, edited: &NewItem) -> Self {
    fn changed<T: PartialEq + Clone>(old: &T, new: &T) -> Option<T> {
      (old != new).then(|| new.clone())
    }
    Self {
      name:         changed(&current.name, &edited.name),
      sku:          changed(&current.sku, &edited.sku),
      category:     changed(&current.category, &edited.category),
      quantity:     changed(&current.quantity, &edited.quantity),
      min_quantity: changed(&current.min_quantity, &edited.min_quantity),
      unit_price:   changed(&current.unit_price, &edited.unit_price),
      supplier:     changed(&current.supplier, &edited.supplier),
    }
  }

  pub fn is_empty(&self) -> bool { self.changed_fields().is_empty() }

  /// Column names of the fields this update touches.
  pub fn changed_fields(&self) -> Vec<&'static str> {
    [
      ("name", self.name.is_some()),
      ("sku", self.sku.is_some()),
      ("category", self.category.is_some()),
      ("quantity", self.quantity.is_some()),
      ("min_quantity", self.min_quantity.is_some()),
      ("unit_price", self.unit_price.is_some()),
      ("supplier", self.supplier.is_some()),
    ]
    .into_iter()
    .filter_map(|(field, set)| set.then_some(field))
    .collect()
  }
}

// ─── Form ────────────────────────────────────────────────────────────────────

/// Raw text entered into the item editor, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemForm {
  pub name:         String,
  pub sku:          String,
  pub category:     String,
  pub quantity:     String,
  pub min_quantity: String,
  pub unit_price:   String,
  pub supplier:     String,
}

impl ItemForm {
  /// Pre-fill the editor from an existing item.
  pub fn from_item(item: &InventoryItem) -> Self {
    Self {
      name:         item.name.clone(),
      sku:          item.sku.clone(),
      category:     item.category.clone(),
      quantity:     item.quantity.to_string(),
      min_quantity: item.min_quantity.to_string(),
      unit_price:   item.unit_price.to_string(),
      supplier:     item.supplier.clone(),
    }
  }

  /// Validate and convert into a [`NewItem`].
  pub fn parse(&self) -> Result<NewItem, FormError> {
    let name = required("name", &self.name)?;
    let sku = required("SKU", &self.sku)?;
    Ok(NewItem {
      name,
      sku,
      category: self.category.trim().to_string(),
      quantity: parse_quantity("quantity", &self.quantity)?,
      min_quantity: parse_quantity("minimum quantity", &self.min_quantity)?,
      unit_price: parse_price(&self.unit_price)?,
      supplier: self.supplier.trim().to_string(),
    })
  }
}

fn required(field: &'static str, raw: &str) -> Result<String, FormError> {
  let value = raw.trim();
  if value.is_empty() {
    return Err(FormError::Required(field));
  }
  Ok(value.to_string())
}

fn parse_quantity(field: &'static str, raw: &str) -> Result<u32, FormError> {
  raw.trim().parse().map_err(|_| FormError::InvalidQuantity {
    field,
    value: raw.to_string(),
  })
}

fn parse_price(raw: &str) -> Result<Decimal, FormError> {
  let trimmed = raw.trim();
  let digits = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
  match Decimal::from_str(digits) {
    Ok(price) if !price.is_sign_negative() => Ok(price),
    _ => Err(FormError::InvalidPrice(raw.to_string())),
  }
}

#[cfg(test)]
mod tests {
  use rust_decimal_macros::dec;

  use super::*;

  fn form() -> ItemForm {
    ItemForm {
      name:         " Widget ".into(),
      sku:          "W-1".into(),
      category:     "Parts".into(),
      quantity:     "12".into(),
      min_quantity: "4".into(),
      unit_price:   "$3.25".into(),
      supplier:     "".into(),
    }
  }

  fn item(quantity: u32, min_quantity: u32) -> InventoryItem {
    let now = Utc::now();
    InventoryItem {
      id: Uuid::new_v4(),
      name: "Widget".into(),
      sku: "W-1".into(),
      category: "Parts".into(),
      quantity,
      min_quantity,
      unit_price: dec!(3.25),
      supplier: String::new(),
      last_updated_by: None,
      created_at: now,
      updated_at: now,
    }
  }

  #[test]
  fn low_stock_includes_equality() {
    assert!(item(4, 4).is_low_stock());
    assert!(item(3, 4).is_low_stock());
    assert!(!item(5, 4).is_low_stock());
  }

  #[test]
  fn parses_valid_form() {
    let parsed = form().parse().unwrap();
    assert_eq!(parsed.name, "Widget");
    assert_eq!(parsed.quantity, 12);
    assert_eq!(parsed.min_quantity, 4);
    assert_eq!(parsed.unit_price, dec!(3.25));
    assert_eq!(parsed.supplier, "");
  }

  #[test]
  fn rejects_blank_name_and_sku() {
    let mut f = form();
    f.name = "   ".into();
    assert_eq!(f.parse(), Err(FormError::Required("name")));

    let mut f = form();
    f.sku.clear();
    assert_eq!(f.parse(), Err(FormError::Required("SKU")));
  }

  #[test]
  fn rejects_negative_or_fractional_quantity() {
    let mut f = form();
    f.quantity = "-1".into();
    assert!(matches!(f.parse(), Err(FormError::InvalidQuantity { field: "quantity", .. })));

    let mut f = form();
    f.min_quantity = "2.5".into();
    assert!(matches!(
      f.parse(),
      Err(FormError::InvalidQuantity { field: "minimum quantity", .. })
    ));
  }

  #[test]
  fn rejects_negative_price() {
    let mut f = form();
    f.unit_price = "-0.01".into();
    assert!(matches!(f.parse(), Err(FormError::InvalidPrice(_))));
  }

  #[test]
  fn form_from_item_parses_back_to_same_values() {
    let existing = item(7, 2);
    let parsed = ItemForm::from_item(&existing).parse().unwrap();
    assert!(ItemChanges::between(&existing, &parsed).is_empty());
  }

  #[test]
  fn changes_list_only_edited_fields() {
    let existing = item(7, 2);
    let mut edited = ItemForm::from_item(&existing).parse().unwrap();
    edited.quantity = 9;
    edited.supplier = "Acme".into();

    let changes = ItemChanges::between(&existing, &edited);
    assert_eq!(changes.changed_fields(), ["quantity", "supplier"]);

    let body = serde_json::to_value(&changes).unwrap();
    assert_eq!(body, serde_json::json!({ "quantity": 9, "supplier": "Acme" }));
  }
}
