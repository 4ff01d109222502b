//! Line item model for invoicing-core.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One billable row on an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LineItem {
    pub id: Uuid,
    #[validate(length(min = 1, message = "Item description is required"))]
    pub description: String,
    /// Always at least 1.
    pub quantity: u32,
    /// Never negative.
    pub unit_price: Decimal,
}

impl LineItem {
    /// A fresh default item: empty description, quantity 1, price 0.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            description: String::new(),
            quantity: 1,
            unit_price: Decimal::ZERO,
        }
    }

    /// Row amount: `quantity * unit_price`, exact. Coercion accepts any
    /// parseable non-negative price, so the product saturates at
    /// `Decimal::MAX` instead of panicking on extreme input.
    pub fn amount(&self) -> Decimal {
        Decimal::from(self.quantity).saturating_mul(self.unit_price)
    }
}

impl Default for LineItem {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw field edits for a single line item.
///
/// Values arrive as the free-form strings a form surface produces; the draft
/// coerces them on application instead of rejecting them (see
/// [`crate::InvoiceDraft::update_item`]).
#[derive(Debug, Clone, Default)]
pub struct UpdateLineItem {
    pub description: Option<String>,
    pub quantity: Option<String>,
    pub unit_price: Option<String>,
}

/// Coerce a raw quantity into an integer >= 1; anything invalid becomes 1.
pub(crate) fn coerce_quantity(raw: &str) -> u32 {
    let trimmed = raw.trim();
    let parsed = trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().map(|f| f.trunc() as i64));
    match parsed {
        Some(q) if q >= 1 => q.min(i64::from(u32::MAX)) as u32,
        _ => 1,
    }
}

/// Coerce a raw price into a non-negative decimal; anything invalid becomes 0.
pub(crate) fn coerce_unit_price(raw: &str) -> Decimal {
    match raw.trim().parse::<Decimal>() {
        Ok(price) if !price.is_sign_negative() => price,
        _ => Decimal::ZERO,
    }
}
