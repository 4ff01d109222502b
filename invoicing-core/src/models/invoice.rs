//! Invoice record model for invoicing-core.

use chrono::{Days, Local, NaiveDate};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Issuer, LineItem, Recipient};

/// The full invoice document.
///
/// Derived values (subtotal, tax, total) are never stored on the record; they
/// are recomputed from the line items on every call so they always reflect the
/// latest edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct InvoiceRecord {
    #[validate(length(min = 1, message = "Invoice number is required"))]
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    #[validate(nested)]
    pub issuer: Issuer,
    #[validate(nested)]
    pub recipient: Recipient,
    /// Display and render order is insertion order.
    #[validate(nested)]
    pub items: Vec<LineItem>,
    pub notes: String,
    /// Percentage in [0, 100].
    pub tax_rate_percent: Decimal,
}

impl InvoiceRecord {
    /// A new draft record with the stock defaults: a machine-generated
    /// `INV-` number with a 5-digit suffix, issue date today, due date in
    /// 30 days, and a single default line item.
    pub fn new_draft() -> Self {
        let today = Local::now().date_naive();
        Self {
            invoice_number: format!("INV-{}", rand::thread_rng().gen_range(10000..=99999)),
            issue_date: today,
            due_date: today + Days::new(30),
            issuer: Issuer::default(),
            recipient: Recipient::default(),
            items: vec![LineItem::new()],
            notes: String::new(),
            tax_rate_percent: Decimal::ZERO,
        }
    }

    /// Sum of `quantity * unit_price` over all items, exact. Saturates at
    /// `Decimal::MAX` rather than panicking when extreme coerced input
    /// pushes the sum past the representable range.
    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .map(LineItem::amount)
            .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount))
    }

    /// `subtotal * tax_rate / 100`, exact; no intermediate rounding.
    pub fn tax(&self) -> Decimal {
        self.subtotal().saturating_mul(self.tax_rate_percent) / Decimal::ONE_HUNDRED
    }

    /// `subtotal + tax`, exact.
    pub fn total(&self) -> Decimal {
        self.subtotal().saturating_add(self.tax())
    }
}
