//! The mutable invoice editing session.

use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::models::{coerce_quantity, coerce_unit_price, InvoiceRecord, LineItem, UpdateLineItem};
use crate::snapshot::InvoiceSnapshot;

/// One editing session over one invoice record.
///
/// The draft is the only mutable view of the invoice. Downstream consumers
/// (the renderer, the gateway) work from an [`InvoiceSnapshot`] taken by
/// [`freeze`](Self::freeze); edits made after a freeze never reach them.
///
/// Numeric field edits are coerced, not rejected: an invalid quantity becomes
/// 1, an invalid or negative price becomes 0, and the tax rate is clamped to
/// [0, 100]. This silently-normalize policy matches the form surface feeding
/// the draft, which constrains the same inputs before they arrive.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    record: InvoiceRecord,
}

impl InvoiceDraft {
    pub fn new() -> Self {
        Self {
            record: InvoiceRecord::new_draft(),
        }
    }

    /// Read access to the underlying record.
    pub fn record(&self) -> &InvoiceRecord {
        &self.record
    }

    /// Append a new default line item and return its id. No upper bound.
    pub fn add_item(&mut self) -> Uuid {
        let item = LineItem::new();
        let id = item.id;
        self.record.items.push(item);
        debug!(item_id = %id, count = self.record.items.len(), "Line item added");
        id
    }

    /// Remove the item with the given id.
    ///
    /// A no-op when the id is unknown or when it is the sole remaining item:
    /// an invoice always holds at least one line item.
    pub fn remove_item(&mut self, id: Uuid) {
        if self.record.items.len() <= 1 {
            return;
        }
        let before = self.record.items.len();
        self.record.items.retain(|item| item.id != id);
        if self.record.items.len() < before {
            debug!(item_id = %id, count = self.record.items.len(), "Line item removed");
        }
    }

    /// Apply raw field edits to the item with the given id.
    ///
    /// Unknown ids are a no-op. Quantity and price inputs are coerced to the
    /// nearest valid value instead of raising.
    pub fn update_item(&mut self, id: Uuid, patch: UpdateLineItem) {
        let Some(item) = self.record.items.iter_mut().find(|item| item.id == id) else {
            return;
        };
        if let Some(description) = patch.description {
            item.description = description;
        }
        if let Some(raw) = patch.quantity {
            item.quantity = coerce_quantity(&raw);
        }
        if let Some(raw) = patch.unit_price {
            item.unit_price = coerce_unit_price(&raw);
        }
    }

    pub fn set_invoice_number(&mut self, invoice_number: impl Into<String>) {
        self.record.invoice_number = invoice_number.into();
    }

    pub fn set_issue_date(&mut self, date: chrono::NaiveDate) {
        self.record.issue_date = date;
    }

    pub fn set_due_date(&mut self, date: chrono::NaiveDate) {
        self.record.due_date = date;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.record.notes = notes.into();
    }

    /// Mutable access to the issuer block.
    pub fn issuer_mut(&mut self) -> &mut crate::models::Issuer {
        &mut self.record.issuer
    }

    /// Mutable access to the recipient block.
    pub fn recipient_mut(&mut self) -> &mut crate::models::Recipient {
        &mut self.record.recipient
    }

    /// Set the tax rate from raw input, clamped to [0, 100]; invalid input
    /// falls back to 0.
    pub fn set_tax_rate(&mut self, raw: &str) {
        self.record.tax_rate_percent = coerce_tax_rate(raw);
    }

    pub fn subtotal(&self) -> Decimal {
        self.record.subtotal()
    }

    pub fn tax(&self) -> Decimal {
        self.record.tax()
    }

    pub fn total(&self) -> Decimal {
        self.record.total()
    }

    /// Deep-copy the current state into an immutable snapshot.
    pub fn freeze(&self) -> InvoiceSnapshot {
        InvoiceSnapshot::new(self.record.clone())
    }
}

impl Default for InvoiceDraft {
    fn default() -> Self {
        Self::new()
    }
}

fn coerce_tax_rate(raw: &str) -> Decimal {
    match raw.trim().parse::<Decimal>() {
        Ok(rate) => rate.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED),
        Err(_) => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removing_the_last_item_is_a_noop() {
        let mut draft = InvoiceDraft::new();
        let only_id = draft.record().items[0].id;
        draft.remove_item(only_id);
        assert_eq!(draft.record().items.len(), 1);
        assert_eq!(draft.record().items[0].id, only_id);
    }

    #[test]
    fn removing_an_unknown_id_is_a_noop() {
        let mut draft = InvoiceDraft::new();
        draft.add_item();
        draft.remove_item(Uuid::new_v4());
        assert_eq!(draft.record().items.len(), 2);
    }

    #[test]
    fn item_count_never_drops_below_one() {
        let mut draft = InvoiceDraft::new();
        let ids: Vec<Uuid> = std::iter::once(draft.record().items[0].id)
            .chain((0..4).map(|_| draft.add_item()))
            .collect();
        for id in ids {
            draft.remove_item(id);
        }
        assert_eq!(draft.record().items.len(), 1);
    }

    #[test]
    fn update_item_coerces_invalid_numeric_input() {
        let mut draft = InvoiceDraft::new();
        let id = draft.record().items[0].id;
        draft.update_item(
            id,
            UpdateLineItem {
                description: Some("Consulting".into()),
                quantity: Some("not-a-number".into()),
                unit_price: Some("-3".into()),
            },
        );
        let item = &draft.record().items[0];
        assert_eq!(item.description, "Consulting");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.unit_price, Decimal::ZERO);
    }

    #[test]
    fn totals_saturate_on_extreme_coerced_input() {
        let mut draft = InvoiceDraft::new();
        let id = draft.record().items[0].id;
        // Coercion accepts both of these, so computing totals must not panic.
        draft.update_item(
            id,
            UpdateLineItem {
                description: Some("Bulk".into()),
                quantity: Some("4294967295".into()),
                unit_price: Some("9999999999999999999999999999".into()),
            },
        );
        assert_eq!(draft.subtotal(), Decimal::MAX);
        draft.set_tax_rate("100");
        assert_eq!(draft.total(), Decimal::MAX);
    }

    #[test]
    fn tax_rate_is_clamped_to_percent_range() {
        let mut draft = InvoiceDraft::new();
        draft.set_tax_rate("250");
        assert_eq!(draft.record().tax_rate_percent, Decimal::ONE_HUNDRED);
        draft.set_tax_rate("-1");
        assert_eq!(draft.record().tax_rate_percent, Decimal::ZERO);
        draft.set_tax_rate("12.5");
        assert_eq!(draft.record().tax_rate_percent, Decimal::new(125, 1));
    }

    #[test]
    fn freeze_is_insulated_from_later_edits() {
        let mut draft = InvoiceDraft::new();
        let id = draft.record().items[0].id;
        draft.update_item(
            id,
            UpdateLineItem {
                quantity: Some("2".into()),
                unit_price: Some("50.00".into()),
                ..Default::default()
            },
        );
        let snapshot = draft.freeze();

        draft.update_item(
            id,
            UpdateLineItem {
                unit_price: Some("999.00".into()),
                ..Default::default()
            },
        );
        draft.add_item();

        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.total(), Decimal::new(10000, 2));
    }
}
