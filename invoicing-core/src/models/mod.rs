//! Domain models for invoicing-core.

mod invoice;
mod line_item;
mod party;

pub use invoice::InvoiceRecord;
pub use line_item::{LineItem, UpdateLineItem};
pub use party::{Issuer, Recipient};

pub(crate) use line_item::{coerce_quantity, coerce_unit_price};
