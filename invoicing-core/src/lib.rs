//! invoicing-core: the editable invoice model.
//!
//! An [`InvoiceDraft`] is the single mutable editing session for one invoice.
//! Totals are derived, never stored: every call recomputes them from the
//! current line items with exact decimal arithmetic. At submit time the draft
//! is frozen into an immutable [`InvoiceSnapshot`], which is the only view of
//! the invoice the renderer and the payment gateway ever observe.

mod draft;
pub mod models;
mod snapshot;

pub use draft::InvoiceDraft;
pub use models::{InvoiceRecord, Issuer, LineItem, Recipient, UpdateLineItem};
pub use snapshot::InvoiceSnapshot;
