//! Frozen invoice snapshots.

use std::ops::Deref;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::InvoiceRecord;
use rust_decimal::Decimal;

/// An immutable copy of an invoice record, taken at submit time.
///
/// The snapshot exposes the record read-only through `Deref`; there is no
/// mutable access, so a snapshot can never observe edits made to the draft
/// after it was frozen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSnapshot(InvoiceRecord);

impl InvoiceSnapshot {
    pub(crate) fn new(record: InvoiceRecord) -> Self {
        Self(record)
    }

    /// Check the submit-time requirements: non-empty invoice number, complete
    /// issuer and recipient blocks with well-formed emails, a description on
    /// every line item, and a tax rate within [0, 100].
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = match Validate::validate(&self.0) {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        if !(Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&self.0.tax_rate_percent) {
            let mut error = ValidationError::new("range");
            error.message = Some("Tax rate must be between 0 and 100".into());
            errors.add("tax_rate_percent", error);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Deref for InvoiceSnapshot {
    type Target = InvoiceRecord;

    fn deref(&self) -> &InvoiceRecord {
        &self.0
    }
}
