//! Issuer and recipient models for invoicing-core.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// The party issuing the invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Issuer {
    #[validate(length(min = 1, message = "Company name is required"))]
    pub name: String,
    /// Multi-line postal address; lines are separated by `\n`.
    #[validate(length(min = 1, message = "Company address is required"))]
    pub address: String,
    #[validate(email(message = "Invalid company email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Company phone is required"))]
    pub phone: String,
}

/// The party being billed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Recipient {
    #[validate(length(min = 1, message = "Client name is required"))]
    pub name: String,
    /// Multi-line postal address; lines are separated by `\n`.
    #[validate(length(min = 1, message = "Client address is required"))]
    pub address: String,
    #[validate(email(message = "Invalid client email address"))]
    pub email: String,
}
