//! Checkout steps.

use serde::{Deserialize, Serialize};

/// Where a checkout session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Create,
    Preview,
    Payment,
    Complete,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Create => "create",
            Step::Preview => "preview",
            Step::Payment => "payment",
            Step::Complete => "complete",
        }
    }
}
