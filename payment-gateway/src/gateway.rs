//! The charge contract and its simulated implementation.

use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::GatewayConfig;

/// Reason reported for a simulated decline.
pub const DECLINE_REASON: &str = "Payment processing failed. Please try again.";

/// Resolution of a charge attempt.
///
/// A decline is an expected outcome, not an error: no partial charge state is
/// left behind and the caller may retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargeOutcome {
    Approved { transaction_id: String },
    Declined { reason: String },
}

/// The charge authorization contract.
///
/// Charges may take arbitrarily long to resolve; callers must expect a
/// pending period before the outcome lands.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn charge(&self, amount: Decimal) -> ChargeOutcome;
}

/// In-process gateway simulation: fixed latency, independent probabilistic
/// resolution per call, no state shared between calls.
#[derive(Debug, Clone, Default)]
pub struct SimulatedGateway {
    config: GatewayConfig,
}

impl SimulatedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GatewayConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PaymentProvider for SimulatedGateway {
    async fn charge(&self, amount: Decimal) -> ChargeOutcome {
        if amount <= Decimal::ZERO {
            warn!(amount = %amount, "Refusing non-positive charge amount");
            return ChargeOutcome::Declined {
                reason: "Charge amount must be positive".to_string(),
            };
        }

        tokio::time::sleep(self.config.latency).await;

        let draw: f64 = rand::thread_rng().gen();
        if draw < self.config.approval_rate {
            let transaction_id = new_transaction_id();
            info!(amount = %amount, %transaction_id, "Payment processed");
            ChargeOutcome::Approved { transaction_id }
        } else {
            warn!(amount = %amount, "Payment declined");
            ChargeOutcome::Declined {
                reason: DECLINE_REASON.to_string(),
            }
        }
    }
}

/// A `tx_`-prefixed random alphanumeric token, unique with overwhelming
/// probability.
fn new_transaction_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(13)
        .map(char::from)
        .collect();
    format!("tx_{}", suffix.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_ids_have_the_expected_shape() {
        let id = new_transaction_id();
        assert!(id.starts_with("tx_"));
        assert_eq!(id.len(), 16);
        assert!(id[3..].chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn transaction_ids_do_not_repeat() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(new_transaction_id()));
        }
    }
}
