//! Cross-crate checkout workflow integration tests library.
//!
//! Provides shared fixtures for driving a full checkout: a populated session
//! builder and deterministic gateway stand-ins. Everything runs in-process;
//! no external services are involved.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;
use std::time::Duration;

use async_trait::async_trait;
use checkout_workflow::CheckoutSession;
use invoicing_core::UpdateLineItem;
use payment_gateway::{ChargeOutcome, PaymentProvider, DECLINE_REASON};
use rust_decimal::Decimal;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,workflow_tests=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A session whose draft passes validation: two line items (2 x 150.00 and
/// 5 x 20.50) at an 8.25% tax rate, with notes.
pub fn populated_session() -> CheckoutSession {
    let mut session = CheckoutSession::new();
    let draft = session.draft_mut();

    let issuer = draft.issuer_mut();
    issuer.name = "Northwind Studio".to_string();
    issuer.address = "400 Market Street\nSuite 12\nPortland, OR".to_string();
    issuer.email = "accounts@northwind.example".to_string();
    issuer.phone = "555-0142".to_string();

    let recipient = draft.recipient_mut();
    recipient.name = "Contoso Ltd".to_string();
    recipient.address = "77 Harbor Road\nSeattle, WA".to_string();
    recipient.email = "payables@contoso.example".to_string();

    let first = draft.record().items[0].id;
    draft.update_item(
        first,
        UpdateLineItem {
            description: Some("Brand identity package".into()),
            quantity: Some("2".into()),
            unit_price: Some("150.00".into()),
        },
    );
    let second = draft.add_item();
    draft.update_item(
        second,
        UpdateLineItem {
            description: Some("Print-ready assets".into()),
            quantity: Some("5".into()),
            unit_price: Some("20.50".into()),
        },
    );
    draft.set_tax_rate("8.25");
    draft.set_notes("Payment due within 30 days. Thank you for your business.");
    session
}

/// Gateway stand-in that resolves to a fixed outcome and counts its calls,
/// optionally after a simulated latency.
pub struct ScriptedGateway {
    outcome: ChargeOutcome,
    latency: Duration,
    calls: AtomicUsize,
}

impl ScriptedGateway {
    pub fn approving(transaction_id: &str) -> Self {
        Self::new(ChargeOutcome::Approved {
            transaction_id: transaction_id.to_string(),
        })
    }

    pub fn declining() -> Self {
        Self::new(ChargeOutcome::Declined {
            reason: DECLINE_REASON.to_string(),
        })
    }

    fn new(outcome: ChargeOutcome) -> Self {
        Self {
            outcome,
            latency: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// How many charges the gateway has been asked to process.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentProvider for ScriptedGateway {
    async fn charge(&self, _amount: Decimal) -> ChargeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.outcome.clone()
    }
}
