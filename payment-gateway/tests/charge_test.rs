//! Charge behavior tests for payment-gateway.

use std::time::Duration;

use payment_gateway::{ChargeOutcome, GatewayConfig, PaymentProvider, SimulatedGateway};
use rust_decimal::Decimal;

fn instant_gateway(approval_rate: f64) -> SimulatedGateway {
    SimulatedGateway::with_config(GatewayConfig {
        latency: Duration::ZERO,
        approval_rate,
    })
}

#[tokio::test]
async fn a_certain_gateway_always_approves() {
    let gateway = instant_gateway(1.0);
    for _ in 0..20 {
        match gateway.charge(Decimal::new(11733, 2)).await {
            ChargeOutcome::Approved { transaction_id } => {
                assert!(transaction_id.starts_with("tx_"));
            }
            ChargeOutcome::Declined { reason } => panic!("unexpected decline: {reason}"),
        }
    }
}

#[tokio::test]
async fn a_hopeless_gateway_always_declines_with_the_standard_reason() {
    let gateway = instant_gateway(0.0);
    match gateway.charge(Decimal::ONE).await {
        ChargeOutcome::Declined { reason } => {
            assert_eq!(reason, payment_gateway::DECLINE_REASON);
        }
        ChargeOutcome::Approved { .. } => panic!("unexpected approval"),
    }
}

#[tokio::test]
async fn approval_rate_converges_to_the_configured_probability() {
    let gateway = instant_gateway(0.8);
    let trials = 2000;
    let mut approvals = 0usize;
    for _ in 0..trials {
        if matches!(
            gateway.charge(Decimal::ONE).await,
            ChargeOutcome::Approved { .. }
        ) {
            approvals += 1;
        }
    }
    // 2000 trials at p = 0.8: standard deviation is about 18 approvals, so a
    // +-6 sigma band keeps this stable while still proving convergence.
    let rate = approvals as f64 / trials as f64;
    assert!(
        (0.74..=0.86).contains(&rate),
        "observed approval rate {rate} outside expected band"
    );
}

#[tokio::test]
async fn non_positive_amounts_are_declined_without_the_latency_sleep() {
    // Full default latency (2 s) would trip this test's timeout budget if the
    // sleep ran; the rejection must come back immediately.
    let gateway = SimulatedGateway::with_config(GatewayConfig {
        latency: Duration::from_secs(3600),
        approval_rate: 1.0,
    });
    let outcome = tokio::time::timeout(
        Duration::from_millis(100),
        gateway.charge(Decimal::ZERO),
    )
    .await
    .expect("non-positive charge should resolve immediately");
    assert!(matches!(outcome, ChargeOutcome::Declined { .. }));
}

#[tokio::test(start_paused = true)]
async fn a_charge_stays_pending_for_the_configured_latency() {
    let gateway = SimulatedGateway::with_config(GatewayConfig {
        latency: Duration::from_secs(2),
        approval_rate: 1.0,
    });

    let charge = gateway.charge(Decimal::ONE);
    tokio::pin!(charge);

    // Nothing resolves before the simulated latency has elapsed.
    let early = tokio::time::timeout(Duration::from_millis(1999), &mut charge).await;
    assert!(early.is_err(), "charge resolved before the latency elapsed");

    let outcome = charge.await;
    assert!(matches!(outcome, ChargeOutcome::Approved { .. }));
}
