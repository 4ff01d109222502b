//! End-to-end checkout workflow tests.
//!
//! Drives the complete flow from an editable draft through preview and
//! payment to the persisted receipt, with real rendering and real storage
//! but a deterministic gateway.

use std::time::Duration;

use checkout_core::{money::format_usd, AppError};
use checkout_workflow::{
    pay, FileReceiptStore, InMemoryReceiptStore, PaymentResult, ReceiptStore, Step, ARTIFACT_KEY,
    TRANSACTION_KEY,
};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use workflow_tests::{init_tracing, populated_session, ScriptedGateway};

/// Flow: edit draft, submit, preview, pay, verify the persisted receipt
/// matches the rendered artifact and transaction.
#[tokio::test]
async fn full_checkout_reaches_complete_with_a_durable_receipt() {
    init_tracing();

    let mut session = populated_session();

    // Subtotal 2*150.00 + 5*20.50 = 402.50, tax 8.25% = 33.20625.
    assert_eq!(session.draft().subtotal(), Decimal::new(40_250, 2));
    assert_eq!(format_usd(session.draft().total()), "$435.71");

    session.submit().expect("submit");
    let artifact_uri = session.artifact().expect("artifact").data_uri().to_string();
    assert!(artifact_uri.starts_with("data:application/pdf;base64,"));

    session.proceed().expect("proceed");

    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileReceiptStore::new(dir.path()).await.expect("store");
    let gateway = ScriptedGateway::approving("tx_e2e9481526374");
    let session = Mutex::new(session);

    let result = pay(&session, &gateway, &store).await.expect("pay");
    assert_eq!(
        result,
        PaymentResult::Completed {
            transaction_id: "tx_e2e9481526374".to_string()
        }
    );
    assert_eq!(gateway.calls(), 1);

    let session = session.into_inner();
    assert_eq!(session.step(), Step::Complete);
    assert!(session.receipt_written());
    assert_eq!(
        store.get(ARTIFACT_KEY).await.expect("get"),
        Some(artifact_uri)
    );
    assert_eq!(
        store.get(TRANSACTION_KEY).await.expect("get"),
        Some("tx_e2e9481526374".to_string())
    );
}

/// A declined charge leaves the session at the payment step and nothing
/// stored; the retry completes normally against the same store.
#[tokio::test]
async fn declined_then_retried_checkout_completes() {
    init_tracing();

    let mut session = populated_session();
    session.submit().expect("submit");
    session.proceed().expect("proceed");
    let session = Mutex::new(session);
    let store = InMemoryReceiptStore::new();

    let declining = ScriptedGateway::declining();
    let result = pay(&session, &declining, &store).await.expect("pay");
    let PaymentResult::Declined { reason } = result else {
        panic!("expected a decline, got {result:?}");
    };
    assert_eq!(reason, "Payment processing failed. Please try again.");
    assert_eq!(session.lock().await.step(), Step::Payment);
    assert_eq!(store.get(ARTIFACT_KEY).await.expect("get"), None);
    assert_eq!(store.get(TRANSACTION_KEY).await.expect("get"), None);

    let approving = ScriptedGateway::approving("tx_retry123456789");
    let result = pay(&session, &approving, &store).await.expect("retry");
    assert!(matches!(result, PaymentResult::Completed { .. }));
    assert!(store.get(TRANSACTION_KEY).await.expect("get").is_some());
}

/// While one charge is pending, a second attempt is refused before it
/// reaches the gateway.
#[tokio::test(start_paused = true)]
async fn concurrent_pay_attempts_charge_exactly_once() {
    init_tracing();

    let mut session = populated_session();
    session.submit().expect("submit");
    session.proceed().expect("proceed");
    let session = Mutex::new(session);
    let gateway = ScriptedGateway::approving("tx_once1234567890").with_latency(Duration::from_secs(2));
    let store = InMemoryReceiptStore::new();

    let first = pay(&session, &gateway, &store);
    let second = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        pay(&session, &gateway, &store).await
    };
    let (first, second) = tokio::join!(first, second);

    assert!(matches!(first, Ok(PaymentResult::Completed { .. })));
    assert!(matches!(second, Err(AppError::PaymentInFlight)));
    assert_eq!(gateway.calls(), 1);
    assert_eq!(
        store.get(TRANSACTION_KEY).await.expect("get"),
        Some("tx_once1234567890".to_string())
    );
}

/// Validation failures at submit never leave the editing step, and fixing
/// the draft lets the same session complete later.
#[tokio::test]
async fn invalid_draft_is_refused_then_accepted_after_the_fix() {
    init_tracing();

    let mut session = populated_session();
    session.draft_mut().recipient_mut().name.clear();

    let err = session.submit().expect_err("blank client name must refuse");
    let AppError::Validation(errors) = err else {
        panic!("expected a validation error");
    };
    assert!(format!("{errors}").contains("Client name is required"));
    assert_eq!(session.step(), Step::Create);
    assert!(session.artifact().is_none());

    session.draft_mut().recipient_mut().name = "Contoso Ltd".to_string();
    session.submit().expect("submit after fix");
    assert_eq!(session.step(), Step::Preview);
}
