//! The checkout session state machine.

use checkout_core::AppError;
use document_renderer::{render, RenderedArtifact};
use invoicing_core::{InvoiceDraft, InvoiceSnapshot};
use payment_gateway::{ChargeOutcome, PaymentProvider};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::step::Step;
use crate::storage::{ReceiptStore, ARTIFACT_KEY, TRANSACTION_KEY};

/// What a [`pay`] call resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentResult {
    /// The charge was approved and the receipt persisted.
    Completed { transaction_id: String },
    /// The charge was declined; the session stays at the payment step and
    /// the user may retry.
    Declined { reason: String },
    /// The outcome landed after the attempt was cancelled or superseded and
    /// was discarded without touching session state.
    Abandoned,
}

/// One user's checkout session: the editable draft, the artifact cached at
/// submit, and the payment guard state.
///
/// All session state is explicit and owned here; nothing is ambient, so any
/// number of sessions can coexist. The session itself is synchronous: the
/// only suspension point in the whole flow is the gateway call inside
/// [`pay`], which is why `pay` takes the session behind a mutex while every
/// other transition borrows it directly.
pub struct CheckoutSession {
    step: Step,
    draft: InvoiceDraft,
    snapshot: Option<InvoiceSnapshot>,
    artifact: Option<RenderedArtifact>,
    amount_due: Option<Decimal>,
    charge_in_flight: bool,
    /// Bumped on every charge start and on cancel; a resolving charge whose
    /// sequence no longer matches is stale and its outcome is discarded.
    attempt_seq: u64,
    /// Transaction id of an approved charge whose receipt write failed.
    /// The next [`pay`] retries the write instead of charging again.
    pending_receipt: Option<String>,
    receipt_written: bool,
}

impl CheckoutSession {
    pub fn new() -> Self {
        Self {
            step: Step::Create,
            draft: InvoiceDraft::new(),
            snapshot: None,
            artifact: None,
            amount_due: None,
            charge_in_flight: false,
            attempt_seq: 0,
            pending_receipt: None,
            receipt_written: false,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &InvoiceDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut InvoiceDraft {
        &mut self.draft
    }

    /// The artifact rendered at the last successful submit.
    pub fn artifact(&self) -> Option<&RenderedArtifact> {
        self.artifact.as_ref()
    }

    /// The total frozen at the last successful submit.
    pub fn amount_due(&self) -> Option<Decimal> {
        self.amount_due
    }

    pub fn receipt_written(&self) -> bool {
        self.receipt_written
    }

    /// CREATE -> PREVIEW: freeze the draft, validate it, render the artifact.
    ///
    /// A validation failure refuses the submission: the session stays in
    /// CREATE and nothing is rendered. Re-submitting from CREATE replaces the
    /// previously cached snapshot and artifact.
    #[instrument(skip(self))]
    pub fn submit(&mut self) -> Result<(), AppError> {
        self.expect_step(Step::Create, "submit")?;

        let snapshot = self.draft.freeze();
        snapshot.validate()?;
        let artifact = render(&snapshot)?;

        info!(
            invoice_number = %snapshot.invoice_number,
            total = %snapshot.total(),
            artifact_bytes = artifact.size_bytes(),
            "Invoice submitted"
        );
        self.amount_due = Some(snapshot.total());
        self.snapshot = Some(snapshot);
        self.artifact = Some(artifact);
        self.step = Step::Preview;
        Ok(())
    }

    /// PREVIEW -> CREATE: back to editing. The draft was never discarded, so
    /// the user resumes with the same record.
    pub fn edit(&mut self) -> Result<(), AppError> {
        self.expect_step(Step::Preview, "edit")?;
        self.step = Step::Create;
        Ok(())
    }

    /// PREVIEW -> PAYMENT, carrying forward the total computed at submit.
    pub fn proceed(&mut self) -> Result<(), AppError> {
        self.expect_step(Step::Preview, "proceed")?;
        self.step = Step::Payment;
        Ok(())
    }

    /// PAYMENT -> PREVIEW.
    ///
    /// Never contacts the gateway. A charge already in flight cannot be
    /// cancelled mid-flight; bumping the attempt sequence instead makes its
    /// eventual outcome stale, so a late approval cannot retroactively
    /// complete the workflow.
    pub fn cancel(&mut self) -> Result<(), AppError> {
        self.expect_step(Step::Payment, "cancel")?;
        if self.charge_in_flight {
            self.attempt_seq += 1;
            warn!("Cancelled while a charge is in flight; its outcome will be discarded");
        }
        if self.pending_receipt.take().is_some() {
            warn!("Cancelled with an unpersisted approval; it is abandoned");
        }
        self.step = Step::Preview;
        Ok(())
    }

    fn expect_step(&self, expected: Step, event: &'static str) -> Result<(), AppError> {
        if self.step != expected {
            return Err(AppError::InvalidTransition {
                from: self.step.as_str(),
                event,
            });
        }
        Ok(())
    }
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self::new()
    }
}

/// PAYMENT -> COMPLETE (on approval) or PAYMENT (on decline).
///
/// Refuses to start while another charge is pending: the in-flight guard is
/// checked and set before the gateway is contacted, so a concurrent second
/// call returns [`AppError::PaymentInFlight`] without ever reaching the
/// gateway. On an approval that is still current, the artifact reference and
/// transaction id are written to the durable store and the session reaches
/// COMPLETE; the transaction id is written last, so its presence marks a
/// complete receipt. If the write fails, the approval is retained on the
/// session and the next `pay` retries the write alone, never charging again
/// for the same approval. The mutex is released for the duration of the
/// gateway call so a cancel can be observed while the charge is pending.
#[instrument(skip_all)]
pub async fn pay<P, S>(
    session: &Mutex<CheckoutSession>,
    gateway: &P,
    store: &S,
) -> Result<PaymentResult, AppError>
where
    P: PaymentProvider + ?Sized,
    S: ReceiptStore + ?Sized,
{
    let (amount, attempt) = {
        let mut session = session.lock().await;
        session.expect_step(Step::Payment, "pay")?;
        if session.charge_in_flight {
            return Err(AppError::PaymentInFlight);
        }
        if let Some(transaction_id) = session.pending_receipt.clone() {
            let artifact_uri = artifact_uri(&session)?;
            persist_receipt(store, &artifact_uri, &transaction_id).await?;
            session.pending_receipt = None;
            session.receipt_written = true;
            session.step = Step::Complete;
            info!(%transaction_id, "Checkout complete, receipt persisted on retry");
            return Ok(PaymentResult::Completed { transaction_id });
        }
        let amount = session
            .amount_due
            .ok_or_else(|| anyhow::anyhow!("payment step reached without a computed total"))?;
        session.charge_in_flight = true;
        session.attempt_seq += 1;
        (amount, session.attempt_seq)
    };

    let outcome = gateway.charge(amount).await;

    let mut session = session.lock().await;
    session.charge_in_flight = false;

    if session.step != Step::Payment || session.attempt_seq != attempt {
        warn!(step = session.step.as_str(), "Discarding stale charge outcome");
        return Ok(PaymentResult::Abandoned);
    }

    match outcome {
        ChargeOutcome::Approved { transaction_id } => {
            let artifact_uri = artifact_uri(&session)?;
            if let Err(err) = persist_receipt(store, &artifact_uri, &transaction_id).await {
                session.pending_receipt = Some(transaction_id);
                warn!("Receipt write failed; the approval is kept for a storage retry");
                return Err(err);
            }
            session.receipt_written = true;
            session.step = Step::Complete;
            info!(%transaction_id, amount = %amount, "Checkout complete, receipt persisted");
            Ok(PaymentResult::Completed { transaction_id })
        }
        ChargeOutcome::Declined { reason } => {
            warn!(amount = %amount, reason = %reason, "Charge declined, staying at payment step");
            Ok(PaymentResult::Declined { reason })
        }
    }
}

fn artifact_uri(session: &CheckoutSession) -> Result<String, AppError> {
    Ok(session
        .artifact
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("payment step reached without an artifact"))?
        .data_uri()
        .to_string())
}

/// The transaction id goes last: a reader treats its presence as the
/// receipt being complete.
async fn persist_receipt<S>(
    store: &S,
    artifact_uri: &str,
    transaction_id: &str,
) -> Result<(), AppError>
where
    S: ReceiptStore + ?Sized,
{
    store.put(ARTIFACT_KEY, artifact_uri).await?;
    store.put(TRANSACTION_KEY, transaction_id).await?;
    Ok(())
}
