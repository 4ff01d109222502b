//! checkout-workflow: the guarded create -> preview -> pay -> confirm flow.
//!
//! A [`CheckoutSession`] owns one invoice draft and walks it through the
//! checkout steps. The snapshot is frozen and rendered exactly once per
//! submit; at most one charge is ever in flight; and the durable receipt is
//! written exactly once, when a still-current charge resolves approved.

mod session;
mod step;
mod storage;

pub use session::{pay, CheckoutSession, PaymentResult};
pub use step::Step;
pub use storage::{FileReceiptStore, InMemoryReceiptStore, ReceiptStore, ARTIFACT_KEY, TRANSACTION_KEY};
