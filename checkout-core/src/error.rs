use thiserror::Error;

/// Error taxonomy shared by every checkout crate.
///
/// Validation failures and invalid transitions are recoverable: the caller
/// keeps its state and may correct the input. Render and storage failures are
/// fatal to the operation that raised them and must be surfaced, never
/// swallowed. A declined charge is not an error at all; it is an expected
/// outcome and is modelled as data by the payment gateway.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid transition: '{event}' is not allowed from the {from} step")]
    InvalidTransition {
        from: &'static str,
        event: &'static str,
    },

    #[error("A payment attempt is already in flight")]
    PaymentInFlight,

    #[error("Rendered content does not fit the single-page layout")]
    PageOverflow,

    #[error("Render error: {0}")]
    Render(anyhow::Error),

    #[error("Storage error: {0}")]
    Storage(anyhow::Error),

    #[error("Configuration error: {0}")]
    Config(anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(anyhow::Error::new(err))
    }
}
