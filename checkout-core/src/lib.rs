//! checkout-core: Shared infrastructure for the invoice checkout crates.

pub mod error;
pub mod money;
pub mod observability;

pub use error::AppError;
