//! payment-gateway: a simulated external charge authorization.
//!
//! The gateway is an in-process stand-in for a real payment processor. It
//! holds no state across calls: every [`PaymentProvider::charge`] invocation
//! sleeps through a simulated network delay and then resolves independently,
//! approving with a configurable probability. A replacement backed by a real
//! processor only has to preserve the `charge(amount) -> ChargeOutcome`
//! contract shape.

mod config;
mod gateway;

pub use config::GatewayConfig;
pub use gateway::{ChargeOutcome, PaymentProvider, SimulatedGateway, DECLINE_REASON};
