use std::env;
use std::time::Duration;

use checkout_core::AppError;
use dotenvy::dotenv;

/// Tunables for the simulated gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Simulated network latency before a charge resolves.
    pub latency: Duration,
    /// Probability in [0, 1] that a charge is approved.
    pub approval_rate: f64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_secs(2),
            approval_rate: 0.8,
        }
    }
}

impl GatewayConfig {
    /// Load overrides from `GATEWAY_LATENCY_MS` and `GATEWAY_APPROVAL_RATE`.
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let defaults = Self::default();

        let latency = match env::var("GATEWAY_LATENCY_MS") {
            Ok(raw) => Duration::from_millis(raw.parse().map_err(|e| {
                AppError::Config(anyhow::anyhow!("Invalid GATEWAY_LATENCY_MS '{}': {}", raw, e))
            })?),
            Err(_) => defaults.latency,
        };

        let approval_rate = match env::var("GATEWAY_APPROVAL_RATE") {
            Ok(raw) => {
                let rate: f64 = raw.parse().map_err(|e| {
                    AppError::Config(anyhow::anyhow!(
                        "Invalid GATEWAY_APPROVAL_RATE '{}': {}",
                        raw,
                        e
                    ))
                })?;
                if !(0.0..=1.0).contains(&rate) {
                    return Err(AppError::Config(anyhow::anyhow!(
                        "GATEWAY_APPROVAL_RATE must be within [0, 1], got {}",
                        rate
                    )));
                }
                rate
            }
            Err(_) => defaults.approval_rate,
        };

        Ok(Self {
            latency,
            approval_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_apply_and_bad_values_are_refused() {
        env::remove_var("GATEWAY_LATENCY_MS");
        env::remove_var("GATEWAY_APPROVAL_RATE");
        let config = GatewayConfig::from_env().expect("defaults");
        assert_eq!(config.latency, Duration::from_secs(2));
        assert_eq!(config.approval_rate, 0.8);

        env::set_var("GATEWAY_LATENCY_MS", "250");
        env::set_var("GATEWAY_APPROVAL_RATE", "0.5");
        let config = GatewayConfig::from_env().expect("overrides");
        assert_eq!(config.latency, Duration::from_millis(250));
        assert_eq!(config.approval_rate, 0.5);

        env::set_var("GATEWAY_APPROVAL_RATE", "1.5");
        assert!(GatewayConfig::from_env().is_err());

        env::remove_var("GATEWAY_LATENCY_MS");
        env::remove_var("GATEWAY_APPROVAL_RATE");
    }
}
