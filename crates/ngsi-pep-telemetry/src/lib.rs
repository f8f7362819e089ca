//! Observability for the NGSI PEP.
//!
//! - **Logging**: structured logs through `tracing-subscriber`, JSON in
//!   production and human-readable in development
//! - **Metrics**: Prometheus counters through the `metrics` facade
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `ngsi_pep_actions_total` | Counter | `action` |
//! | `ngsi_pep_classification_failures_total` | Counter | `kind` |
//! | `ngsi_pep_authz_decisions_total` | Counter | `result` |
//!
//! # Example
//!
//! ```rust,ignore
//! use ngsi_pep_telemetry::{init_telemetry, TelemetryConfig};
//!
//! init_telemetry(&TelemetryConfig::production())?;
//! ```
//!
//! Exposed in Prometheus text format:
//!
//! ```text
//! # TYPE ngsi_pep_actions_total counter
//! ngsi_pep_actions_total{action="create"} 12
//! ngsi_pep_actions_total{action="read"} 340
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{fields, init_logging, LogConfig};
pub use crate::metrics::{init_metrics, render_metrics, MetricsConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Combined logging and metrics configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Logging settings.
    pub logging: LogConfig,
    /// Metrics settings.
    pub metrics: MetricsConfig,
}

impl TelemetryConfig {
    /// Development preset: pretty debug logs, metrics on.
    #[must_use]
    pub fn development() -> Self {
        Self {
            logging: LogConfig::development(),
            metrics: MetricsConfig::default(),
        }
    }

    /// Production preset: JSON info logs, metrics on.
    #[must_use]
    pub fn production() -> Self {
        Self {
            logging: LogConfig::production(),
            metrics: MetricsConfig::default(),
        }
    }
}

/// Initializes logging, then metrics.
///
/// # Errors
///
/// Returns `TelemetryError` if either subsystem fails to initialize.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryResult<()> {
    init_logging(&config.logging)?;
    init_metrics(&config.metrics)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_differ_in_log_format() {
        assert!(TelemetryConfig::production().logging.json_format);
        assert!(!TelemetryConfig::development().logging.json_format);
        assert_eq!(TelemetryConfig::default(), TelemetryConfig::production());
    }

    #[test]
    fn test_disabled_telemetry_is_noop() {
        let config = TelemetryConfig {
            logging: LogConfig {
                enabled: false,
                ..LogConfig::default()
            },
            metrics: MetricsConfig { enabled: false },
        };
        assert!(init_telemetry(&config).is_ok());
    }
}
