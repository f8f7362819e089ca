//! Typed configuration for the NGSI PEP.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict parsing (unknown fields are rejected)
//! - Layered loading (defaults → file → env)
//!
//! # Example
//!
//! ```no_run
//! use ngsi_pep_config::ConfigLoader;
//!
//! # fn main() -> Result<(), ngsi_pep_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_production()
//!     .with_optional_file("pep.toml")?
//!     .with_env_prefix("NGSI_PEP")
//!     .load()?;
//!
//! println!("body cap: {} bytes", config.classifier.max_body_bytes);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [classifier]
//! max_body_bytes = 1048576
//! trust_incoming_request_id = false
//!
//! [authorization]
//! mode = "allow_list"
//! allowed_actions = ["read", "subscribe", "discover"]
//!
//! [telemetry]
//! service_name = "orion-pep"
//!
//! [telemetry.logging]
//! enabled = true
//! level = "info"
//! format = "json"
//!
//! [telemetry.metrics]
//! enabled = true
//! ```
//!
//! # Environment Variable Overrides
//!
//! - `NGSI_PEP__CLASSIFIER__MAX_BODY_BYTES=65536`
//! - `NGSI_PEP__AUTHORIZATION__MODE=deny_all`
//! - `NGSI_PEP__AUTHORIZATION__ALLOWED_ACTIONS=read,discover`
//! - `NGSI_PEP__TELEMETRY__LOGGING__LEVEL=debug`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{PepConfig, PepConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{
    AuthorizationConfig, AuthorizationMode, ClassifierConfig, LogFormat, LoggingConfig,
    MetricsConfig, TelemetryConfigSection, DEFAULT_MAX_BODY_BYTES,
};
