//! # NGSI PEP
//!
//! Policy enforcement point for NGSI-9/NGSI-10 context brokers. Every request
//! is classified into one of eight canonical [`Action`](core::Action)s before
//! an authorization policy decides whether it reaches the broker.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ngsi_pep::prelude::*;
//!
//! let config = ConfigLoader::new()
//!     .with_production()
//!     .with_optional_file("pep.toml")?
//!     .with_env_prefix("NGSI_PEP")
//!     .load()?;
//!
//! ngsi_pep::init_telemetry(&config)?;
//! let pipeline = ngsi_pep::build_pipeline(&config);
//!
//! let response = pipeline
//!     .process(MiddlewareContext::new(), request, forward_to_broker)
//!     .await;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request → RequestId → ActionClassification → Authorization → Broker
//! ```
//!
//! The classifier alone is usable without the pipeline:
//!
//! ```
//! use ngsi_pep::core::{classify, Action, ActionRequest};
//!
//! let mut request = ActionRequest::builder("/ngsi10/queryContext").build();
//! assert_eq!(classify(&mut request).unwrap(), Some(Action::Read));
//! ```

#![doc(html_root_url = "https://docs.rs/ngsi-pep/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod setup;

// Re-export classifier types
pub use ngsi_pep_core as core;

// Re-export middleware types
pub use ngsi_pep_middleware as middleware;

// Re-export configuration types
pub use ngsi_pep_config as config;

// Re-export telemetry types
pub use ngsi_pep_telemetry as telemetry;

pub use setup::{authorization_from_config, build_pipeline, init_telemetry};

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use ngsi_pep::prelude::*;
///
/// assert_eq!(translate_action("append"), Some(Action::Create));
/// ```
pub mod prelude {
    pub use ngsi_pep_core::{
        classify, extract_action, translate_action, Action, ActionRequest, ClassificationError,
        ClassificationResult, ErrorKind,
    };

    pub use ngsi_pep_middleware::{
        ActionClassification, AuthorizationMiddleware, MiddlewareContext, Pipeline,
        PolicyDecision, PolicyEvaluator, RequestId,
    };

    pub use ngsi_pep_config::{ConfigError, ConfigLoader, PepConfig};

    pub use ngsi_pep_telemetry::TelemetryError;
}
