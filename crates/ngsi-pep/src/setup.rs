//! Wiring a [`PepConfig`] into a running pipeline.

use ngsi_pep_config::{AuthorizationMode, PepConfig};
use ngsi_pep_middleware::{
    ActionClassificationMiddleware, AuthorizationMiddleware, Pipeline, RequestIdMiddleware,
};
use ngsi_pep_telemetry::TelemetryResult;

/// Builds the three-stage pipeline described by `config`.
///
/// The configuration is taken as already validated; see
/// [`ConfigLoader::load`](ngsi_pep_config::ConfigLoader::load).
///
/// # Example
///
/// ```
/// use ngsi_pep::{build_pipeline, config::PepConfig};
///
/// let pipeline = build_pipeline(&PepConfig::default());
/// assert_eq!(
///     pipeline.stage_names(),
///     vec!["request_id", "action_classification", "authorization"]
/// );
/// ```
#[must_use]
pub fn build_pipeline(config: &PepConfig) -> Pipeline {
    let request_id = RequestIdMiddleware::new()
        .with_trust_incoming(config.classifier.trust_incoming_request_id);
    let classification =
        ActionClassificationMiddleware::new().with_max_body_bytes(config.classifier.max_body_bytes);

    tracing::debug!(
        max_body_bytes = config.classifier.max_body_bytes,
        authorization_mode = ?config.authorization.mode,
        "building pipeline"
    );

    Pipeline::builder()
        .request_id(request_id)
        .classification(classification)
        .authorization(authorization_from_config(config))
        .build()
}

/// Maps the configured authorization mode onto a built-in policy.
#[must_use]
pub fn authorization_from_config(config: &PepConfig) -> AuthorizationMiddleware {
    match config.authorization.mode {
        AuthorizationMode::AllowAll => AuthorizationMiddleware::allow_all(),
        AuthorizationMode::DenyAll => AuthorizationMiddleware::deny_all(),
        AuthorizationMode::AllowList => AuthorizationMiddleware::allowed_actions(
            config.authorization.allowed_actions.iter().copied(),
        ),
    }
}

/// Installs logging and metrics from the telemetry section of `config`.
///
/// # Errors
///
/// Returns `TelemetryError` if a global subscriber or recorder is already
/// installed, or the log level does not parse.
pub fn init_telemetry(config: &PepConfig) -> TelemetryResult<()> {
    ngsi_pep_telemetry::init_telemetry(&config.telemetry.to_telemetry_config())
}
