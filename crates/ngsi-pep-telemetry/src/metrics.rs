//! Prometheus metrics for the PEP.
//!
//! Recording goes through the `metrics` facade, so the functions here are
//! cheap no-ops until a recorder is installed with [`init_metrics`].
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `ngsi_pep_actions_total` | Counter | `action` | Successful classifications |
//! | `ngsi_pep_classification_failures_total` | Counter | `kind` | Rejected requests |
//! | `ngsi_pep_authz_decisions_total` | Counter | `result` | Authorization decisions |

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use ngsi_pep_core::{Action, ErrorKind};
use std::sync::OnceLock;

/// Counter of successful classifications, labelled by action.
pub const ACTIONS_TOTAL: &str = "ngsi_pep_actions_total";

/// Counter of classification failures, labelled by error kind.
pub const CLASSIFICATION_FAILURES_TOTAL: &str = "ngsi_pep_classification_failures_total";

/// Counter of authorization decisions, labelled by result.
pub const AUTHZ_DECISIONS_TOTAL: &str = "ngsi_pep_authz_decisions_total";

/// Label value for a classification that produced no action.
const NO_ACTION: &str = "none";

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Installs the Prometheus recorder as the global `metrics` recorder.
///
/// # Errors
///
/// Returns `TelemetryError::MetricsInit` if a global recorder is already
/// installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    let _ = METRICS_HANDLE.set(handle);

    describe_metrics();
    Ok(())
}

/// Renders metrics in Prometheus text format.
///
/// Returns `None` if [`init_metrics`] has not installed a recorder.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

/// Registers descriptions for every PEP metric.
pub fn describe_metrics() {
    describe_counter!(ACTIONS_TOTAL, "Requests classified, by computed action");
    describe_counter!(
        CLASSIFICATION_FAILURES_TOTAL,
        "Requests rejected by the classifier, by error kind"
    );
    describe_counter!(AUTHZ_DECISIONS_TOTAL, "Authorization decisions, by result");
}

/// Records a successful classification.
///
/// A classification without an action is counted under `action="none"`.
pub fn record_classification(action: Option<Action>) {
    counter!(ACTIONS_TOTAL, "action" => action.map_or(NO_ACTION, Action::as_str)).increment(1);
}

/// Records a classification failure.
pub fn record_classification_failure(kind: ErrorKind) {
    counter!(CLASSIFICATION_FAILURES_TOTAL, "kind" => kind.as_str()).increment(1);
}

/// Records an authorization decision.
pub fn record_authz_decision(allowed: bool) {
    let result = if allowed { "allow" } else { "deny" };
    counter!(AUTHZ_DECISIONS_TOTAL, "result" => result).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_with_local_recorder(f: impl FnOnce()) -> String {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, f);
        handle.render()
    }

    #[test]
    fn test_record_functions_without_recorder() {
        record_classification(Some(Action::Create));
        record_classification(None);
        record_classification_failure(ErrorKind::MalformedXml);
        record_authz_decision(false);
    }

    #[test]
    fn test_classification_counters() {
        let output = render_with_local_recorder(|| {
            record_classification(Some(Action::SubscribeAvailability));
            record_classification(Some(Action::SubscribeAvailability));
            record_classification(None);
        });

        assert!(output.contains(r#"ngsi_pep_actions_total{action="subscribe-availability"} 2"#));
        assert!(output.contains(r#"ngsi_pep_actions_total{action="none"} 1"#));
    }

    #[test]
    fn test_failure_and_authz_counters() {
        let output = render_with_local_recorder(|| {
            record_classification_failure(ErrorKind::RouteNotFound);
            record_authz_decision(true);
            record_authz_decision(false);
            record_authz_decision(false);
        });

        assert!(output.contains(&format!(
            r#"ngsi_pep_classification_failures_total{{kind="{}"}} 1"#,
            ErrorKind::RouteNotFound.as_str()
        )));
        assert!(output.contains(r#"ngsi_pep_authz_decisions_total{result="allow"} 1"#));
        assert!(output.contains(r#"ngsi_pep_authz_decisions_total{result="deny"} 2"#));
    }

    #[test]
    fn test_disabled_metrics_is_noop() {
        assert!(init_metrics(&MetricsConfig { enabled: false }).is_ok());
    }
}
