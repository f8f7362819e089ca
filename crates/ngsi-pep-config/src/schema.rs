//! Configuration schema types.
//!
//! This module defines the structure of every configuration section.

use ngsi_pep_core::Action;
use ngsi_pep_telemetry::{LogConfig, MetricsConfig as TelemetryMetricsConfig, TelemetryConfig};
use serde::{Deserialize, Serialize};

/// Default cap on buffered request bodies (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Classifier configuration section.
///
/// # Example
///
/// ```
/// use ngsi_pep_config::ClassifierConfig;
///
/// let config = ClassifierConfig::default();
/// assert_eq!(config.max_body_bytes, 1024 * 1024);
/// assert!(!config.trust_incoming_request_id);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Largest request body the classifier will buffer, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Reuse a valid incoming `x-request-id` instead of generating one.
    #[serde(default)]
    pub trust_incoming_request_id: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: default_max_body_bytes(),
            trust_incoming_request_id: false,
        }
    }
}

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Authorization mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationMode {
    /// Allow every classified request.
    #[default]
    AllowAll,
    /// Deny every classified request.
    DenyAll,
    /// Allow only the actions in `allowed_actions`.
    AllowList,
}

impl AuthorizationMode {
    /// Parses the snake_case mode name used in files and env overrides.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "allow_all" => Some(Self::AllowAll),
            "deny_all" => Some(Self::DenyAll),
            "allow_list" => Some(Self::AllowList),
            _ => None,
        }
    }
}

/// Authorization configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct AuthorizationConfig {
    /// Authorization mode.
    #[serde(default)]
    pub mode: AuthorizationMode,

    /// Actions permitted in `allow_list` mode.
    #[serde(default)]
    pub allowed_actions: Vec<Action>,
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable format (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or `EnvFilter` directive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in output.
    #[serde(default)]
    pub ansi_enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Install the Prometheus recorder.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Telemetry configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfigSection {
    /// Service name attached to log lines.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Default for TelemetryConfigSection {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            logging: LoggingConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl TelemetryConfigSection {
    /// Converts this section into the settings `ngsi-pep-telemetry` installs.
    #[must_use]
    pub fn to_telemetry_config(&self) -> TelemetryConfig {
        TelemetryConfig {
            logging: LogConfig {
                enabled: self.logging.enabled,
                level: self.logging.level.clone(),
                json_format: self.logging.format == LogFormat::Json,
                ansi: self.logging.ansi_enabled,
                include_target: true,
                service_name: self.service_name.clone(),
            },
            metrics: TelemetryMetricsConfig {
                enabled: self.metrics.enabled,
            },
        }
    }
}

fn default_service_name() -> String {
    "ngsi-pep".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_config_deserialize() {
        let config: ClassifierConfig = toml::from_str("max_body_bytes = 4096").unwrap();
        assert_eq!(config.max_body_bytes, 4096);
        assert!(!config.trust_incoming_request_id);
    }

    #[test]
    fn test_classifier_config_unknown_field_rejected() {
        let result: Result<ClassifierConfig, _> = toml::from_str("max_body = 4096");
        assert!(result.is_err());
    }

    #[test]
    fn test_authorization_mode_deserialize() {
        let config: AuthorizationConfig = toml::from_str(
            r#"
            mode = "allow_list"
            allowed_actions = ["read", "subscribe-availability"]
            "#,
        )
        .unwrap();
        assert_eq!(config.mode, AuthorizationMode::AllowList);
        assert_eq!(
            config.allowed_actions,
            vec![Action::Read, Action::SubscribeAvailability]
        );
    }

    #[test]
    fn test_authorization_mode_from_name() {
        assert_eq!(AuthorizationMode::from_name("DENY_ALL"), Some(AuthorizationMode::DenyAll));
        assert_eq!(AuthorizationMode::from_name("rbac"), None);
    }

    #[test]
    fn test_unknown_action_rejected() {
        let result: Result<AuthorizationConfig, _> =
            toml::from_str(r#"allowed_actions = ["append"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_format_deserialize() {
        let config: LoggingConfig = toml::from_str(r#"format = "pretty""#).unwrap();
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_to_telemetry_config() {
        let section = TelemetryConfigSection {
            service_name: "orion-pep".to_string(),
            logging: LoggingConfig {
                format: LogFormat::Pretty,
                ansi_enabled: true,
                ..LoggingConfig::default()
            },
            metrics: MetricsConfig { enabled: false },
        };

        let telemetry = section.to_telemetry_config();
        assert!(!telemetry.logging.json_format);
        assert!(telemetry.logging.ansi);
        assert_eq!(telemetry.logging.service_name, "orion-pep");
        assert!(!telemetry.metrics.enabled);
    }
}
