//! Main configuration types.
//!
//! This module provides the top-level [`PepConfig`] struct and its builder.

use serde::{Deserialize, Serialize};

use crate::{
    AuthorizationConfig, AuthorizationMode, ClassifierConfig, ConfigError, LogFormat,
    TelemetryConfigSection,
};

/// Complete PEP configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use ngsi_pep_config::PepConfig;
///
/// let config = PepConfig::default();
/// assert_eq!(config.classifier.max_body_bytes, 1024 * 1024);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct PepConfig {
    /// Classifier configuration.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Authorization configuration.
    #[serde(default)]
    pub authorization: AuthorizationConfig,

    /// Telemetry configuration (logging, metrics).
    #[serde(default)]
    pub telemetry: TelemetryConfigSection,
}

impl PepConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> PepConfigBuilder {
        PepConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `classifier.max_body_bytes` is zero
    /// - `authorization.allowed_actions` is empty in `allow_list` mode
    /// - `telemetry.service_name` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.classifier.max_body_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "classifier.max_body_bytes",
                "must be greater than 0",
            ));
        }

        if self.authorization.mode == AuthorizationMode::AllowList
            && self.authorization.allowed_actions.is_empty()
        {
            return Err(ConfigError::validation_error(
                "authorization.allowed_actions must not be empty when mode is 'allow_list'",
            ));
        }

        if self.telemetry.service_name.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "telemetry.service_name",
                "must not be empty",
            ));
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Pretty debug logs with ANSI colors, allow-all authorization, and
    /// trusted incoming request IDs.
    ///
    /// # Example
    ///
    /// ```
    /// use ngsi_pep_config::PepConfig;
    ///
    /// let config = PepConfig::development();
    /// assert_eq!(config.telemetry.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "debug".to_string();
        config.telemetry.logging.format = LogFormat::Pretty;
        config.telemetry.logging.ansi_enabled = true;

        config.classifier.trust_incoming_request_id = true;
        config.authorization.mode = AuthorizationMode::AllowAll;

        config
    }

    /// Create a production configuration preset.
    ///
    /// JSON info logs without colors. Incoming request IDs are not trusted.
    ///
    /// # Example
    ///
    /// ```
    /// use ngsi_pep_config::{LogFormat, PepConfig};
    ///
    /// let config = PepConfig::production();
    /// assert_eq!(config.telemetry.logging.format, LogFormat::Json);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "info".to_string();
        config.telemetry.logging.format = LogFormat::Json;
        config.telemetry.logging.ansi_enabled = false;

        config.classifier.trust_incoming_request_id = false;

        config
    }
}

/// Builder for [`PepConfig`].
#[derive(Debug, Default)]
pub struct PepConfigBuilder {
    classifier: Option<ClassifierConfig>,
    authorization: Option<AuthorizationConfig>,
    telemetry: Option<TelemetryConfigSection>,
}

impl PepConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the classifier configuration.
    #[must_use]
    pub fn classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Set the authorization configuration.
    #[must_use]
    pub fn authorization(mut self, authorization: AuthorizationConfig) -> Self {
        self.authorization = Some(authorization);
        self
    }

    /// Set the telemetry configuration.
    #[must_use]
    pub fn telemetry(mut self, telemetry: TelemetryConfigSection) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Build the configuration. Unset sections use their defaults.
    #[must_use]
    pub fn build(self) -> PepConfig {
        PepConfig {
            classifier: self.classifier.unwrap_or_default(),
            authorization: self.authorization.unwrap_or_default(),
            telemetry: self.telemetry.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<PepConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
