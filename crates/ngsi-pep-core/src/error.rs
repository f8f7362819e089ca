//! Classification error types.
//!
//! Every failure of the classifier is an expected, data-dependent outcome.
//! [`ClassificationError`] carries the kind of failure plus any diagnostic
//! detail so callers can map it to a client-facing rejection.
//!
//! | `ErrorKind` | Code | Status |
//! |---|---|---|
//! | `MalformedXml` | `WRONG_XML_PAYLOAD` | 400 |
//! | `MalformedJson` | `WRONG_JSON_PAYLOAD` | 400 |
//! | `RouteNotFound` | `ACTION_NOT_FOUND` | 400 |

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`ClassificationError`].
pub type ClassificationResult<T> = Result<T, ClassificationError>;

/// The closed set of classification failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// The XML payload could not be parsed or carried no action.
    MalformedXml,
    /// The JSON payload was absent or carried no action.
    MalformedJson,
    /// The URL matched none of the known endpoints.
    RouteNotFound,
}

impl ErrorKind {
    /// Returns the kebab-case name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedXml => "malformed-xml",
            Self::MalformedJson => "malformed-json",
            Self::RouteNotFound => "route-not-found",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error produced when a request cannot be classified.
///
/// # Example
///
/// ```
/// use ngsi_pep_core::{ClassificationError, ErrorKind};
///
/// let err = ClassificationError::route_not_found("/foo/bar");
/// assert_eq!(err.kind(), ErrorKind::RouteNotFound);
/// assert_eq!(err.code(), "ACTION_NOT_FOUND");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassificationError {
    /// The XML body was not well formed or did not contain an action.
    #[error("wrong XML payload{}", diagnostic_suffix(.diagnostic.as_deref()))]
    MalformedXml {
        /// Underlying parser diagnostic, when the failure came from the parser.
        diagnostic: Option<String>,
    },

    /// The JSON body was missing or had no `updateAction` field.
    #[error("wrong JSON payload: missing updateAction")]
    MalformedJson,

    /// The request path is not a known context broker endpoint.
    #[error("action not found for path {path}")]
    RouteNotFound {
        /// The path that was inspected.
        path: String,
    },
}

fn diagnostic_suffix(diagnostic: Option<&str>) -> String {
    diagnostic.map(|d| format!(": {d}")).unwrap_or_default()
}

impl ClassificationError {
    /// Creates a malformed XML error carrying a parser diagnostic.
    #[must_use]
    pub fn malformed_xml(diagnostic: impl Into<String>) -> Self {
        Self::MalformedXml {
            diagnostic: Some(diagnostic.into()),
        }
    }

    /// Creates a malformed XML error for a payload with no action text.
    #[must_use]
    pub const fn missing_xml_action() -> Self {
        Self::MalformedXml { diagnostic: None }
    }

    /// Creates a route-not-found error.
    #[must_use]
    pub fn route_not_found(path: impl Into<String>) -> Self {
        Self::RouteNotFound { path: path.into() }
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedXml { .. } => ErrorKind::MalformedXml,
            Self::MalformedJson => ErrorKind::MalformedJson,
            Self::RouteNotFound { .. } => ErrorKind::RouteNotFound,
        }
    }

    /// Returns the client-facing error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MalformedXml { .. } => "WRONG_XML_PAYLOAD",
            Self::MalformedJson => "WRONG_JSON_PAYLOAD",
            Self::RouteNotFound { .. } => "ACTION_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code a rejection should carry.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Returns the nested diagnostic, if any.
    #[must_use]
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::MalformedXml { diagnostic } => diagnostic.as_deref(),
            Self::MalformedJson | Self::RouteNotFound { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            ClassificationError::missing_xml_action().kind(),
            ErrorKind::MalformedXml
        );
        assert_eq!(ClassificationError::MalformedJson.kind(), ErrorKind::MalformedJson);
        assert_eq!(
            ClassificationError::route_not_found("/x").kind(),
            ErrorKind::RouteNotFound
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(ClassificationError::malformed_xml("eof").code(), "WRONG_XML_PAYLOAD");
        assert_eq!(ClassificationError::MalformedJson.code(), "WRONG_JSON_PAYLOAD");
        assert_eq!(ClassificationError::route_not_found("/x").code(), "ACTION_NOT_FOUND");
    }

    #[test]
    fn test_all_kinds_are_bad_request() {
        for err in [
            ClassificationError::missing_xml_action(),
            ClassificationError::MalformedJson,
            ClassificationError::route_not_found("/x"),
        ] {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_display_includes_diagnostic() {
        let err = ClassificationError::malformed_xml("unexpected end of input");
        assert_eq!(err.to_string(), "wrong XML payload: unexpected end of input");
        assert_eq!(err.diagnostic(), Some("unexpected end of input"));

        let bare = ClassificationError::missing_xml_action();
        assert_eq!(bare.to_string(), "wrong XML payload");
        assert_eq!(bare.diagnostic(), None);
    }

    #[test]
    fn test_route_not_found_display() {
        let err = ClassificationError::route_not_found("/foo/bar");
        assert!(err.to_string().contains("/foo/bar"));
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&ErrorKind::RouteNotFound).unwrap();
        assert_eq!(json, r#""route-not-found""#);
        assert_eq!(ErrorKind::MalformedXml.to_string(), "malformed-xml");
    }
}
