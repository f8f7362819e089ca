//! Top-level classification entry points.
//!
//! [`classify`] decides whether a request is classified by its body or by its
//! URL and invokes the matching inspector:
//!
//! 1. If the lowercased path contains [`UPDATE_CONTEXT_PATH`], the body
//!    inspector is chosen by the exact `content-type` value. Unsupported or
//!    missing content types leave the action unset without an error.
//! 2. Otherwise the URL inspector runs on the path.

use crate::action::Action;
use crate::error::{ClassificationError, ClassificationResult};
use crate::inspect::{inspect_json, inspect_url, inspect_xml};
use crate::request::ActionRequest;

/// Path signature of the endpoint whose action lives in the body.
pub const UPDATE_CONTEXT_PATH: &str = "/ngsi10/updatecontext";

/// Payload format, selected from the `content-type` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// `application/json`
    Json,
    /// `application/xml` or `text/xml`
    Xml,
    /// Anything else, including a missing header.
    Unsupported,
}

impl BodyFormat {
    /// Selects the format by exact, case-sensitive match on the header value.
    ///
    /// # Example
    ///
    /// ```
    /// use ngsi_pep_core::BodyFormat;
    ///
    /// assert_eq!(BodyFormat::from_content_type(Some("text/xml")), BodyFormat::Xml);
    /// assert_eq!(
    ///     BodyFormat::from_content_type(Some("application/json; charset=utf-8")),
    ///     BodyFormat::Unsupported
    /// );
    /// ```
    #[must_use]
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type {
            Some("application/json") => Self::Json,
            Some("application/xml" | "text/xml") => Self::Xml,
            _ => Self::Unsupported,
        }
    }
}

/// Classifies the request and records the computed action on it.
///
/// On failure the request's action is left unset.
///
/// # Example
///
/// ```
/// use ngsi_pep_core::{classify, Action, ActionRequest, ErrorKind};
/// use serde_json::json;
///
/// let mut request = ActionRequest::builder("/ngsi10/updateContext")
///     .header("content-type", "application/json")
///     .json_body(json!({"updateAction": "UPDATE"}))
///     .build();
/// assert_eq!(classify(&mut request).unwrap(), Some(Action::Update));
///
/// let mut unknown = ActionRequest::builder("/foo/bar").build();
/// assert_eq!(classify(&mut unknown).unwrap_err().kind(), ErrorKind::RouteNotFound);
/// ```
pub fn classify(request: &mut ActionRequest) -> ClassificationResult<Option<Action>> {
    let outcome = compute_action(request);

    match &outcome {
        Ok(action) => {
            tracing::debug!(
                path = %request.path(),
                action = action.map_or("unset", Action::as_str),
                "request classified"
            );
            request.set_action(*action);
        }
        Err(err) => {
            tracing::warn!(
                path = %request.path(),
                error.kind = %err.kind(),
                error = %err,
                "request could not be classified"
            );
            request.set_action(None);
        }
    }

    outcome
}

fn compute_action(request: &ActionRequest) -> ClassificationResult<Option<Action>> {
    if !request.path().to_lowercase().contains(UPDATE_CONTEXT_PATH) {
        return inspect_url(request.path()).map(Some);
    }

    match BodyFormat::from_content_type(request.content_type()) {
        BodyFormat::Json => inspect_json(request.parsed_body()),
        BodyFormat::Xml => inspect_xml(request.raw_body()),
        BodyFormat::Unsupported => {
            tracing::debug!(
                path = %request.path(),
                content_type = request.content_type().unwrap_or("none"),
                "no body inspector for content type"
            );
            Ok(None)
        }
    }
}

/// The single completion of a classification call.
///
/// Carries the optional error, the annotated request and the response handle,
/// which is forwarded without modification.
#[derive(Debug)]
pub struct Completion<R> {
    /// The classification error, if classification failed.
    pub error: Option<ClassificationError>,
    /// The request, with its action set on success.
    pub request: ActionRequest,
    /// The untouched response handle.
    pub response: R,
}

impl<R> Completion<R> {
    /// Returns true if classification succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Splits the completion into a `Result`.
    pub fn into_result(self) -> Result<(ActionRequest, R), (ClassificationError, ActionRequest, R)> {
        match self.error {
            None => Ok((self.request, self.response)),
            Some(err) => Err((err, self.request, self.response)),
        }
    }
}

/// Classifies a request and reports the outcome exactly once.
///
/// This is the composable form of [`classify`]: the request and response are
/// moved in and handed back together with the error, if any.
///
/// # Example
///
/// ```
/// use ngsi_pep_core::{extract_action, Action, ActionRequest};
///
/// let request = ActionRequest::builder("/ngsi9/registerContext").build();
/// let done = extract_action(request, "response");
/// assert!(done.is_ok());
/// assert_eq!(done.request.action(), Some(Action::Register));
/// assert_eq!(done.response, "response");
/// ```
pub fn extract_action<R>(mut request: ActionRequest, response: R) -> Completion<R> {
    let error = classify(&mut request).err();
    Completion {
        error,
        request,
        response,
    }
}
