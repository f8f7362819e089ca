//! The request descriptor inspected by the classifier.

use crate::action::Action;
use bytes::Bytes;
use std::collections::HashMap;

/// Header key used to select the body inspector.
pub const CONTENT_TYPE: &str = "content-type";

/// A request as seen by the action classifier.
///
/// Header keys are stored exactly as received; lookups are case-sensitive.
/// `parsed_body` is only expected to be present for JSON requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionRequest {
    path: String,
    headers: HashMap<String, String>,
    raw_body: Bytes,
    parsed_body: Option<serde_json::Value>,
    action: Option<Action>,
}

impl ActionRequest {
    /// Starts building a request for the given path.
    #[must_use]
    pub fn builder(path: impl Into<String>) -> ActionRequestBuilder {
        ActionRequestBuilder {
            request: Self {
                path: path.into(),
                ..Self::default()
            },
        }
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Looks up a header by its exact key.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Returns the `content-type` header, if present.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE)
    }

    /// Returns the raw body bytes.
    #[must_use]
    pub fn raw_body(&self) -> &Bytes {
        &self.raw_body
    }

    /// Returns the pre-parsed JSON body, if any.
    #[must_use]
    pub fn parsed_body(&self) -> Option<&serde_json::Value> {
        self.parsed_body.as_ref()
    }

    /// Returns the computed action, if classification has set one.
    #[must_use]
    pub fn action(&self) -> Option<Action> {
        self.action
    }

    pub(crate) fn set_action(&mut self, action: Option<Action>) {
        self.action = action;
    }
}

/// Builder for [`ActionRequest`].
#[derive(Debug)]
pub struct ActionRequestBuilder {
    request: ActionRequest,
}

impl ActionRequestBuilder {
    /// Adds a header, replacing any previous value under the same key.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the raw body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.request.raw_body = body.into();
        self
    }

    /// Sets the pre-parsed JSON body.
    #[must_use]
    pub fn json_body(mut self, body: serde_json::Value) -> Self {
        self.request.parsed_body = Some(body);
        self
    }

    /// Finishes building the request.
    #[must_use]
    pub fn build(self) -> ActionRequest {
        self.request
    }
}
