//! Action classification middleware.
//!
//! Computes the NGSI action of the incoming request and records it in the
//! [`MiddlewareContext`] for the authorization stage. Requests that cannot be
//! classified are rejected with a `400 Bad Request` error envelope and never
//! reach the handler.
//!
//! The stage buffers the body, hands the core classifier the request path,
//! the headers and the raw bytes, and forwards the untouched bytes on
//! success. JSON bodies are pre-parsed only for an exact
//! `application/json` content type; a JSON syntax error leaves the parsed
//! body empty so that the classifier reports it as malformed.

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response, ResponseExt};
use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use ngsi_pep_core::{classify, Action, ActionRequest, BodyFormat, CONTENT_TYPE};
use ngsi_pep_telemetry::metrics;

/// Default cap on buffered request bodies (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Outcome of a successful classification, stored in the context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionClassification {
    /// The computed action. `None` when the update body carried an
    /// unrecognized `updateAction` token.
    pub action: Option<Action>,
    /// The request path the action was computed from.
    pub path: String,
}

/// Middleware that classifies each request into an NGSI [`Action`].
#[derive(Debug, Clone)]
pub struct ActionClassificationMiddleware {
    max_body_bytes: usize,
}

impl Default for ActionClassificationMiddleware {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ActionClassificationMiddleware {
    /// Creates a classification stage with the default body cap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum body size the stage will buffer.
    #[must_use]
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Returns the configured body cap.
    #[must_use]
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }
}

/// Converts the HTTP request parts into the classifier's request shape.
fn to_action_request(parts: &http::request::Parts, body: Bytes) -> ActionRequest {
    let mut builder = ActionRequest::builder(parts.uri.path());

    for (name, value) in &parts.headers {
        if let Ok(value) = value.to_str() {
            builder = builder.header(name.as_str(), value);
        }
    }

    let content_type = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    if BodyFormat::from_content_type(content_type) == BodyFormat::Json {
        if let Ok(value) = serde_json::from_slice(&body) {
            builder = builder.json_body(value);
        }
    }

    builder.body(body).build()
}

impl Middleware for ActionClassificationMiddleware {
    fn name(&self) -> &'static str {
        "action_classification"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let (parts, body) = request.into_parts();
            let bytes = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(never) => match never {},
            };

            if bytes.len() > self.max_body_bytes {
                tracing::warn!(
                    request_id = %ctx.request_id(),
                    body_bytes = bytes.len(),
                    max_body_bytes = self.max_body_bytes,
                    "request body exceeds classification limit"
                );
                return Response::json_error(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "PAYLOAD_TOO_LARGE",
                    &format!("request body exceeds {} bytes", self.max_body_bytes),
                    ctx.request_id(),
                );
            }

            let mut action_request = to_action_request(&parts, bytes.clone());
            match classify(&mut action_request) {
                Ok(action) => {
                    metrics::record_classification(action);
                    ctx.set_classification(ActionClassification {
                        action,
                        path: parts.uri.path().to_string(),
                    });

                    let request = Request::from_parts(parts, Full::new(bytes));
                    next.run(ctx, request).await
                }
                Err(err) => {
                    metrics::record_classification_failure(err.kind());
                    Response::json_error(
                        err.status_code(),
                        err.code(),
                        &err.to_string(),
                        ctx.request_id(),
                    )
                }
            }
        })
    }
}
