//! Request ID middleware.
//!
//! Every request gets a request ID before classification runs, so that
//! classification failures and authorization denials can be correlated with
//! the log lines that explain them.
//!
//! ## Request ID Sources
//!
//! 1. **X-Request-ID header**: used only when the stage trusts incoming IDs
//! 2. **Generated UUID v7**: otherwise
//!
//! The stage always echoes the ID in the `X-Request-ID` response header.

use crate::context::{MiddlewareContext, RequestId};
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};
use http::HeaderValue;
use uuid::Uuid;

/// The header name for request ID propagation.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Middleware that generates or extracts request IDs.
#[derive(Debug, Clone, Default)]
pub struct RequestIdMiddleware {
    /// Whether to trust incoming request ID headers.
    trust_incoming: bool,
}

impl RequestIdMiddleware {
    /// Creates a stage that always generates a fresh ID.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stage that reuses a valid incoming `X-Request-ID`.
    #[must_use]
    pub fn trust_incoming() -> Self {
        Self { trust_incoming: true }
    }

    /// Sets whether incoming IDs are trusted.
    #[must_use]
    pub fn with_trust_incoming(mut self, trust: bool) -> Self {
        self.trust_incoming = trust;
        self
    }

    fn extract_request_id(&self, request: &Request) -> Option<RequestId> {
        if !self.trust_incoming {
            return None;
        }

        request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(RequestId::from_uuid)
    }
}

impl Middleware for RequestIdMiddleware {
    fn name(&self) -> &'static str {
        "request_id"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let request_id = self
                .extract_request_id(&request)
                .unwrap_or_else(RequestId::new);
            ctx.set_request_id(request_id);

            let mut response = next.run(ctx, request).await;

            // A hyphenated UUID is always a valid header value.
            if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                response.headers_mut().insert(REQUEST_ID_HEADER, value);
            }

            response
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{Request as HttpRequest, Response as HttpResponse, StatusCode};
    use http_body_util::Full;

    fn request_with_id(request_id: Option<&str>) -> Request {
        let mut builder = HttpRequest::builder().uri("/ngsi10/queryContext");
        if let Some(id) = request_id {
            builder = builder.header(REQUEST_ID_HEADER, id);
        }
        builder.body(Full::new(Bytes::new())).unwrap()
    }

    fn create_handler(
    ) -> impl FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send {
        |_ctx, _req| {
            Box::pin(async {
                HttpResponse::builder()
                    .status(StatusCode::OK)
                    .body(Full::new(Bytes::from("OK")))
                    .unwrap()
            })
        }
    }

    #[tokio::test]
    async fn test_generates_request_id_when_missing() {
        let middleware = RequestIdMiddleware::new();
        let mut ctx = MiddlewareContext::new();

        let response = middleware
            .process(&mut ctx, request_with_id(None), Next::handler(create_handler()))
            .await;

        let header_id = response.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap();
        assert_eq!(ctx.request_id().to_string(), header_id);
    }

    #[tokio::test]
    async fn test_ignores_incoming_id_when_not_trusted() {
        let middleware = RequestIdMiddleware::new();
        let mut ctx = MiddlewareContext::new();
        let incoming = "01890a5d-ac96-774b-bcce-b302099a8057";

        let response = middleware
            .process(&mut ctx, request_with_id(Some(incoming)), Next::handler(create_handler()))
            .await;

        let header_id = response.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap();
        assert_ne!(header_id, incoming);
    }

    #[tokio::test]
    async fn test_uses_incoming_id_when_trusted() {
        let middleware = RequestIdMiddleware::trust_incoming();
        let mut ctx = MiddlewareContext::new();
        let incoming = "01890a5d-ac96-774b-bcce-b302099a8057";

        let response = middleware
            .process(&mut ctx, request_with_id(Some(incoming)), Next::handler(create_handler()))
            .await;

        assert_eq!(ctx.request_id().to_string(), incoming);
        assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), incoming);
    }

    #[tokio::test]
    async fn test_invalid_incoming_id_is_replaced() {
        let middleware = RequestIdMiddleware::new().with_trust_incoming(true);
        let mut ctx = MiddlewareContext::new();

        let response = middleware
            .process(&mut ctx, request_with_id(Some("not-a-uuid")), Next::handler(create_handler()))
            .await;

        let header_id = response.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(header_id).is_ok());
    }
}
