//! Common types used throughout the middleware pipeline.

use crate::context::RequestId;
use bytes::Bytes;
use http_body_util::Full;

/// The HTTP request type used in the middleware pipeline.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type used in the middleware pipeline.
pub type Response = http::Response<Full<Bytes>>;

/// Extension trait for building error responses.
pub trait ResponseExt {
    /// Creates a JSON error envelope:
    ///
    /// ```json
    /// {"error": {"code": "...", "message": "...", "request_id": "..."}}
    /// ```
    fn json_error(
        status: http::StatusCode,
        code: &str,
        message: &str,
        request_id: RequestId,
    ) -> Response;
}

impl ResponseExt for Response {
    fn json_error(
        status: http::StatusCode,
        code: &str,
        message: &str,
        request_id: RequestId,
    ) -> Response {
        let body = serde_json::json!({
            "error": {
                "code": code,
                "message": message,
                "request_id": request_id.to_string()
            }
        });

        let mut response = http::Response::new(Full::new(Bytes::from(body.to_string())));
        *response.status_mut() = status;
        response.headers_mut().insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        );
        response
    }
}
