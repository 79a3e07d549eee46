//! Request-side helpers.
//!
//! Request ids are generated by `SetRequestIdLayer` before any handler runs
//! and echoed back by `PropagateRequestIdLayer`.

use axum::http::HeaderMap;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Request id of the current request, or "unknown" outside the layer stack.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}
