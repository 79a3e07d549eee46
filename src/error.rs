//! Request-fatal errors.
//!
//! Anything that reaches the handler boundary as an `ApiError` aborts that one
//! request with a 500 and a JSON error body. Recoverable conditions (absent
//! video, failed downstream call, store outage during aggregation) never
//! become an `ApiError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The store failed while looking up a single video.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Stored or exchanged data could not be (de)serialized.
    #[error("malformed data: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Fault injection aborted the request.
    #[error("injected fault: {0}")]
    Injected(&'static str),
}

impl ApiError {
    /// Short machine-readable kind for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Store(_) => "store",
            ApiError::Malformed(_) => "malformed",
            ApiError::Injected(_) => "injected",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(kind = self.kind(), error = %self, "Request aborted");
        let body = Json(json!({
            "error": self.to_string(),
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
