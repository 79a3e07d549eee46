//! `GET /{id}` on the video lookup service.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;

use crate::error::ApiError;
use crate::http::request::request_id;
use crate::http::response::json_body;
use crate::lookup::{Lookup, VideoLookup};
use crate::model::NOT_FOUND_PAYLOAD;
use crate::observability::{metrics, Tracer};
use crate::VIDEO_SERVICE;

pub const REQUEST_SPAN: &str = "video-api: GET /id";

#[derive(Clone)]
pub struct VideoState {
    pub lookup: Arc<dyn VideoLookup>,
    pub tracer: Tracer,
}

/// Return the stored video, or `{}` when there is none.
pub async fn get_video(
    State(state): State<VideoState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let start = Instant::now();

    let span = state.tracer.start_from(REQUEST_SPAN, &headers);
    span.set_tag("video.id", id.as_str());

    tracing::debug!(request_id = %request_id(&headers), video_id = %id, "Looking up video");

    // A store failure leaves both spans untagged; only absence marks one.
    let outcome = match state.lookup.lookup(&id, &span).await {
        Ok(outcome) => outcome,
        Err(e) => {
            metrics::record_request(VIDEO_SERVICE, "/{id}", 500, start);
            return Err(e);
        }
    };

    let body = match outcome {
        Lookup::Found(payload) => payload,
        Lookup::NotFound => {
            span.set_error("video not found");
            NOT_FOUND_PAYLOAD.to_string()
        }
    };

    metrics::record_request(VIDEO_SERVICE, "/{id}", 200, start);
    Ok(json_body(body))
}
