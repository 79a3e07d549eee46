//! `GET /` on the aggregation service.

use axum::{
    extract::State,
    http::HeaderMap,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;

use crate::aggregation::Aggregator;
use crate::error::ApiError;
use crate::http::request::request_id;
use crate::http::response::json_body;
use crate::observability::{metrics, Tracer};
use crate::PLAYLIST_SERVICE;

pub const REQUEST_SPAN: &str = "playlist-api: GET /";

#[derive(Clone)]
pub struct PlaylistState {
    pub aggregator: Arc<Aggregator>,
    pub tracer: Tracer,
}

/// Return every playlist with its videos resolved.
pub async fn get_playlists(
    State(state): State<PlaylistState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let start = Instant::now();
    let request_id = request_id(&headers);

    let span = state.tracer.start_from(REQUEST_SPAN, &headers);
    span.set_tag("request.id", request_id);

    tracing::debug!(
        request_id = %request_id,
        trace_id = %span.trace_id(),
        "Aggregating playlists"
    );

    let rendered = match state.aggregator.hydrate(&span).await {
        Ok(playlists) => serde_json::to_string(&playlists).map_err(ApiError::from),
        Err(e) => Err(e),
    };

    match rendered {
        Ok(body) => {
            metrics::record_request(PLAYLIST_SERVICE, "/", 200, start);
            Ok(json_body(body))
        }
        Err(e) => {
            span.set_error(&e);
            metrics::record_request(PLAYLIST_SERVICE, "/", 500, start);
            Err(e)
        }
    }
}
