//! Downstream video lookups over HTTP.

use async_trait::async_trait;
use axum::http::HeaderMap;
use opentelemetry::Context;
use thiserror::Error;
use url::Url;

use crate::model::Video;
use crate::observability;

/// Why a single downstream lookup produced no video.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The call never completed (connect, reset, body read).
    #[error("transport error: {0}")]
    Transport(String),

    /// The lookup service answered, but not with success.
    #[error("lookup service answered {0}")]
    Status(u16),

    /// The lookup service answered with something that is not a video.
    #[error("malformed video payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Source of full video records, keyed by id.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Fetch one video. `trace` is the context of the span covering the call
    /// and must be propagated to the remote side.
    async fn fetch(&self, id: &str, trace: &Context) -> Result<Video, FetchError>;
}

/// Calls `GET {base}/{id}` on the video lookup service.
///
/// One pooled client is shared by every request. No timeout is set.
#[derive(Clone)]
pub struct HttpVideoSource {
    client: reqwest::Client,
    base: Url,
}

impl HttpVideoSource {
    pub fn new(base: &str) -> Result<Self, url::ParseError> {
        Ok(Self::with_client(reqwest::Client::new(), Url::parse(base)?))
    }

    pub fn with_client(client: reqwest::Client, base: Url) -> Self {
        Self { client, base }
    }

    /// URL for one video id; the id is percent-encoded as a path segment.
    pub fn video_url(&self, id: &str) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Transport(format!("cannot append a path to {}", self.base)))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }
}

#[async_trait]
impl VideoSource for HttpVideoSource {
    async fn fetch(&self, id: &str, trace: &Context) -> Result<Video, FetchError> {
        let url = self.video_url(id)?;
        let mut headers = HeaderMap::new();
        observability::inject(trace, &mut headers);

        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(serde_json::from_slice(&body)?)
    }
}
