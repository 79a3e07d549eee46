//! Playlist hydration.
//!
//! # Per-video state machine
//! ```text
//! PENDING → RESOLVED     (video appended, next stub)
//! PENDING → FAILED-STOP  (remaining stubs of this playlist dropped)
//! ```
//! No retries. A failed stop never reaches sibling playlists.
//!
//! Everything runs sequentially: the store read, the parse, then one
//! downstream call per stub in playlist order.

use std::sync::Arc;

use crate::aggregation::client::{FetchError, VideoSource};
use crate::error::ApiError;
use crate::model::{HydratedPlaylist, PlaylistStub};
use crate::observability::{metrics, Span};
use crate::store::Store;

pub const STORE_SPAN: &str = "playlist-api: redis-get";
pub const FETCH_SPAN: &str = "playlist-api: videos-api GET /id";

/// Substituted when the playlist collection cannot be read.
const EMPTY_COLLECTION: &str = "[]";

/// Expands stored playlist stubs into full playlists.
pub struct Aggregator {
    store: Arc<dyn Store>,
    videos: Arc<dyn VideoSource>,
    playlist_key: String,
}

impl Aggregator {
    pub fn new(store: Arc<dyn Store>, videos: Arc<dyn VideoSource>, playlist_key: impl Into<String>) -> Self {
        Self {
            store,
            videos,
            playlist_key: playlist_key.into(),
        }
    }

    /// Load every playlist and resolve its videos.
    ///
    /// Only malformed data is an error. An unreadable collection yields no
    /// playlists; a failed downstream call truncates its playlist.
    pub async fn hydrate(&self, span: &Span) -> Result<Vec<HydratedPlaylist>, ApiError> {
        let raw = self.load_stubs(span).await;
        let stubs: Vec<PlaylistStub> = serde_json::from_str(&raw)?;

        tracing::debug!(playlists = stubs.len(), "Hydrating playlists");

        let mut playlists = Vec::with_capacity(stubs.len());
        for stub in &stubs {
            playlists.push(self.hydrate_playlist(stub, span).await?);
        }
        Ok(playlists)
    }

    async fn load_stubs(&self, span: &Span) -> String {
        let store_span = span.child(STORE_SPAN);
        store_span.set_tag("store.key", self.playlist_key.as_str());

        match self.store.get(&self.playlist_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::warn!(key = %self.playlist_key, "Playlist collection missing, serving none");
                store_span.set_error("key not found");
                metrics::record_store_fallback();
                EMPTY_COLLECTION.to_string()
            }
            Err(e) => {
                tracing::warn!(key = %self.playlist_key, error = %e, "Playlist collection unreadable, serving none");
                store_span.set_error(&e);
                metrics::record_store_fallback();
                EMPTY_COLLECTION.to_string()
            }
        }
    }

    async fn hydrate_playlist(&self, stub: &PlaylistStub, span: &Span) -> Result<HydratedPlaylist, ApiError> {
        let mut playlist = HydratedPlaylist::from_stub(stub);

        for (position, video) in stub.videos.iter().enumerate() {
            let fetch_span = span.child(FETCH_SPAN);
            fetch_span.set_tag("playlist.id", stub.id.as_str());
            fetch_span.set_tag("video.id", video.id.as_str());

            match self.videos.fetch(&video.id, fetch_span.context()).await {
                Ok(resolved) => {
                    fetch_span.finish();
                    metrics::record_video_fetch(if resolved.is_not_found() { "not_found" } else { "resolved" });
                    playlist.videos.push(resolved);
                }
                Err(FetchError::Decode(e)) => {
                    fetch_span.set_error(&e);
                    return Err(ApiError::Malformed(e));
                }
                Err(e) => {
                    fetch_span.set_error(&e);
                    fetch_span.finish();
                    tracing::warn!(
                        playlist_id = %stub.id,
                        video_id = %video.id,
                        position,
                        dropped = stub.videos.len() - position,
                        error = %e,
                        "Video lookup failed, truncating playlist"
                    );
                    metrics::record_video_fetch("failed");
                    metrics::record_truncation();
                    break;
                }
            }
        }

        Ok(playlist)
    }
}
