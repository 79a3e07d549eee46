//! Store-backed video lookup.
//!
//! A store failure fails the request but is only logged; the
//! `video-api: redis-get` span is never marked as an error.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::ApiError;
use crate::lookup::{Lookup, VideoLookup};
use crate::observability::{metrics, Span};
use crate::store::Store;

pub const STORE_SPAN: &str = "video-api: redis-get";

/// Reads the video record stored under its own id.
pub struct StoreLookup {
    store: Arc<dyn Store>,
}

impl StoreLookup {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl VideoLookup for StoreLookup {
    async fn lookup(&self, id: &str, span: &Span) -> Result<Lookup, ApiError> {
        let store_span = span.child(STORE_SPAN);
        store_span.set_tag("video.id", id);

        match self.store.get(id).await {
            Ok(Some(payload)) => {
                metrics::record_video_lookup("found");
                Ok(Lookup::Found(payload))
            }
            Ok(None) => {
                tracing::debug!(video_id = %id, "Video not found");
                metrics::record_video_lookup("not_found");
                Ok(Lookup::NotFound)
            }
            Err(e) => {
                tracing::error!(video_id = %id, error = %e, "Video store unreadable");
                metrics::record_video_lookup("error");
                Err(ApiError::Store(e))
            }
        }
    }
}
