//! Playlist fan-out services.
//!
//! ```text
//!  client ──GET /──▶ playlist-api ──get("playlist")──▶ store
//!                        │
//!                        │  one call per video stub, in order,
//!                        │  traceparent injected
//!                        ▼
//!                    video-api ──get(<id>)──▶ store
//! ```
//!
//! `playlist-api` answers with every playlist and its videos resolved;
//! `video-api` answers with one stored video, or `{}`.

pub mod aggregation;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod lookup;
pub mod model;
pub mod observability;
pub mod store;

/// Service name of the aggregation service (spans, metrics, logs).
pub const PLAYLIST_SERVICE: &str = "playlist-api";

/// Service name of the video lookup service.
pub const VIDEO_SERVICE: &str = "video-api";

pub use config::ServiceConfig;
pub use error::ApiError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
