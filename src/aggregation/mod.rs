//! Playlist aggregation subsystem (the `playlist-api` service).
//!
//! # Data Flow
//! ```text
//! GET /
//!     → orchestrator.rs: store read of the playlist key ("[]" on failure)
//!     → parse Vec<PlaylistStub> (fatal on malformed data)
//!     → for each playlist, for each stub, in order:
//!           client.rs: GET {videos_api_url}/{id} with traceparent
//!           ok   → append Video
//!           fail → stop this playlist
//!     → Vec<HydratedPlaylist>
//! ```

pub mod client;
pub mod orchestrator;

pub use client::{FetchError, HttpVideoSource, VideoSource};
pub use orchestrator::Aggregator;
