//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request id)
//!     → playlists.rs  GET /      (aggregation service)
//!       videos.rs     GET /{id}  (video lookup service)
//!     → response.rs (JSON body, debug CORS)
//!     → Send to client
//! ```

pub mod playlists;
pub mod request;
pub mod response;
pub mod server;
pub mod videos;

pub use playlists::PlaylistState;
pub use request::{request_id, X_REQUEST_ID};
pub use server::HttpServer;
pub use videos::VideoState;
