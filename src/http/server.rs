//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router for either service
//! - Wire up middleware (tracing, request id, panic isolation, debug CORS)
//! - Bind server to listener
//! - Stop on the shutdown broadcast

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::playlists::{get_playlists, PlaylistState};
use crate::http::response::with_cors;
use crate::http::videos::{get_video, VideoState};
use crate::{PLAYLIST_SERVICE, VIDEO_SERVICE};

/// HTTP server for one of the two services.
pub struct HttpServer {
    service: &'static str,
    router: Router,
}

impl HttpServer {
    /// Aggregation service: `GET /`.
    pub fn playlists(config: &ServiceConfig, state: PlaylistState) -> Self {
        let router = Router::new()
            .route("/", get(get_playlists))
            .with_state(state);
        Self {
            service: PLAYLIST_SERVICE,
            router: Self::with_layers(router, config),
        }
    }

    /// Video lookup service: `GET /{id}`.
    pub fn videos(config: &ServiceConfig, state: VideoState) -> Self {
        let router = Router::new()
            .route("/{id}", get(get_video))
            .with_state(state);
        Self {
            service: VIDEO_SERVICE,
            router: Self::with_layers(router, config),
        }
    }

    /// Shared middleware stack. The last layer added runs first.
    fn with_layers(router: Router, config: &ServiceConfig) -> Router {
        with_cors(router, config.is_debug())
            .layer(CatchPanicLayer::new())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    /// The complete router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(service = self.service, address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!(service = self.service, "HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{Aggregator, HttpVideoSource};
    use crate::lookup::build_lookup;
    use crate::observability::Tracer;
    use crate::store::MemoryStore;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn video_server(config: &ServiceConfig, store: &MemoryStore) -> HttpServer {
        let state = VideoState {
            lookup: build_lookup(Arc::new(store.clone()), &config.faults),
            tracer: Tracer::unexported(),
        };
        HttpServer::videos(config, state)
    }

    async fn get(router: Router, uri: &str) -> axum::response::Response {
        router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_video_found_and_absent() {
        let store = MemoryStore::new();
        store.insert("v1", r#"{"id":"v1","title":"One"}"#);
        let server = video_server(&ServiceConfig::default(), &store);

        let found = get(server.router(), "/v1").await;
        assert_eq!(found.status(), StatusCode::OK);
        assert_eq!(found.headers()[header::CONTENT_TYPE], "application/json");
        assert!(found.headers().contains_key("x-request-id"));
        assert_eq!(body_string(found).await, r#"{"id":"v1","title":"One"}"#);

        let absent = get(server.router(), "/v2").await;
        assert_eq!(absent.status(), StatusCode::OK);
        assert_eq!(body_string(absent).await, "{}");
    }

    #[tokio::test]
    async fn test_video_store_error_is_request_scoped_500() {
        let store = MemoryStore::new();
        store.insert("v1", r#"{"id":"v1"}"#);
        let server = video_server(&ServiceConfig::default(), &store);

        store.set_unavailable(true);
        let failed = get(server.router(), "/v1").await;
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = serde_json::from_str(&body_string(failed).await).unwrap();
        assert!(json["error"].as_str().unwrap().starts_with("store error"));

        store.set_unavailable(false);
        assert_eq!(get(server.router(), "/v1").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_only_in_debug() {
        let store = MemoryStore::new();

        let plain = video_server(&ServiceConfig::default(), &store);
        let response = get(plain.router(), "/v1").await;
        assert!(!response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));

        let debug_config = ServiceConfig {
            environment: "DEBUG".into(),
            ..ServiceConfig::default()
        };
        let debug = video_server(&debug_config, &store);
        let response = get(debug.router(), "/v1").await;
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
            "POST, GET, OPTIONS, PUT, DELETE"
        );
    }

    #[tokio::test]
    async fn test_playlists_with_unreachable_downstream() {
        let store = MemoryStore::new();
        store.insert("playlist", r#"[{"id":"p1","name":"Mix","videos":[{"id":"v1"}]}]"#);
        let config = ServiceConfig::default();
        let aggregator = Aggregator::new(
            Arc::new(store.clone()),
            Arc::new(HttpVideoSource::new("http://127.0.0.1:1").unwrap()),
            config.store.playlist_key.clone(),
        );
        let state = PlaylistState {
            aggregator: Arc::new(aggregator),
            tracer: Tracer::unexported(),
        };
        let server = HttpServer::playlists(&config, state);
        assert_eq!(server.service(), PLAYLIST_SERVICE);

        let response = get(server.router(), "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"[{"id":"p1","name":"Mix","videos":[]}]"#);
    }
}
