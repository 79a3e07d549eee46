//! Startup orchestration.
//!
//! Order: config (done by the binary) → logging, metrics, span export →
//! service state → listener. Any error before the listener is bound is fatal.

use std::net::SocketAddr;
use opentelemetry_sdk::runtime;
use opentelemetry_sdk::trace::TracerProvider;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::aggregation::{Aggregator, HttpVideoSource};
use crate::config::{ServiceConfig, TracingConfig};
use crate::http::{HttpServer, PlaylistState, VideoState};
use crate::lifecycle::Shutdown;
use crate::lookup::build_lookup;
use crate::observability::{logging, metrics, Tracer};
use crate::store::Store;

/// Initialize logging and metrics, and return the service's tracer.
pub fn init_observability(service: &'static str, config: &ServiceConfig) -> Tracer {
    logging::init(&config.observability);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    Tracer::new(span_provider(service, &config.tracing))
}

/// Provider reporting to the Jaeger agent when one is configured. Without
/// a usable agent, spans still get ids and propagate but are not reported.
pub fn span_provider(service: &'static str, config: &TracingConfig) -> TracerProvider {
    let Some(agent) = &config.agent_address else {
        return TracerProvider::builder().build();
    };
    let built = opentelemetry_jaeger::new_agent_pipeline()
        .with_endpoint(agent.as_str())
        .with_service_name(service)
        .with_auto_split_batch(true)
        .build_batch(runtime::Tokio);
    match built {
        Ok(provider) => {
            tracing::info!(agent = %agent, "Reporting spans to Jaeger agent");
            provider
        }
        Err(e) => {
            tracing::warn!(agent = %agent, error = %e, "Jaeger agent unusable, spans will not be reported");
            TracerProvider::builder().build()
        }
    }
}

/// Aggregation service wired to the configured lookup service.
pub fn playlist_server(
    config: &ServiceConfig,
    store: Arc<dyn Store>,
    tracer: Tracer,
) -> Result<HttpServer, url::ParseError> {
    let videos = HttpVideoSource::new(&config.downstream.videos_api_url)?;
    let aggregator = Aggregator::new(store, Arc::new(videos), config.store.playlist_key.clone());

    tracing::info!(
        videos_api_url = %config.downstream.videos_api_url,
        playlist_key = %config.store.playlist_key,
        "Aggregation service configured"
    );

    let state = PlaylistState {
        aggregator: Arc::new(aggregator),
        tracer,
    };
    Ok(HttpServer::playlists(config, state))
}

/// Video lookup service, with fault injection if enabled.
pub fn video_server(config: &ServiceConfig, store: Arc<dyn Store>, tracer: Tracer) -> HttpServer {
    let state = VideoState {
        lookup: build_lookup(store, &config.faults),
        tracer,
    };
    HttpServer::videos(config, state)
}

/// Bind the configured address and serve until SIGINT/SIGTERM.
pub async fn serve(server: HttpServer, config: &ServiceConfig) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        service = server.service(),
        address = %listener.local_addr()?,
        debug = config.is_debug(),
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();
    server.run(listener, shutdown.subscribe()).await
}
