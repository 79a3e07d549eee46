//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use opentelemetry::trace::{SpanId, Status};
use opentelemetry::KeyValue;
use opentelemetry_sdk::export::trace::SpanData;
use opentelemetry_sdk::testing::trace::InMemorySpanExporter;
use opentelemetry_sdk::trace::{Config, TracerProvider};
use opentelemetry_sdk::Resource;

use playlist_fanout::config::ServiceConfig;
use playlist_fanout::lifecycle::startup;
use playlist_fanout::observability::Tracer;
use playlist_fanout::store::MemoryStore;
use playlist_fanout::{Shutdown, PLAYLIST_SERVICE, VIDEO_SERVICE};

/// A service running on an ephemeral loopback port. Stops when dropped.
pub struct RunningService {
    pub addr: SocketAddr,
    pub spans: Spans,
    shutdown: Shutdown,
}

/// Spans finished by one service.
pub struct Spans {
    exporter: InMemorySpanExporter,
}

impl Spans {
    /// Finished spans with the given name, in finishing order.
    pub fn named(&self, name: &str) -> Vec<SpanData> {
        self.exporter
            .get_finished_spans()
            .unwrap()
            .into_iter()
            .filter(|s| s.name == name)
            .collect()
    }
}

fn capture(service: &'static str) -> (Tracer, Spans) {
    let exporter = InMemorySpanExporter::default();
    let provider = TracerProvider::builder()
        .with_simple_exporter(exporter.clone())
        .with_config(
            Config::default().with_resource(Resource::new(vec![KeyValue::new("service.name", service)])),
        )
        .build();
    (Tracer::new(provider), Spans { exporter })
}

pub fn is_error(span: &SpanData) -> bool {
    matches!(span.status, Status::Error { .. })
}

pub fn parent_of(span: &SpanData) -> Option<SpanId> {
    Some(span.parent_span_id).filter(|id| *id != SpanId::INVALID)
}

impl RunningService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningService {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Config for a playlist-api that calls the lookup service at `videos`.
pub fn playlist_config(videos: SocketAddr) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.downstream.videos_api_url = format!("http://{}", videos);
    config
}

pub async fn start_video_api(config: ServiceConfig, store: &MemoryStore) -> RunningService {
    let (tracer, spans) = capture(VIDEO_SERVICE);
    let server = startup::video_server(&config, Arc::new(store.clone()), tracer);
    spawn(server, spans).await
}

pub async fn start_playlist_api(config: ServiceConfig, store: &MemoryStore) -> RunningService {
    let (tracer, spans) = capture(PLAYLIST_SERVICE);
    let server = startup::playlist_server(&config, Arc::new(store.clone()), tracer).unwrap();
    spawn(server, spans).await
}

async fn spawn(server: playlist_fanout::HttpServer, spans: Spans) -> RunningService {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    RunningService {
        addr,
        spans,
        shutdown,
    }
}

/// Start a programmable lookup backend on an ephemeral port.
///
/// `f` receives the request path. `Some((status, body))` is sent back;
/// `None` closes the connection without answering.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<(u16, String)>> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut reader = BufReader::new(socket);

                        let mut request_line = String::new();
                        if reader.read_line(&mut request_line).await.is_err() {
                            return;
                        }
                        let path = request_line
                            .split_whitespace()
                            .nth(1)
                            .unwrap_or("/")
                            .to_string();

                        // Drain headers; GET requests carry no body.
                        loop {
                            let mut line = String::new();
                            match reader.read_line(&mut line).await {
                                Ok(0) | Err(_) => return,
                                Ok(_) if line == "\r\n" => break,
                                Ok(_) => {}
                            }
                        }

                        let Some((status, body)) = f(path).await else {
                            return;
                        };
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let mut socket = reader.into_inner();
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Canned video payload for `id`.
pub fn video_json(id: &str) -> String {
    format!(
        r#"{{"id":"{id}","title":"Title {id}","description":"About {id}","imageurl":"https://img/{id}.jpg","url":"https://videos/{id}"}}"#
    )
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

pub async fn get_json(client: &reqwest::Client, url: &str) -> (u16, serde_json::Value) {
    let res = client.get(url).send().await.expect("service unreachable");
    let status = res.status().as_u16();
    let body = res.text().await.unwrap();
    (status, serde_json::from_str(&body).unwrap())
}
