//! Configuration schema definitions.
//!
//! Both services share one schema; each binary reads the sections it needs.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for either service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Deployment environment. `DEBUG` enables CORS headers.
    pub environment: String,

    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Key-value store connection.
    pub store: StoreConfig,

    /// Video lookup service as seen from the aggregation service.
    pub downstream: DownstreamConfig,

    /// Span export settings.
    pub tracing: TracingConfig,

    /// Fault injection for the video lookup service.
    pub faults: FaultConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

impl ServiceConfig {
    /// True when running under the debug environment.
    pub fn is_debug(&self) -> bool {
        self.environment.eq_ignore_ascii_case("DEBUG")
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:10010").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:10010".to_string(),
        }
    }
}

/// Key-value store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,

    /// Key holding the serialized playlist collection.
    pub playlist_key: String,
}

impl StoreConfig {
    /// Connection URL for the store client.
    pub fn url(&self) -> String {
        format!("redis://{}:{}/", self.host, self.port)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            playlist_key: "playlist".to_string(),
        }
    }
}

/// Downstream video lookup service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DownstreamConfig {
    /// Base URL; the video id is appended as the last path segment.
    pub videos_api_url: String,
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            videos_api_url: "http://videos-api:10010".to_string(),
        }
    }
}

/// Span export configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TracingConfig {
    /// Jaeger agent "host:port" (UDP, Thrift compact). Spans are not
    /// reported when unset.
    pub agent_address: Option<String>,
}

/// Fault injection settings, off by default.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FaultConfig {
    /// Fail a fraction of lookups before doing any work.
    pub flaky: bool,

    /// Fraction of lookups failed in flaky mode (0.0 - 1.0).
    pub flaky_ratio: f64,

    /// Stall responses for the trigger video.
    pub delay: bool,

    /// Payloads containing this id are stalled in delay mode.
    pub delay_trigger_id: String,

    /// Stall duration in seconds.
    pub delay_secs: u64,
}

impl FaultConfig {
    /// True when at least one fault is switched on.
    pub fn any_enabled(&self) -> bool {
        self.flaky || self.delay
    }
}

impl Default for FaultConfig {
    fn default() -> Self {
        Self {
            flaky: false,
            flaky_ratio: 1.0 / 3.0,
            delay: false,
            delay_trigger_id: "jM36M39MA3I".to_string(),
            delay_secs: 6,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when `RUST_LOG` is not set.
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
