//! Configuration validation.
//!
//! Serde handles syntax; this checks values. All problems are reported at
//! once rather than stopping at the first.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("store.port must be non-zero")]
    StorePort,

    #[error("store.playlist_key must not be empty")]
    PlaylistKey,

    #[error("downstream.videos_api_url '{0}' is not an http(s) URL")]
    DownstreamUrl(String),

    #[error("faults.flaky_ratio {0} is outside 0.0..=1.0")]
    FlakyRatio(f64),

    #[error("faults.delay_secs must be positive when delay is enabled")]
    DelaySecs,

    #[error("tracing.agent_address '{0}' is not host:port")]
    AgentAddress(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Validate a configuration, returning every error found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.store.port == 0 {
        errors.push(ValidationError::StorePort);
    }
    if config.store.playlist_key.is_empty() {
        errors.push(ValidationError::PlaylistKey);
    }

    let downstream = &config.downstream.videos_api_url;
    match url::Url::parse(downstream) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::DownstreamUrl(downstream.clone())),
    }

    let ratio = config.faults.flaky_ratio;
    if !(0.0..=1.0).contains(&ratio) {
        errors.push(ValidationError::FlakyRatio(ratio));
    }
    if config.faults.delay && config.faults.delay_secs == 0 {
        errors.push(ValidationError::DelaySecs);
    }

    if let Some(agent) = &config.tracing.agent_address {
        if !is_host_port(agent) {
            errors.push(ValidationError::AgentAddress(agent.clone()));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// Hostnames are allowed, so this cannot be a SocketAddr parse.
fn is_host_port(value: &str) -> bool {
    match value.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && port.parse::<u16>().is_ok_and(|p| p != 0),
        None => false,
    }
}
