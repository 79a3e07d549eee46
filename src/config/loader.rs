//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {name}: '{value}'")]
    Env { name: &'static str, value: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: optional TOML file, then environment overrides, then
/// validation.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply the deployment environment variables on top of `config`.
///
/// `lookup` resolves a variable name; tests pass a map instead of the process
/// environment.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(environment) = lookup("ENVIRONMENT") {
        config.environment = environment;
    }
    if let Some(bind) = lookup("BIND_ADDRESS") {
        config.listener.bind_address = bind;
    }
    if let Some(host) = lookup("REDIS_HOST") {
        config.store.host = host;
    }
    if let Some(port) = lookup("REDIS_PORT") {
        config.store.port = port.trim().parse().map_err(|_| ConfigError::Env {
            name: "REDIS_PORT",
            value: port.clone(),
        })?;
    }
    if let Some(agent) = lookup("JAEGER_HOST_PORT").filter(|a| !a.is_empty()) {
        config.tracing.agent_address = Some(agent);
    }
    if let Some(url) = lookup("VIDEOS_API_URL") {
        config.downstream.videos_api_url = url;
    }
    // Only the literal "true" switches a fault on.
    if let Some(flaky) = lookup("FLAKY") {
        config.faults.flaky = flaky == "true";
    }
    if let Some(delay) = lookup("DELAY") {
        config.faults.delay = delay == "true";
    }

    Ok(())
}
