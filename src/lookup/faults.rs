//! Fault injection for exercising callers.
//!
//! - flaky: a fraction of lookups fail before touching the store
//! - delay: payloads containing the trigger id are held back for a while

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

use crate::config::FaultConfig;
use crate::error::ApiError;
use crate::lookup::{Lookup, VideoLookup};
use crate::observability::{metrics, Span};

/// Wraps a lookup with the configured faults.
pub struct FaultInjector<L> {
    inner: L,
    config: FaultConfig,
}

impl<L> FaultInjector<L> {
    pub fn new(inner: L, config: FaultConfig) -> Self {
        Self { inner, config }
    }

    fn should_fail(&self) -> bool {
        self.config.flaky && rand::thread_rng().gen_bool(self.config.flaky_ratio)
    }

    fn should_stall(&self, outcome: &Lookup) -> bool {
        match outcome {
            Lookup::Found(payload) => {
                self.config.delay && payload.contains(&self.config.delay_trigger_id)
            }
            Lookup::NotFound => false,
        }
    }
}

#[async_trait]
impl<L: VideoLookup> VideoLookup for FaultInjector<L> {
    async fn lookup(&self, id: &str, span: &Span) -> Result<Lookup, ApiError> {
        if self.should_fail() {
            tracing::warn!(video_id = %id, "Injecting flaky failure");
            metrics::record_fault("flaky");
            return Err(ApiError::Injected("flaky error occurred"));
        }

        let outcome = self.inner.lookup(id, span).await?;

        if self.should_stall(&outcome) {
            tracing::info!(video_id = %id, delay_secs = self.config.delay_secs, "Injecting delay");
            metrics::record_fault("delay");
            tokio::time::sleep(Duration::from_secs(self.config.delay_secs)).await;
        }

        Ok(outcome)
    }
}
