//! Video lookup subsystem (the `video-api` service).
//!
//! # Data Flow
//! ```text
//! GET /{id}
//!     → faults.rs (optional: fail fast or stall)
//!     → store.rs (one store read keyed by the id)
//!     → Lookup::Found(payload) | Lookup::NotFound | ApiError (fatal)
//! ```
//!
//! # Design Decisions
//! - Absence is data: the handler answers `{}` with 200
//! - A store error is fatal for the request, unlike in the aggregation path
//! - Fault injection wraps the real lookup and is left out entirely when off

pub mod faults;
pub mod store;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::FaultConfig;
use crate::error::ApiError;
use crate::observability::Span;
use crate::store::Store;

pub use self::faults::FaultInjector;
pub use self::store::StoreLookup;

/// Result of looking up one video id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Stored payload, passed through untouched.
    Found(String),
    NotFound,
}

#[async_trait]
pub trait VideoLookup: Send + Sync {
    /// Resolve `id`. `span` is the request span; implementations may start
    /// children of it.
    async fn lookup(&self, id: &str, span: &Span) -> Result<Lookup, ApiError>;
}

/// Build the lookup chain for the given fault settings.
pub fn build_lookup(store: Arc<dyn Store>, faults: &FaultConfig) -> Arc<dyn VideoLookup> {
    let lookup = StoreLookup::new(store);
    if faults.any_enabled() {
        tracing::warn!(
            flaky = faults.flaky,
            flaky_ratio = faults.flaky_ratio,
            delay = faults.delay,
            delay_secs = faults.delay_secs,
            "Fault injection enabled"
        );
        Arc::new(FaultInjector::new(lookup, faults.clone()))
    } else {
        Arc::new(lookup)
    }
}
