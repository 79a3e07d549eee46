//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the orchestrator produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → tracing.rs (spans propagated across both services)
//!
//! Consumers:
//!     → stdout (plain or JSON)
//!     → Prometheus scrape (optional)
//!     → Jaeger agent (optional; spans still propagate without one)
//! ```

pub mod logging;
pub mod metrics;
pub mod tracing;

pub use self::tracing::{inject, Span, Tracer, TRACEPARENT};

#[cfg(test)]
pub(crate) use self::tracing::testing;
