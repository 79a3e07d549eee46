//! Distributed tracing support.
//!
//! # Responsibilities
//! - Extract W3C trace context from incoming requests
//! - Propagate the active span's context to downstream requests
//! - Create spans for requests, store reads and downstream calls
//!
//! # Design Decisions
//! - OpenTelemetry SDK; spans are reported to a Jaeger agent when configured
//! - Each service owns its provider, so both services can share one process
//! - A `Span` ends when dropped, so every return path closes it

use axum::http::HeaderMap;
use opentelemetry::propagation::TextMapPropagator;
use opentelemetry::trace::{Status, TraceContextExt, TraceId, Tracer as _, TracerProvider as _};
use opentelemetry::{Context, KeyValue};
use opentelemetry_http::{HeaderExtractor, HeaderInjector};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{self as sdktrace, TracerProvider};
use std::fmt;

/// W3C trace context header.
pub const TRACEPARENT: &str = "traceparent";

/// Trace context carried by `headers`. Empty when absent or malformed.
pub fn extract(headers: &HeaderMap) -> Context {
    TraceContextPropagator::new().extract(&HeaderExtractor(headers))
}

/// Write the span context of `cx` into `headers`.
pub fn inject(cx: &Context, headers: &mut HeaderMap) {
    TraceContextPropagator::new().inject_context(cx, &mut HeaderInjector(headers));
}

/// Span factory for one service.
#[derive(Clone)]
pub struct Tracer {
    // Keeps the provider, and with it the export pipeline, alive.
    provider: TracerProvider,
    tracer: sdktrace::Tracer,
}

impl Tracer {
    pub fn new(provider: TracerProvider) -> Self {
        let tracer = provider.tracer(env!("CARGO_PKG_NAME"));
        Self { provider, tracer }
    }

    /// Spans get ids and propagate, but are reported nowhere.
    pub fn unexported() -> Self {
        Self::new(TracerProvider::builder().build())
    }

    /// Start a span under `parent`; a new trace when `parent` has no span.
    pub fn start(&self, name: &'static str, parent: &Context) -> Span {
        let span = self.tracer.start_with_context(name, parent);
        Span {
            tracer: self.clone(),
            cx: parent.with_span(span),
        }
    }

    /// Start a span continuing the trace carried by `headers`.
    pub fn start_from(&self, name: &'static str, headers: &HeaderMap) -> Span {
        self.start(name, &extract(headers))
    }

    /// Export every finished span still buffered.
    pub fn flush(&self) {
        for result in self.provider.force_flush() {
            if let Err(e) = result {
                tracing::warn!(error = %e, "Failed to flush spans");
            }
        }
    }
}

/// An in-flight unit of work. Ends when finished or dropped.
pub struct Span {
    tracer: Tracer,
    cx: Context,
}

impl Span {
    /// Context to propagate to work caused by this span.
    pub fn context(&self) -> &Context {
        &self.cx
    }

    pub fn trace_id(&self) -> TraceId {
        self.cx.span().span_context().trace_id()
    }

    /// Start a child span in the same trace.
    pub fn child(&self, name: &'static str) -> Span {
        self.tracer.start(name, &self.cx)
    }

    pub fn set_tag(&self, key: &'static str, value: impl Into<String>) {
        self.cx.span().set_attribute(KeyValue::new(key, value.into()));
    }

    /// Mark the span as failed.
    pub fn set_error(&self, message: impl fmt::Display) {
        let span = self.cx.span();
        span.set_attribute(KeyValue::new("error", true));
        span.set_status(Status::error(message.to_string()));
    }

    /// Finish now rather than at end of scope.
    pub fn finish(self) {}
}

impl Drop for Span {
    fn drop(&mut self) {
        self.cx.span().end();
    }
}
