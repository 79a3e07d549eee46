//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Observability → Store client → Service state → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received (signals.rs) → broadcast → server stops accepting,
//!     in-flight requests finish
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
