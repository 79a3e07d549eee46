//! Key-value store access.
//!
//! # Data Flow
//! ```text
//! aggregation  → get("playlist")  ┐
//!                                 ├→ Store (Arc<dyn Store>, shared by all requests)
//! video lookup → get(<video id>)  ┘      → redis.rs  (production)
//!                                        → memory.rs (tests, local runs)
//! ```
//!
//! # Design Decisions
//! - Single-key reads only: no transactions, no locking
//! - Absence is `Ok(None)`, never an error
//! - Callers decide whether a `StoreError` is fatal

pub mod memory;
pub mod redis;

use async_trait::async_trait;
use thiserror::Error;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// Errors raised by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not reach the store.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store answered with something unusable.
    #[error("store protocol error: {0}")]
    Protocol(String),
}

/// Read-only view of the key-value store.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch the value stored under `key`, or `None` when it is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
}
