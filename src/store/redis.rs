//! Redis-backed store.

use async_trait::async_trait;
use ::redis::aio::MultiplexedConnection;
use ::redis::{AsyncCommands, Client, RedisError};
use tokio::sync::RwLock;

use crate::config::StoreConfig;
use crate::store::{Store, StoreError};

/// Long-lived Redis client shared by every request.
///
/// One multiplexed connection is opened on first use and cloned per request.
/// It is dropped after a connectivity error so the next read reconnects; a
/// store that is down at start-up behaves like one that goes down later.
pub struct RedisStore {
    client: Client,
    connection: RwLock<ConnectionSlot<MultiplexedConnection>>,
}

/// The cached connection, tagged with the generation it was opened in.
///
/// Invalidation names the generation that failed, so a request holding a
/// broken connection cannot discard a newer one opened meanwhile.
#[derive(Debug)]
struct ConnectionSlot<C> {
    generation: u64,
    conn: Option<C>,
}

impl<C: Clone> ConnectionSlot<C> {
    fn new() -> Self {
        Self {
            generation: 0,
            conn: None,
        }
    }

    fn get(&self) -> Option<(u64, C)> {
        self.conn.as_ref().map(|conn| (self.generation, conn.clone()))
    }

    fn set(&mut self, conn: C) -> u64 {
        self.generation += 1;
        self.conn = Some(conn);
        self.generation
    }

    /// Drop the connection if it is still the one from `generation`.
    fn invalidate(&mut self, generation: u64) -> bool {
        if self.generation != generation || self.conn.is_none() {
            return false;
        }
        self.conn = None;
        true
    }
}

impl RedisStore {
    /// Create a client for the configured host and port. Does not connect.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::open(config.url()).map_err(map_error)?;
        tracing::info!(host = %config.host, port = config.port, "Redis store configured");
        Ok(Self {
            client,
            connection: RwLock::new(ConnectionSlot::new()),
        })
    }

    async fn connection(&self) -> Result<(u64, MultiplexedConnection), StoreError> {
        if let Some(cached) = self.connection.read().await.get() {
            return Ok(cached);
        }

        let mut slot = self.connection.write().await;
        if let Some(cached) = slot.get() {
            return Ok(cached);
        }

        let conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(map_error)?;
        let generation = slot.set(conn.clone());
        tracing::debug!(generation, "Redis connection established");
        Ok((generation, conn))
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let (generation, mut conn) = self.connection().await?;
        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => Ok(value),
            Err(err) => {
                let err = map_error(err);
                if matches!(err, StoreError::Unavailable(_)) && self.connection.write().await.invalidate(generation) {
                    tracing::debug!(generation, "Redis connection dropped");
                }
                Err(err)
            }
        }
    }
}

fn map_error(err: RedisError) -> StoreError {
    if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() || err.is_timeout() {
        StoreError::Unavailable(err.to_string())
    } else {
        StoreError::Protocol(err.to_string())
    }
}
