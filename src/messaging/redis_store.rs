//! # Redis Channel Store
//!
//! `GET`/`SET`/`PING` over a reconnecting multiplexed tokio connection.
//!
//! A command that fails because the socket dropped reports the error for that
//! tick; the connection manager re-establishes the connection in the
//! background so later ticks succeed once the server is reachable again.

use super::channel_store::ChannelStore;
use super::errors::{StoreError, StoreResult};
use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use tracing::{debug, info};

/// Connection attempts per (re)connect before giving up
const CONNECT_RETRIES: usize = 3;
/// Backoff factor in milliseconds between connection attempts
const BACKOFF_FACTOR_MS: u64 = 50;
/// Upper bound on a single backoff delay in milliseconds
const BACKOFF_MAX_DELAY_MS: u64 = 2_000;

/// Redis-backed channel store
#[derive(Clone)]
pub struct RedisChannelStore {
    connection: ConnectionManager,
    endpoint: String,
}

impl std::fmt::Debug for RedisChannelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisChannelStore")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl RedisChannelStore {
    /// Build the connection URL for a host/port pair
    pub fn url_for(host: &str, port: u16) -> String {
        format!("redis://{host}:{port}/")
    }

    /// Open a connection to the store at `host:port`
    pub async fn connect(host: &str, port: u16) -> StoreResult<Self> {
        let endpoint = Self::url_for(host, port);
        debug!(endpoint = %endpoint, "🔌 Opening channel store connection");

        let client = redis::Client::open(endpoint.as_str())
            .map_err(|e| StoreError::invalid_endpoint(&endpoint, e.to_string()))?;

        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(CONNECT_RETRIES)
            .set_exponent_base(2)
            .set_factor(BACKOFF_FACTOR_MS)
            .set_max_delay(BACKOFF_MAX_DELAY_MS);

        let connection = ConnectionManager::new_with_config(client, config)
            .await
            .map_err(|e| StoreError::connection(&endpoint, e.to_string()))?;

        info!(endpoint = %endpoint, "✅ Channel store connection opened");
        Ok(Self {
            connection,
            endpoint,
        })
    }
}

#[async_trait]
impl ChannelStore for RedisChannelStore {
    async fn read(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let mut conn = self.connection.clone();
        conn.get::<_, Option<Vec<u8>>>(key)
            .await
            .map_err(|e| StoreError::command("GET", key, e.to_string()))
    }

    async fn write(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        let mut conn = self.connection.clone();
        conn.set::<_, _, ()>(key, value)
            .await
            .map_err(|e| StoreError::command("SET", key, e.to_string()))
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.connection.clone();
        let reply: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::connection(&self.endpoint, e.to_string()))?;

        if reply.eq_ignore_ascii_case("PONG") {
            Ok(())
        } else {
            Err(StoreError::unexpected_ping(reply))
        }
    }

    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }
}
