//! # Runtime Bootstrap
//!
//! Startup sequence shared by the binary and the tests:
//!
//! 1. Connect to the channel store and `PING` it (fatal on failure)
//! 2. Resolve the handler from its source (fatal on failure)
//! 3. Build the dispatcher with a fresh execution context
//!
//! The handler is never loaded when the store check fails.

use crate::config::RuntimeConfig;
use crate::dispatch::Dispatcher;
use crate::error::{Result, RuntimeError};
use crate::loader::HandlerLoader;
use crate::messaging::{ChannelStore, RedisChannelStore};
use crate::registry::HandlerRegistry;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Connect to the configured Redis store and prepare the dispatcher
#[instrument(skip_all, fields(redis_host = %config.redis_host, redis_port = config.redis_port))]
pub async fn start(
    config: &RuntimeConfig,
    registry: Arc<HandlerRegistry>,
) -> Result<Dispatcher<RedisChannelStore>> {
    let store = RedisChannelStore::connect(&config.redis_host, config.redis_port)
        .await
        .map_err(|e| {
            error!(error = %e, "Unable to connect to channel store");
            RuntimeError::Connectivity(e)
        })?;

    prepare(store, config, registry).await
}

/// Check the store, load the handler and build the dispatcher
pub async fn prepare<S: ChannelStore>(
    store: S,
    config: &RuntimeConfig,
    registry: Arc<HandlerRegistry>,
) -> Result<Dispatcher<S>> {
    if let Err(e) = store.ping().await {
        error!(store = %store.endpoint(), error = %e, "Unable to connect to channel store");
        return Err(RuntimeError::Connectivity(e));
    }
    info!(store = %store.endpoint(), "✅ Connected to channel store");

    let descriptor = config.source_descriptor()?;

    let mut loader = HandlerLoader::new(registry);
    if let Some(root) = &config.scratch_dir {
        loader = loader.with_scratch_root(root);
    }

    let handler = loader.resolve(&descriptor)?;

    Ok(Dispatcher::new(store, handler, config.dispatch_settings()))
}
