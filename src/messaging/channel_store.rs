//! # Channel Store Contract
//!
//! The dispatch loop talks to its substrate through three operations only.
//! Keys are plain strings; writers overwrite and readers see the latest value,
//! so a "channel" here is a single slot rather than a queue.

use super::errors::StoreResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Key-value substrate through which events arrive and results leave.
#[async_trait]
pub trait ChannelStore: Send + Sync {
    /// Read the current value at `key`, or `None` when the key is absent.
    async fn read(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Overwrite the value at `key`.
    async fn write(&self, key: &str, value: Vec<u8>) -> StoreResult<()>;

    /// Startup connectivity check.
    async fn ping(&self) -> StoreResult<()>;

    /// Human-readable location for logs.
    fn endpoint(&self) -> String;
}

#[async_trait]
impl<T: ChannelStore + ?Sized> ChannelStore for Arc<T> {
    async fn read(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        (**self).write(key, value).await
    }

    async fn ping(&self) -> StoreResult<()> {
        (**self).ping().await
    }

    fn endpoint(&self) -> String {
        (**self).endpoint()
    }
}
