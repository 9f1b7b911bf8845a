//! # In-Memory Channel Store
//!
//! Process-local store with the same latest-value semantics as the Redis
//! adapter. Records every write and can be told to fail individual
//! operations, which makes it the store of choice for exercising the
//! dispatch loop without a server.

use super::channel_store::ChannelStore;
use super::errors::{StoreError, StoreResult};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// A recorded `write` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub key: String,
    pub value: Vec<u8>,
}

/// In-memory channel store backed by a `DashMap`
#[derive(Debug, Default)]
pub struct InMemoryChannelStore {
    data: DashMap<String, Vec<u8>>,
    writes: Mutex<Vec<WriteRecord>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    unreachable: AtomicBool,
}

impl InMemoryChannelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose startup ping always fails
    pub fn unreachable() -> Self {
        let store = Self::default();
        store.unreachable.store(true, Ordering::SeqCst);
        store
    }

    /// Set a key directly, bypassing the write log (simulates an external producer)
    pub fn put(&self, key: &str, value: impl Into<Vec<u8>>) {
        self.data.insert(key.to_string(), value.into());
    }

    /// Set a key to the JSON encoding of `value`
    pub fn put_json(&self, key: &str, value: &serde_json::Value) {
        self.put(key, value.to_string());
    }

    /// Remove a key
    pub fn remove(&self, key: &str) {
        self.data.remove(key);
    }

    /// Current value at `key`
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.data.get(key).map(|entry| entry.value().clone())
    }

    /// Current value at `key` decoded as JSON
    pub fn get_json(&self, key: &str) -> Option<serde_json::Value> {
        self.get(key)
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
    }

    /// Every write made through [`ChannelStore::write`], oldest first
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.writes.lock().clone()
    }

    /// Number of writes made through [`ChannelStore::write`] to `key`
    pub fn write_count(&self, key: &str) -> usize {
        self.writes.lock().iter().filter(|w| w.key == key).count()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChannelStore for InMemoryChannelStore {
    async fn read(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::command("GET", key, "injected read failure"));
        }
        Ok(self.get(key))
    }

    async fn write(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::command("SET", key, "injected write failure"));
        }
        self.data.insert(key.to_string(), value.clone());
        self.writes.lock().push(WriteRecord {
            key: key.to_string(),
            value,
        });
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(StoreError::connection(self.endpoint(), "store unreachable"));
        }
        Ok(())
    }

    fn endpoint(&self) -> String {
        "memory://local".to_string()
    }
}
