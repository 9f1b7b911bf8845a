//! # Messaging Module
//!
//! Channel store adapters. Events arrive on one key and results leave on
//! another; both are plain `GET`/`SET` slots, not queues.

pub mod channel_store;
pub mod errors;
pub mod memory_store;
pub mod redis_store;

pub use channel_store::ChannelStore;
pub use errors::{StoreError, StoreResult};
pub use memory_store::{InMemoryChannelStore, WriteRecord};
pub use redis_store::RedisChannelStore;
