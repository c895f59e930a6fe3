//! Warden Store — key-value backends and repository implementations.
//!
//! This crate provides:
//! - Backends implementing [`KeyValueStore`](warden_core::repository::KeyValueStore):
//!   [`MemoryStore`], [`RedisStore`] and the runtime-selected [`Backend`]
//! - Connection configuration ([`StoreConfig`])
//! - Repository implementations over any key-value backend ([`repository`])
//! - Error types ([`StoreError`])

mod connection;
mod error;
mod memory;
mod redis_store;
pub mod repository;

pub use connection::{Backend, StoreConfig};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
