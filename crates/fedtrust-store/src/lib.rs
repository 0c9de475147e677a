//! Persistence layer for trust entries and SLA violations.
//!
//! The [`TrustStore`] and [`ViolationLog`] traits are the boundaries the
//! scoring and scheduling layers are written against; backends are injected
//! at node construction. Two implementations ship with the crate: a
//! RocksDB-backed store for the running node and a DashMap-backed in-memory
//! store used by tests and embedded setups.

pub mod error;
pub mod memory;
pub mod rocks;
pub mod traits;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use rocks::RocksStore;
pub use traits::{TrustStore, ViolationLog};
