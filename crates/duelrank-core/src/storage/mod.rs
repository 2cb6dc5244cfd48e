//! # Persistent Storage
//!
//! Disk-backed ranking persistence. The store is a plain key-value
//! collaborator: the engine hands it an ordering value and gets one
//! back; nothing about the transport (database, file, anything else)
//! leaks into the ranking logic.

mod redb_store;

pub use redb_store::RedbStore;
