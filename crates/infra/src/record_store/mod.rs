//! Versioned key-value record store boundary.
//!
//! This module defines the storage abstraction the lifecycle core persists
//! product records through, without making any assumptions about the backend.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryRecordStore;
pub use r#trait::{RecordStore, RecordStoreError, StoredRecord};
