use std::ops::RangeInclusive;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use winechain_core::{ExpectedVersion, ProductKey};

/// A record as held by the store: opaque bytes plus the store-assigned version.
///
/// Versions start at 1 on the first put and grow by one per put. A key that
/// was never written is at version 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub key: ProductKey,
    pub value: Vec<u8>,
    pub version: u64,
}

/// Record store operation error.
///
/// These are **infrastructure errors** (storage, concurrency) as opposed to
/// domain errors (validation, lifecycle state).
#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("record store unavailable: {0}")]
    Unavailable(String),

    #[error("record store lock poisoned")]
    LockPoisoned,
}

/// Single-authority key-value store for product records.
///
/// ## Semantics
///
/// - `get` returns the current bytes and version, or `None` for an unknown key.
/// - `put` replaces the whole value under a key. With `ExpectedVersion::Exact(v)`
///   the write only succeeds if the key is still at version `v` (compare and
///   swap); `Exact(0)` means "must not exist". `Any` skips the check.
/// - `scan` returns every record whose key lies in the inclusive range, in
///   ascending key order, as one consistent snapshot.
///
/// Implementations never retry; a lost race surfaces as
/// [`RecordStoreError::Concurrency`].
pub trait RecordStore: Send + Sync {
    fn get(&self, key: &ProductKey) -> Result<Option<StoredRecord>, RecordStoreError>;

    fn put(
        &self,
        key: ProductKey,
        value: Vec<u8>,
        expected_version: ExpectedVersion,
    ) -> Result<StoredRecord, RecordStoreError>;

    fn scan(
        &self,
        range: RangeInclusive<ProductKey>,
    ) -> Result<Vec<StoredRecord>, RecordStoreError>;
}

impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    fn get(&self, key: &ProductKey) -> Result<Option<StoredRecord>, RecordStoreError> {
        (**self).get(key)
    }

    fn put(
        &self,
        key: ProductKey,
        value: Vec<u8>,
        expected_version: ExpectedVersion,
    ) -> Result<StoredRecord, RecordStoreError> {
        (**self).put(key, value, expected_version)
    }

    fn scan(
        &self,
        range: RangeInclusive<ProductKey>,
    ) -> Result<Vec<StoredRecord>, RecordStoreError> {
        (**self).scan(range)
    }
}
