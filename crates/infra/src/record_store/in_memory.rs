use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::sync::RwLock;

use winechain_core::{ExpectedVersion, ProductKey};

use super::r#trait::{RecordStore, RecordStoreError, StoredRecord};

/// In-memory versioned record store.
///
/// Intended for tests/dev and the CLI. Keys are held in a `BTreeMap`, so scans
/// come back in numeric key order.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<BTreeMap<ProductKey, StoredRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<usize, RecordStoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| RecordStoreError::LockPoisoned)?;
        Ok(records.len())
    }

    pub fn is_empty(&self) -> Result<bool, RecordStoreError> {
        Ok(self.len()? == 0)
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get(&self, key: &ProductKey) -> Result<Option<StoredRecord>, RecordStoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| RecordStoreError::LockPoisoned)?;
        Ok(records.get(key).cloned())
    }

    fn put(
        &self,
        key: ProductKey,
        value: Vec<u8>,
        expected_version: ExpectedVersion,
    ) -> Result<StoredRecord, RecordStoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RecordStoreError::LockPoisoned)?;

        let current = records.get(&key).map(|r| r.version).unwrap_or(0);
        if !expected_version.matches(current) {
            return Err(RecordStoreError::Concurrency(format!(
                "key {key}: expected {expected_version:?}, found {current}"
            )));
        }

        let stored = StoredRecord {
            key,
            value,
            version: current + 1,
        };
        records.insert(key, stored.clone());
        Ok(stored)
    }

    fn scan(
        &self,
        range: RangeInclusive<ProductKey>,
    ) -> Result<Vec<StoredRecord>, RecordStoreError> {
        if range.start() > range.end() {
            return Ok(Vec::new());
        }
        let records = self
            .records
            .read()
            .map_err(|_| RecordStoreError::LockPoisoned)?;
        Ok(records.range(range).map(|(_, r)| r.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u64) -> ProductKey {
        ProductKey::new(n)
    }

    #[test]
    fn get_missing_key_is_none() {
        let store = InMemoryRecordStore::new();
        assert!(store.get(&key(1)).unwrap().is_none());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn put_assigns_increasing_versions() {
        let store = InMemoryRecordStore::new();
        let first = store
            .put(key(1), b"a".to_vec(), ExpectedVersion::Exact(0))
            .unwrap();
        assert_eq!(first.version, 1);

        let second = store
            .put(key(1), b"b".to_vec(), ExpectedVersion::Exact(1))
            .unwrap();
        assert_eq!(second.version, 2);
        assert_eq!(store.get(&key(1)).unwrap().unwrap().value, b"b".to_vec());
    }

    #[test]
    fn stale_version_is_rejected_and_leaves_value_untouched() {
        let store = InMemoryRecordStore::new();
        store
            .put(key(1), b"a".to_vec(), ExpectedVersion::Exact(0))
            .unwrap();
        store
            .put(key(1), b"b".to_vec(), ExpectedVersion::Exact(1))
            .unwrap();

        let err = store
            .put(key(1), b"stale".to_vec(), ExpectedVersion::Exact(1))
            .unwrap_err();
        assert!(matches!(err, RecordStoreError::Concurrency(_)));
        assert_eq!(store.get(&key(1)).unwrap().unwrap().value, b"b".to_vec());
    }

    #[test]
    fn exact_zero_refuses_existing_key() {
        let store = InMemoryRecordStore::new();
        store
            .put(key(5), b"a".to_vec(), ExpectedVersion::Exact(0))
            .unwrap();
        assert!(matches!(
            store.put(key(5), b"b".to_vec(), ExpectedVersion::Exact(0)),
            Err(RecordStoreError::Concurrency(_))
        ));
    }

    #[test]
    fn any_overwrites_without_check() {
        let store = InMemoryRecordStore::new();
        store
            .put(key(5), b"a".to_vec(), ExpectedVersion::Exact(0))
            .unwrap();
        let stored = store
            .put(key(5), b"b".to_vec(), ExpectedVersion::Any)
            .unwrap();
        assert_eq!(stored.version, 2);
    }

    #[test]
    fn scan_returns_numeric_key_order() {
        let store = InMemoryRecordStore::new();
        for n in [10, 2, 1, 999] {
            store
                .put(key(n), n.to_string().into_bytes(), ExpectedVersion::Any)
                .unwrap();
        }

        let keys: Vec<u64> = store
            .scan(ProductKey::MIN..=ProductKey::MAX)
            .unwrap()
            .into_iter()
            .map(|r| r.key.value())
            .collect();
        assert_eq!(keys, vec![1, 2, 10, 999]);

        let bounded: Vec<u64> = store
            .scan(key(2)..=key(10))
            .unwrap()
            .into_iter()
            .map(|r| r.key.value())
            .collect();
        assert_eq!(bounded, vec![2, 10]);
    }

    #[test]
    fn inverted_range_is_empty() {
        let store = InMemoryRecordStore::new();
        store
            .put(key(3), b"x".to_vec(), ExpectedVersion::Any)
            .unwrap();
        assert!(store.scan(key(9)..=key(1)).unwrap().is_empty());
    }
}
