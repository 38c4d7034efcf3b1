//! Read side: point lookups and full-range listings over raw records.
//!
//! Queries never decode into the aggregate. They hand back the stored bytes
//! as-is, so a caller always sees exactly what was persisted.

use serde::Serialize;
use serde_json::value::RawValue;

use winechain_core::ProductKey;

use crate::codec::CodecError;
use crate::error::DispatchError;
use crate::record_store::RecordStore;

/// One entry of a `query_all_products` listing.
#[derive(Debug, Serialize)]
struct KeyedRecord {
    #[serde(rename = "Key")]
    key: String,
    #[serde(rename = "Record")]
    record: Box<RawValue>,
}

/// Raw record bytes stored under `key`.
pub fn query_product<S>(store: &S, key: &ProductKey) -> Result<Vec<u8>, DispatchError>
where
    S: RecordStore + ?Sized,
{
    store
        .get(key)?
        .map(|record| record.value)
        .ok_or_else(|| DispatchError::NotFound(format!("product {key} does not exist")))
}

/// Every record in key order as `[{"Key": "<key>", "Record": <record>}, ...]`.
pub fn query_all_products<S>(store: &S) -> Result<Vec<u8>, DispatchError>
where
    S: RecordStore + ?Sized,
{
    let records = store.scan(ProductKey::MIN..=ProductKey::MAX)?;
    tracing::debug!(count = records.len(), "scanned product records");

    let listing = records
        .into_iter()
        .map(|stored| {
            let json = String::from_utf8(stored.value).map_err(|e| {
                CodecError::Decode(format!("record {} is not UTF-8: {e}", stored.key))
            })?;
            let record = RawValue::from_string(json).map_err(|e| {
                CodecError::Decode(format!("record {} is not JSON: {e}", stored.key))
            })?;
            Ok(KeyedRecord {
                key: stored.key.to_string(),
                record,
            })
        })
        .collect::<Result<Vec<_>, CodecError>>()?;

    serde_json::to_vec(&listing).map_err(|e| CodecError::Encode(e.to_string()).into())
}
