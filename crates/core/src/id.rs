//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a product record.
///
/// Keys are plain integers on the wire (`"1"`, `"2"`, ...) and order
/// numerically in the record store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductKey(u64);

impl ProductKey {
    /// Smallest representable key (start of a full range scan).
    pub const MIN: ProductKey = ProductKey(u64::MIN);
    /// Largest representable key (end of a full range scan).
    pub const MAX: ProductKey = ProductKey(u64::MAX);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for ProductKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for ProductKey {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<ProductKey> for u64 {
    fn from(value: ProductKey) -> Self {
        value.0
    }
}

impl FromStr for ProductKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u64>()
            .map_err(|e| DomainError::invalid_id(format!("ProductKey '{s}': {e}")))?;
        Ok(Self(value))
    }
}
