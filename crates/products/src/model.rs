//! Value objects owned by a [`Product`](crate::Product).
//!
//! Field names are part of the persisted record format and must stay stable:
//! every later read decodes, mutates and re-encodes the whole aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use winechain_core::{DomainError, DomainResult, ValueObject};

/// Harvested grape lot. Fixed once the product leaves the vineyard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grape {
    pub name: String,
    pub region: String,
    pub vineyard: String,
    pub block: String,
    pub row_range: String,
    pub variety: String,
    pub vintage: i32,
    pub date_delivered: String,
    pub estimated_weight: f64,
    pub actual_weight: f64,
}

impl ValueObject for Grape {}

impl Grape {
    pub fn validate(&self) -> DomainResult<()> {
        if !(1000..=9999).contains(&self.vintage) {
            return Err(DomainError::validation(format!(
                "vintage must be a four-digit year, got {}",
                self.vintage
            )));
        }
        ensure_quantity("grape.estimatedWeight", self.estimated_weight)?;
        ensure_quantity("grape.actualWeight", self.actual_weight)?;
        Ok(())
    }
}

/// Winery processing record, replaced wholesale at the winery stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Winery {
    pub name: String,
    pub volume: f64,
    /// Weight of the grape lot as measured on intake.
    pub actual_weight: f64,
    pub received_from: String,
    pub transferred_to: String,
    pub bottling_company: String,
}

impl ValueObject for Winery {}

impl Winery {
    /// Winery record as known at harvest time: only the destination name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        ensure_quantity("winery.volume", self.volume)?;
        ensure_quantity("winery.actualWeight", self.actual_weight)?;
        Ok(())
    }
}

/// Bottled wine, replaced wholesale at the bottling stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wine {
    pub name: String,
    pub label: String,
    pub cork_cap: String,
    /// Free-text lifecycle label, e.g. "Labeled" / "Not Labeled".
    pub status: String,
    pub seller: String,
    pub brand: String,
}

impl ValueObject for Wine {}

/// One transport leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    pub driver_id: String,
    pub plate_number: String,
}

impl ValueObject for Distribution {}

impl Distribution {
    pub fn new(driver_id: impl Into<String>, plate_number: impl Into<String>) -> Self {
        Self {
            driver_id: driver_id.into(),
            plate_number: plate_number.into(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.driver_id.trim().is_empty() {
            return Err(DomainError::validation("driver id cannot be empty"));
        }
        if self.plate_number.trim().is_empty() {
            return Err(DomainError::validation("plate number cannot be empty"));
        }
        Ok(())
    }
}

/// Timestamped record of one stage. `end` stays empty while the stage is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Raw stage identifier as stored; see [`Stage`](crate::Stage).
    pub stage_id: u32,
    pub start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn open(stage_id: u32, start: DateTime<Utc>) -> Self {
        Self {
            stage_id,
            start,
            end: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }
}

fn ensure_quantity(field: &str, value: f64) -> DomainResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::validation(format!(
            "{field} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}
