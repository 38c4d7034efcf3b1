//! Product record codec.
//!
//! A product is persisted as one compact JSON object with stable camelCase
//! field names. Decoding also checks the invariants every stored product must
//! satisfy, so corrupt records are reported instead of silently advanced.

use thiserror::Error;

use winechain_products::Product;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode product: {0}")]
    Encode(String),

    #[error("failed to decode product record: {0}")]
    Decode(String),

    #[error("stored product record is invalid: {0}")]
    Invalid(String),
}

/// Canonical encoder/decoder for [`Product`] records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductCodec;

impl ProductCodec {
    pub fn encode(product: &Product) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(product).map_err(|e| CodecError::Encode(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Product, CodecError> {
        let product: Product =
            serde_json::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))?;
        Self::check(&product)?;
        Ok(product)
    }

    fn check(product: &Product) -> Result<(), CodecError> {
        let transactions = product.transactions();
        let Some((_, closed)) = transactions.split_last() else {
            return Err(CodecError::Invalid(format!(
                "product {} has no transactions",
                product.key()
            )));
        };
        if let Some(idx) = closed.iter().position(|t| t.is_open()) {
            return Err(CodecError::Invalid(format!(
                "product {}: transaction {idx} is open but not the latest",
                product.key()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use winechain_core::Aggregate;
    use winechain_products::{AdvanceProduct, Distribution, ProductCommand, StageInput};

    fn seeded() -> Product {
        let at = Utc.with_ymd_and_hms(2018, 4, 12, 8, 0, 0).unwrap();
        winechain_products::sample_products(at)
            .unwrap()
            .remove(0)
    }

    #[test]
    fn encode_uses_camel_case_field_names() {
        let json: serde_json::Value =
            serde_json::from_slice(&ProductCodec::encode(&seeded()).unwrap()).unwrap();
        assert_eq!(json["key"], 1);
        assert_eq!(json["companyName"], "Hoggies Estate");
        assert_eq!(json["grape"]["rowRange"], "1-3");
        assert_eq!(json["winery"]["name"], "Trentham Estate");
        assert_eq!(json["wine"]["corkCap"], "");
        assert_eq!(json["transactions"][0]["stageId"], 10);
        assert!(json["distributions"].as_array().unwrap().is_empty());
    }

    #[test]
    fn decode_then_encode_preserves_bytes() {
        let mut product = seeded();
        let at = Utc.with_ymd_and_hms(2018, 4, 13, 9, 30, 0).unwrap();
        let events = product
            .handle(&ProductCommand::AdvanceProduct(AdvanceProduct {
                key: product.key(),
                input: StageInput::Transport(Distribution::new("KT2456", "DWT345")),
                started_at: None,
                occurred_at: at,
            }))
            .unwrap();
        product.apply(&events[0]);

        let bytes = ProductCodec::encode(&product).unwrap();
        let decoded = ProductCodec::decode(&bytes).unwrap();
        assert_eq!(decoded, product);
        assert_eq!(ProductCodec::encode(&decoded).unwrap(), bytes);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            ProductCodec::decode(b"not json"),
            Err(CodecError::Decode(_))
        ));
        assert!(matches!(
            ProductCodec::decode(br#"{"companyName":"x"}"#),
            Err(CodecError::Decode(_))
        ));
    }

    #[test]
    fn decode_rejects_empty_history() {
        let mut json: serde_json::Value =
            serde_json::from_slice(&ProductCodec::encode(&seeded()).unwrap()).unwrap();
        json["transactions"] = serde_json::json!([]);
        let bytes = serde_json::to_vec(&json).unwrap();
        assert!(matches!(
            ProductCodec::decode(&bytes),
            Err(CodecError::Invalid(_))
        ));
    }

    #[test]
    fn decode_rejects_open_transaction_in_the_middle() {
        let mut json: serde_json::Value =
            serde_json::from_slice(&ProductCodec::encode(&seeded()).unwrap()).unwrap();
        json["transactions"] = serde_json::json!([
            {"stageId": 10, "start": "2018-04-12T08:00:00Z"},
            {"stageId": 20, "start": "2018-04-12T09:00:00Z"}
        ]);
        let bytes = serde_json::to_vec(&json).unwrap();
        assert!(matches!(
            ProductCodec::decode(&bytes),
            Err(CodecError::Invalid(_))
        ));
    }

    #[test]
    fn decode_keeps_unknown_stage_ids() {
        let mut json: serde_json::Value =
            serde_json::from_slice(&ProductCodec::encode(&seeded()).unwrap()).unwrap();
        json["transactions"][0]["stageId"] = serde_json::json!(70);
        let bytes = serde_json::to_vec(&json).unwrap();
        let product = ProductCodec::decode(&bytes).unwrap();
        assert_eq!(product.current_stage_id(), Some(70));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 128,
                ..ProptestConfig::default()
            })]

            /// Property: persisted bytes are stable across decode/encode.
            #[test]
            fn encoded_records_are_stable(
                volume in 0.0f64..1.0e9,
                driver in "[A-Za-z0-9 ]{1,12}",
                label in "\\PC{0,16}"
            ) {
                let mut product = seeded();
                let at = Utc.with_ymd_and_hms(2018, 4, 13, 9, 30, 0).unwrap();
                let events = product.handle(&ProductCommand::AdvanceProduct(AdvanceProduct {
                    key: product.key(),
                    input: StageInput::Transport(Distribution::new(driver, "DWT345")),
                    started_at: None,
                    occurred_at: at,
                }));
                prop_assume!(events.is_ok());
                product.apply(&events.unwrap()[0]);

                let mut json: serde_json::Value =
                    serde_json::from_slice(&ProductCodec::encode(&product).unwrap()).unwrap();
                json["winery"]["volume"] = serde_json::json!(volume);
                json["wine"]["label"] = serde_json::json!(label);
                let product = ProductCodec::decode(&serde_json::to_vec(&json).unwrap()).unwrap();

                let bytes = ProductCodec::encode(&product).unwrap();
                let again = ProductCodec::encode(&ProductCodec::decode(&bytes).unwrap()).unwrap();
                prop_assert_eq!(again, bytes);
            }
        }
    }
}
