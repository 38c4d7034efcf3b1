//! Product lifecycle pipeline (application-level orchestration).
//!
//! Every write follows the same pipeline:
//!
//! ```text
//! Command
//!   ↓
//! 1. Load the record and its version from the store
//!   ↓
//! 2. Rehydrate the aggregate (decode)
//!   ↓
//! 3. Handle command (pure decision logic, produces events)
//!   ↓
//! 4. Apply events and encode the new record
//!   ↓
//! 5. Put with `ExpectedVersion::Exact(loaded version)`
//! ```
//!
//! All validation happens in step 3, so a rejected command never touches the
//! store. A concurrent writer that got in between steps 1 and 5 makes step 5
//! fail with `Conflict`; nothing is retried.

use chrono::{DateTime, Utc};

use winechain_core::{Aggregate, ExpectedVersion, ProductKey};
use winechain_products::{
    AdvanceProduct, CreateProduct, Grape, Product, ProductCommand, StageInput, Wine, Winery,
};

use crate::clock::Clock;
use crate::codec::ProductCodec;
use crate::error::DispatchError;
use crate::keys::KeyGenerator;
use crate::record_store::{RecordStore, StoredRecord};

/// Keys tried by `create_with_generated_key` before giving up.
const MAX_KEY_ATTEMPTS: usize = 64;

/// Caller-supplied data for a new product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub company_name: String,
    pub grape: Grape,
    pub winery: Winery,
    pub wine: Wine,
}

/// Reusable execution engine for product commands.
///
/// ## Generic Parameters
///
/// - `S`: record store
/// - `K`: key generator for creations without a caller key
/// - `C`: clock supplying every "now"
#[derive(Debug)]
pub struct LifecycleService<S, K, C> {
    store: S,
    keys: K,
    clock: C,
}

impl<S, K, C> LifecycleService<S, K, C> {
    pub fn new(store: S, keys: K, clock: C) -> Self {
        Self { store, keys, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_parts(self) -> (S, K, C) {
        (self.store, self.keys, self.clock)
    }
}

impl<S, K, C> LifecycleService<S, K, C>
where
    S: RecordStore,
    K: KeyGenerator,
    C: Clock,
{
    /// Create a product under a caller-chosen key, at stage 10.
    ///
    /// Fails with `Conflict` if the key is already taken, including when a
    /// concurrent create wins the race.
    pub fn create_product(
        &self,
        key: ProductKey,
        details: NewProduct,
    ) -> Result<Product, DispatchError> {
        if self.store.get(&key)?.is_some() {
            return Err(DispatchError::Conflict(format!("product {key} already exists")));
        }

        let command = ProductCommand::CreateProduct(CreateProduct {
            key,
            company_name: details.company_name,
            grape: details.grape,
            winery: details.winery,
            wine: details.wine,
            occurred_at: self.clock.now(),
        });

        let mut product = Product::empty(key);
        let events = product.handle(&command)?;
        for event in &events {
            product.apply(event);
        }

        let stored = self.persist(&product, ExpectedVersion::Exact(0))?;
        tracing::info!(key = %key, version = stored.version, "product created");
        Ok(product)
    }

    /// Create a product under the next free generated key.
    pub fn create_with_generated_key(
        &self,
        details: NewProduct,
    ) -> Result<Product, DispatchError> {
        for _ in 0..MAX_KEY_ATTEMPTS {
            let key = self.keys.next_key();
            match self.create_product(key, details.clone()) {
                Err(DispatchError::Conflict(msg)) => {
                    tracing::debug!(key = %key, "generated key taken: {msg}");
                }
                other => return other,
            }
        }
        Err(DispatchError::Conflict(format!(
            "no free key after {MAX_KEY_ATTEMPTS} attempts"
        )))
    }

    /// Store the sample products, overwriting whatever is under their keys.
    pub fn seed(&self) -> Result<Vec<ProductKey>, DispatchError> {
        let products = winechain_products::sample_products(self.clock.now())?;
        let mut keys = Vec::with_capacity(products.len());
        for product in &products {
            self.persist(product, ExpectedVersion::Any)?;
            keys.push(product.key());
        }
        tracing::info!(count = keys.len(), "ledger seeded");
        Ok(keys)
    }

    /// Advance a product to its next stage with a ready-made stage payload.
    pub fn advance_product(
        &self,
        key: ProductKey,
        input: StageInput,
        started_at: Option<DateTime<Utc>>,
    ) -> Result<Product, DispatchError> {
        self.advance_with(key, started_at, |_| Ok(input))
    }

    /// Advance a product, building the stage payload from its current state.
    ///
    /// `build` sees the product exactly as loaded for this attempt; the write
    /// is only accepted if that state is still current.
    #[tracing::instrument(skip_all, fields(key = %key))]
    pub fn advance_with<F>(
        &self,
        key: ProductKey,
        started_at: Option<DateTime<Utc>>,
        build: F,
    ) -> Result<Product, DispatchError>
    where
        F: FnOnce(&Product) -> Result<StageInput, DispatchError>,
    {
        let (mut product, version) = self.load(&key)?;
        let input = build(&product)?;

        let command = ProductCommand::AdvanceProduct(AdvanceProduct {
            key,
            input,
            started_at,
            occurred_at: self.clock.now(),
        });

        let events = product.handle(&command).map_err(|err| {
            tracing::warn!(
                stage = ?product.current_stage_id(),
                "advance rejected: {err}"
            );
            DispatchError::from(err)
        })?;
        for event in &events {
            product.apply(event);
        }

        let stored = self.persist(&product, ExpectedVersion::Exact(version))?;
        tracing::info!(
            stage = ?product.current_stage_id(),
            version = stored.version,
            "product advanced"
        );
        Ok(product)
    }

    /// Typed read of a product.
    pub fn product(&self, key: &ProductKey) -> Result<Product, DispatchError> {
        self.load(key).map(|(product, _)| product)
    }

    fn load(&self, key: &ProductKey) -> Result<(Product, u64), DispatchError> {
        let record = self
            .store
            .get(key)?
            .ok_or_else(|| DispatchError::NotFound(format!("product {key} does not exist")))?;
        let product = ProductCodec::decode(&record.value)?;
        if product.key() != *key {
            return Err(DispatchError::Codec(crate::codec::CodecError::Invalid(format!(
                "record under {key} carries key {}",
                product.key()
            ))));
        }
        Ok((product, record.version))
    }

    fn persist(
        &self,
        product: &Product,
        expected: ExpectedVersion,
    ) -> Result<StoredRecord, DispatchError> {
        let bytes = ProductCodec::encode(product)?;
        Ok(self.store.put(product.key(), bytes, expected)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use winechain_products::Distribution;

    use crate::clock::FixedClock;
    use crate::error::ErrorKind;
    use crate::keys::MonotonicKeyGenerator;
    use crate::record_store::InMemoryRecordStore;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 4, 12, 8, 0, 0).unwrap()
    }

    fn service() -> LifecycleService<InMemoryRecordStore, MonotonicKeyGenerator, FixedClock> {
        LifecycleService::new(
            InMemoryRecordStore::new(),
            MonotonicKeyGenerator::default(),
            FixedClock::new(now()),
        )
    }

    fn details() -> NewProduct {
        NewProduct {
            company_name: "Penley".to_string(),
            grape: Grape {
                region: "Coonawarra".to_string(),
                variety: "Shiraz".to_string(),
                vintage: 2016,
                estimated_weight: 35.0,
                ..Grape::default()
            },
            winery: Winery::named("Limestone Coast Wines"),
            wine: Wine::default(),
        }
    }

    #[test]
    fn create_persists_stage_ten_record() {
        let svc = service();
        let product = svc.create_product(ProductKey::new(7), details()).unwrap();
        assert_eq!(product.current_stage_id(), Some(10));

        let stored = svc.store().get(&ProductKey::new(7)).unwrap().unwrap();
        assert_eq!(stored.version, 1);
        assert_eq!(ProductCodec::decode(&stored.value).unwrap(), product);
    }

    #[test]
    fn create_on_existing_key_is_conflict() {
        let svc = service();
        svc.create_product(ProductKey::new(7), details()).unwrap();
        let err = svc.create_product(ProductKey::new(7), details()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn invalid_creation_leaves_store_empty() {
        let svc = service();
        let mut bad = details();
        bad.grape.estimated_weight = -1.0;
        let err = svc.create_product(ProductKey::new(7), bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(svc.store().is_empty().unwrap());
    }

    #[test]
    fn generated_keys_skip_seeded_records() {
        let svc = service();
        svc.seed().unwrap();
        let product = svc.create_with_generated_key(details()).unwrap();
        assert_eq!(product.key(), ProductKey::new(3));
    }

    #[test]
    fn seed_overwrites_and_keeps_two_records() {
        let svc = service();
        assert_eq!(
            svc.seed().unwrap(),
            vec![ProductKey::new(1), ProductKey::new(2)]
        );
        svc.seed().unwrap();
        assert_eq!(svc.store().len().unwrap(), 2);
        assert_eq!(
            svc.store().get(&ProductKey::new(1)).unwrap().unwrap().version,
            2
        );
    }

    #[test]
    fn advance_bumps_version_and_appends_leg() {
        let svc = service();
        svc.seed().unwrap();
        let product = svc
            .advance_product(
                ProductKey::new(1),
                StageInput::Transport(Distribution::new("KT2456", "DWT345")),
                None,
            )
            .unwrap();
        assert_eq!(product.current_stage_id(), Some(20));
        assert_eq!(
            svc.store().get(&ProductKey::new(1)).unwrap().unwrap().version,
            2
        );
        assert_eq!(svc.product(&ProductKey::new(1)).unwrap(), product);
    }

    #[test]
    fn advance_missing_key_is_not_found() {
        let svc = service();
        let err = svc
            .advance_product(
                ProductKey::new(999),
                StageInput::Transport(Distribution::new("KT2456", "DWT345")),
                None,
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(svc.store().get(&ProductKey::new(999)).unwrap().is_none());
    }

    #[test]
    fn builder_error_aborts_before_write() {
        let svc = service();
        svc.seed().unwrap();
        let err = svc
            .advance_with(ProductKey::new(1), None, |_| {
                Err(DispatchError::invalid_argument("bad payload"))
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            svc.store().get(&ProductKey::new(1)).unwrap().unwrap().version,
            1
        );
    }

    #[test]
    fn record_under_wrong_key_is_codec_error() {
        let svc = service();
        svc.seed().unwrap();
        let bytes = svc.store().get(&ProductKey::new(1)).unwrap().unwrap().value;
        svc.store()
            .put(ProductKey::new(5), bytes, ExpectedVersion::Any)
            .unwrap();
        let err = svc.product(&ProductKey::new(5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CodecError);
    }
}
