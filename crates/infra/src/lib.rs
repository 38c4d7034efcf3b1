//! Infrastructure layer: record store, codec, lifecycle pipeline, queries,
//! dispatcher and configuration.

pub mod clock;
pub mod codec;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod keys;
pub mod lifecycle;
pub mod query;
pub mod record_store;


pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{CodecError, ProductCodec};
pub use config::LedgerConfig;
pub use dispatcher::{Dispatcher, Operation};
pub use error::{DispatchError, ErrorKind};
pub use keys::{KeyGenerator, MonotonicKeyGenerator};
pub use lifecycle::{LifecycleService, NewProduct};
pub use record_store::{InMemoryRecordStore, RecordStore, RecordStoreError, StoredRecord};
