//! Products domain module.
//!
//! This crate contains the wine product aggregate and its supply-chain state
//! machine, implemented purely as deterministic domain logic (no IO, no
//! storage, no clock).

pub mod model;
pub mod product;
pub mod seed;
pub mod stage;

pub use model::{Distribution, Grape, Transaction, Wine, Winery};
pub use product::{
    AdvanceProduct, CreateProduct, Product, ProductAdvanced, ProductCommand, ProductCreated,
    ProductEvent, StageInput,
};
pub use seed::{sample_commands, sample_products};
pub use stage::{Stage, StageRule, Transition};
