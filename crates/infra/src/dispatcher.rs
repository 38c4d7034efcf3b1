//! Named-operation entry point.
//!
//! External collaborators call the ledger with an operation name and an
//! already-split argument list; results are raw bytes. Argument parsing and
//! arity checks happen here, before any record is touched.

use core::str::FromStr;

use winechain_core::ProductKey;
use winechain_products::{Distribution, Grape, Product, StageInput, Wine, Winery};

use crate::clock::Clock;
use crate::codec::ProductCodec;
use crate::error::DispatchError;
use crate::keys::KeyGenerator;
use crate::lifecycle::{LifecycleService, NewProduct};
use crate::query;
use crate::record_store::RecordStore;

/// Operations understood by [`Dispatcher::invoke`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    QueryProduct,
    QueryAllProducts,
    InitLedger,
    RecordProduct,
    RecordDistribution,
    AdvanceByWinery,
    AdvanceByBottler,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::QueryProduct,
        Operation::QueryAllProducts,
        Operation::InitLedger,
        Operation::RecordProduct,
        Operation::RecordDistribution,
        Operation::AdvanceByWinery,
        Operation::AdvanceByBottler,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::QueryProduct => "queryProduct",
            Operation::QueryAllProducts => "queryAllProducts",
            Operation::InitLedger => "initLedger",
            Operation::RecordProduct => "recordProduct",
            Operation::RecordDistribution => "recordDistribution",
            Operation::AdvanceByWinery => "advanceByWinery",
            Operation::AdvanceByBottler => "advanceByBottler",
        }
    }

    /// Exact number of arguments the operation takes.
    pub fn arity(self) -> usize {
        match self {
            Operation::QueryProduct => 1,
            Operation::QueryAllProducts | Operation::InitLedger => 0,
            Operation::RecordProduct => 11,
            Operation::RecordDistribution => 3,
            Operation::AdvanceByWinery => 6,
            Operation::AdvanceByBottler => 6,
        }
    }
}

impl FromStr for Operation {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| {
                DispatchError::invalid_argument(format!("unknown function name '{s}'"))
            })
    }
}

/// Routes named operations to the lifecycle pipeline and the query side.
#[derive(Debug)]
pub struct Dispatcher<S, K, C> {
    lifecycle: LifecycleService<S, K, C>,
}

impl<S, K, C> Dispatcher<S, K, C> {
    pub fn new(lifecycle: LifecycleService<S, K, C>) -> Self {
        Self { lifecycle }
    }

    pub fn lifecycle(&self) -> &LifecycleService<S, K, C> {
        &self.lifecycle
    }
}

impl<S, K, C> Dispatcher<S, K, C>
where
    S: RecordStore,
    K: KeyGenerator,
    C: Clock,
{
    /// Run one operation.
    ///
    /// Queries return the stored bytes; writes return the encoded record as
    /// persisted; `initLedger` returns nothing.
    pub fn invoke(&self, function: &str, args: &[String]) -> Result<Vec<u8>, DispatchError> {
        let op = Operation::from_str(function)?;
        if args.len() != op.arity() {
            return Err(DispatchError::invalid_argument(format!(
                "{} expects {} argument(s), got {}",
                op.name(),
                op.arity(),
                args.len()
            )));
        }
        tracing::debug!(function = op.name(), "invoke");

        match op {
            Operation::QueryProduct => {
                let key = parse_key(&args[0])?;
                query::query_product(self.lifecycle.store(), &key)
            }
            Operation::QueryAllProducts => query::query_all_products(self.lifecycle.store()),
            Operation::InitLedger => {
                self.lifecycle.seed()?;
                Ok(Vec::new())
            }
            Operation::RecordProduct => self.record_product(args),
            Operation::RecordDistribution => self.record_distribution(args),
            Operation::AdvanceByWinery => self.advance_by_winery(args),
            Operation::AdvanceByBottler => self.advance_by_bottler(args),
        }
    }

    fn record_product(&self, args: &[String]) -> Result<Vec<u8>, DispatchError> {
        let key = parse_key(&args[0])?;
        let details = NewProduct {
            company_name: args[1].clone(),
            grape: Grape {
                region: args[2].clone(),
                vineyard: args[3].clone(),
                block: args[4].clone(),
                row_range: args[5].clone(),
                variety: args[6].clone(),
                vintage: parse_number("vintage", &args[7])?,
                date_delivered: args[8].clone(),
                estimated_weight: parse_number("estimatedWeight", &args[10])?,
                ..Grape::default()
            },
            winery: Winery::named(args[9].clone()),
            wine: Wine::default(),
        };
        let product = self.lifecycle.create_product(key, details)?;
        encode(&product)
    }

    fn record_distribution(&self, args: &[String]) -> Result<Vec<u8>, DispatchError> {
        let key = parse_key(&args[0])?;
        let leg = Distribution::new(args[1].clone(), args[2].clone());
        let product = self
            .lifecycle
            .advance_product(key, StageInput::Transport(leg), None)?;
        encode(&product)
    }

    fn advance_by_winery(&self, args: &[String]) -> Result<Vec<u8>, DispatchError> {
        let key = parse_key(&args[0])?;
        let actual_weight: f64 = parse_number("actualWeight", &args[1])?;
        let volume: f64 = parse_number("volume", &args[2])?;
        let received_from = args[3].clone();
        let transferred_to = args[4].clone();
        let bottling_company = args[5].clone();

        let product = self.lifecycle.advance_with(key, None, |current| {
            Ok(StageInput::Winery(Winery {
                name: current.winery().name.clone(),
                volume,
                actual_weight,
                received_from,
                transferred_to,
                bottling_company,
            }))
        })?;
        encode(&product)
    }

    fn advance_by_bottler(&self, args: &[String]) -> Result<Vec<u8>, DispatchError> {
        let key = parse_key(&args[0])?;
        let label = args[1].clone();
        let cork_cap = args[2].clone();
        let status = args[3].clone();
        let seller = args[4].clone();
        let brand = args[5].clone();

        let product = self.lifecycle.advance_with(key, None, |current| {
            Ok(StageInput::Bottling(Wine {
                name: current.winery().bottling_company.clone(),
                label,
                cork_cap,
                status,
                seller,
                brand,
            }))
        })?;
        encode(&product)
    }
}

fn encode(product: &Product) -> Result<Vec<u8>, DispatchError> {
    Ok(ProductCodec::encode(product)?)
}

fn parse_key(raw: &str) -> Result<ProductKey, DispatchError> {
    Ok(raw.parse::<ProductKey>()?)
}

fn parse_number<T>(field: &str, raw: &str) -> Result<T, DispatchError>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DispatchError::invalid_argument(format!(
            "{field} cannot be empty"
        )));
    }
    trimmed
        .parse::<T>()
        .map_err(|e| DispatchError::invalid_argument(format!("{field} '{raw}': {e}")))
}
