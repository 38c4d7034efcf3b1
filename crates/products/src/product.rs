use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use winechain_core::{Aggregate, AggregateRoot, DomainError, Event, ProductKey};

use crate::model::{Distribution, Grape, Transaction, Wine, Winery};
use crate::stage::{Stage, StageRule, Transition};

/// Aggregate root: Product.
///
/// The aggregate is also the persisted record: it is stored whole under its
/// key and every mutation re-encodes it. History lives in `transactions` and
/// `distributions`, both append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    key: ProductKey,
    company_name: String,
    grape: Grape,
    winery: Winery,
    wine: Wine,
    distributions: Vec<Distribution>,
    transactions: Vec<Transaction>,
}

impl Product {
    /// Create an empty, not-yet-created aggregate instance for a key.
    pub fn empty(key: ProductKey) -> Self {
        Self {
            key,
            company_name: String::new(),
            grape: Grape::default(),
            winery: Winery::default(),
            wine: Wine::default(),
            distributions: Vec::new(),
            transactions: Vec::new(),
        }
    }

    pub fn key(&self) -> ProductKey {
        self.key
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn grape(&self) -> &Grape {
        &self.grape
    }

    pub fn winery(&self) -> &Winery {
        &self.winery
    }

    pub fn wine(&self) -> &Wine {
        &self.wine
    }

    pub fn distributions(&self) -> &[Distribution] {
        &self.distributions
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// A product exists once it has at least one transaction.
    pub fn is_created(&self) -> bool {
        !self.transactions.is_empty()
    }

    /// Raw stage identifier of the last transaction.
    pub fn current_stage_id(&self) -> Option<u32> {
        self.transactions.last().map(|t| t.stage_id)
    }

    /// Current stage, or `InvalidState` when the stored identifier is unknown.
    pub fn current_stage(&self) -> Result<Stage, DomainError> {
        let id = self.current_stage_id().ok_or(DomainError::NotFound)?;
        Stage::try_from(id)
    }
}

impl AggregateRoot for Product {
    type Id = ProductKey;

    fn id(&self) -> &Self::Id {
        &self.key
    }
}

/// Command: CreateProduct (first transaction at stage 10).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProduct {
    pub key: ProductKey,
    pub company_name: String,
    pub grape: Grape,
    pub winery: Winery,
    pub wine: Wine,
    pub occurred_at: DateTime<Utc>,
}

/// Stage-specific payload of an advance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "data")]
pub enum StageInput {
    Transport(Distribution),
    Winery(Winery),
    Bottling(Wine),
}

impl StageInput {
    pub fn rule(&self) -> StageRule {
        match self {
            StageInput::Transport(_) => StageRule::AppendDistribution,
            StageInput::Winery(_) => StageRule::ReplaceWinery,
            StageInput::Bottling(_) => StageRule::ReplaceWine,
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        match self {
            StageInput::Transport(d) => d.validate(),
            StageInput::Winery(w) => w.validate(),
            StageInput::Bottling(_) => Ok(()),
        }
    }
}

/// Command: AdvanceProduct to the next stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvanceProduct {
    pub key: ProductKey,
    pub input: StageInput,
    /// Start of the new stage; defaults to `occurred_at`.
    pub started_at: Option<DateTime<Utc>>,
    /// When the previous stage closes.
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProductCommand {
    CreateProduct(CreateProduct),
    AdvanceProduct(AdvanceProduct),
}

/// Event: ProductCreated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCreated {
    pub key: ProductKey,
    pub company_name: String,
    pub grape: Grape,
    pub winery: Winery,
    pub wine: Wine,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductAdvanced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductAdvanced {
    pub key: ProductKey,
    pub from: Stage,
    pub to: Stage,
    pub input: StageInput,
    pub started_at: DateTime<Utc>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProductEvent {
    ProductCreated(ProductCreated),
    ProductAdvanced(ProductAdvanced),
}

impl Event for ProductEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProductEvent::ProductCreated(_) => "products.product.created",
            ProductEvent::ProductAdvanced(_) => "products.product.advanced",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ProductEvent::ProductCreated(e) => e.occurred_at,
            ProductEvent::ProductAdvanced(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Product {
    type Command = ProductCommand;
    type Event = ProductEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ProductEvent::ProductCreated(e) => {
                self.key = e.key;
                self.company_name = e.company_name.clone();
                self.grape = e.grape.clone();
                self.winery = e.winery.clone();
                self.wine = e.wine.clone();
                self.distributions.clear();
                self.transactions = vec![Transaction::open(Stage::INITIAL.id(), e.occurred_at)];
            }
            ProductEvent::ProductAdvanced(e) => {
                if let Some(last) = self.transactions.last_mut() {
                    last.end = Some(e.occurred_at);
                }
                match &e.input {
                    StageInput::Transport(leg) => self.distributions.push(leg.clone()),
                    StageInput::Winery(winery) => self.winery = winery.clone(),
                    StageInput::Bottling(wine) => self.wine = wine.clone(),
                }
                self.transactions
                    .push(Transaction::open(e.to.id(), e.started_at));
            }
        }
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ProductCommand::CreateProduct(cmd) => self.handle_create(cmd),
            ProductCommand::AdvanceProduct(cmd) => self.handle_advance(cmd),
        }
    }
}

impl Product {
    fn ensure_key(&self, key: ProductKey) -> Result<(), DomainError> {
        if self.key != key {
            return Err(DomainError::validation(format!(
                "key mismatch (record: {}, command: {key})",
                self.key
            )));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateProduct) -> Result<Vec<ProductEvent>, DomainError> {
        if self.is_created() {
            return Err(DomainError::conflict(format!(
                "product {} already exists",
                cmd.key
            )));
        }
        self.ensure_key(cmd.key)?;

        if cmd.company_name.trim().is_empty() {
            return Err(DomainError::validation("company name cannot be empty"));
        }
        cmd.grape.validate()?;
        cmd.winery.validate()?;

        Ok(vec![ProductEvent::ProductCreated(ProductCreated {
            key: cmd.key,
            company_name: cmd.company_name.clone(),
            grape: cmd.grape.clone(),
            winery: cmd.winery.clone(),
            wine: cmd.wine.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_advance(&self, cmd: &AdvanceProduct) -> Result<Vec<ProductEvent>, DomainError> {
        if !self.is_created() {
            return Err(DomainError::not_found());
        }
        self.ensure_key(cmd.key)?;

        let current = self.current_stage()?;
        let Transition { from, rule, to } = current.transition().ok_or_else(|| {
            DomainError::invalid_state(format!(
                "product {} is at terminal stage {current}; no further transition is defined",
                self.key
            ))
        })?;

        if cmd.input.rule() != rule {
            return Err(DomainError::invalid_state(format!(
                "product {} is at stage {from} which expects {rule:?}, got {:?}",
                self.key,
                cmd.input.rule()
            )));
        }
        cmd.input.validate()?;

        let started_at = cmd.started_at.unwrap_or(cmd.occurred_at);
        if let Some(last) = self.transactions.last() {
            if started_at < last.start {
                return Err(DomainError::validation(format!(
                    "stage {to} cannot start before stage {from} started"
                )));
            }
        }

        Ok(vec![ProductEvent::ProductAdvanced(ProductAdvanced {
            key: cmd.key,
            from,
            to,
            input: cmd.input.clone(),
            started_at,
            occurred_at: cmd.occurred_at,
        })])
    }
}
