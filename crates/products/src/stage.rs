//! Supply-chain stages and the transition table.

use serde::{Deserialize, Serialize};

use winechain_core::DomainError;

/// Where a product sits in the supply chain.
///
/// Stored as its numeric identifier (10, 20, ...). The order is total and the
/// machine is strictly linear: a stage only ever advances to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum Stage {
    /// 10: harvested, in transit to the winery.
    HarvestTransport,
    /// 20: at the winery.
    WineryProcessing,
    /// 30: in transit to the bottler.
    BottlerTransport,
    /// 40: at the bottler (bottling/labeling).
    Bottling,
    /// 50: in transit to the warehouse.
    WarehouseTransport,
}

/// What a transition merges into the product record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageRule {
    /// Append one distribution leg.
    AppendDistribution,
    /// Replace the winery record wholesale.
    ReplaceWinery,
    /// Replace the wine record wholesale.
    ReplaceWine,
}

/// One row of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Stage,
    pub rule: StageRule,
    pub to: Stage,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::HarvestTransport,
        Stage::WineryProcessing,
        Stage::BottlerTransport,
        Stage::Bottling,
        Stage::WarehouseTransport,
    ];

    /// The initial stage of every new product.
    pub const INITIAL: Stage = Stage::HarvestTransport;

    pub const fn id(self) -> u32 {
        match self {
            Stage::HarvestTransport => 10,
            Stage::WineryProcessing => 20,
            Stage::BottlerTransport => 30,
            Stage::Bottling => 40,
            Stage::WarehouseTransport => 50,
        }
    }

    pub const fn from_id(id: u32) -> Option<Stage> {
        match id {
            10 => Some(Stage::HarvestTransport),
            20 => Some(Stage::WineryProcessing),
            30 => Some(Stage::BottlerTransport),
            40 => Some(Stage::Bottling),
            50 => Some(Stage::WarehouseTransport),
            _ => None,
        }
    }

    /// Transition out of this stage, or `None` for the terminal stage.
    ///
    /// Stage 50 has no successor: a product delivered to the warehouse stays
    /// parked there and further advances are rejected.
    pub const fn transition(self) -> Option<Transition> {
        let (rule, to) = match self {
            Stage::HarvestTransport => (StageRule::AppendDistribution, Stage::WineryProcessing),
            Stage::WineryProcessing => (StageRule::ReplaceWinery, Stage::BottlerTransport),
            Stage::BottlerTransport => (StageRule::AppendDistribution, Stage::Bottling),
            Stage::Bottling => (StageRule::ReplaceWine, Stage::WarehouseTransport),
            Stage::WarehouseTransport => return None,
        };
        Some(Transition {
            from: self,
            rule,
            to,
        })
    }

    pub const fn is_transport(self) -> bool {
        matches!(
            self,
            Stage::HarvestTransport | Stage::BottlerTransport | Stage::WarehouseTransport
        )
    }

    pub const fn is_terminal(self) -> bool {
        self.transition().is_none()
    }
}

impl core::fmt::Display for Stage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl From<Stage> for u32 {
    fn from(value: Stage) -> Self {
        value.id()
    }
}

impl TryFrom<u32> for Stage {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Stage::from_id(value)
            .ok_or_else(|| DomainError::invalid_state(format!("unknown stage identifier {value}")))
    }
}
