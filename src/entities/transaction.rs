//! Inventory transaction entity - one recorded stock movement

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::EntityId;

/// Kind of stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Stock received
    Addition,
    /// Stock taken out (waste, transfer)
    Removal,
    /// Stock sold
    Sale,
    /// Physical count correction; quantity is the new stock level
    Adjustment,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Addition => write!(f, "addition"),
            TransactionType::Removal => write!(f, "removal"),
            TransactionType::Sale => write!(f, "sale"),
            TransactionType::Adjustment => write!(f, "adjustment"),
        }
    }
}

/// A recorded stock movement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryTransaction {
    pub id: EntityId,

    /// Product the movement applies to
    pub product_id: EntityId,

    /// Product name at the time of the movement
    pub product_name: String,

    pub transaction_type: TransactionType,

    pub quantity: i64,

    pub stock_before: i64,

    pub stock_after: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub created_by: String,

    pub created: DateTime<Utc>,
}

impl Entity for InventoryTransaction {
    const PREFIX: &'static str = "TXN";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.product_name
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn author(&self) -> &str {
        &self.created_by
    }
}
