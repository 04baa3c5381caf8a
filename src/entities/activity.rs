//! Activity log entry - an audit record of one user action

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::EntityId;

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    ProductCreated,
    ProductUpdated,
    ProductDeleted,
    StockAdded,
    StockRemoved,
    StockAdjusted,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::ProductCreated => "product_created",
            ActivityType::ProductUpdated => "product_updated",
            ActivityType::ProductDeleted => "product_deleted",
            ActivityType::StockAdded => "stock_added",
            ActivityType::StockRemoved => "stock_removed",
            ActivityType::StockAdjusted => "stock_adjusted",
        }
    }

    /// Label for listings ("STOCK ADDED")
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ").to_uppercase()
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What kind of record the activity touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Product,
    Stock,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Product => write!(f, "product"),
            EntityType::Stock => write!(f, "stock"),
        }
    }
}

/// One entry in the activity log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityEntry {
    pub id: EntityId,

    pub activity_type: ActivityType,

    pub entity_type: EntityType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EntityId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,

    pub actor: String,

    pub created: DateTime<Utc>,
}

impl Entity for ActivityEntry {
    const PREFIX: &'static str = "ACT";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> &str {
        self.entity_name.as_deref().unwrap_or("Unknown")
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn author(&self) -> &str {
        &self.actor
    }
}
