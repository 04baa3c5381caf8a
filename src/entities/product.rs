//! Product entity type - a stocked meat product

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::classify::{classify_stock, Classifiable, ProductSnapshot, ValidationError};
use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// Product category; each has its own directory and category view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Beef,
    Pork,
    Chicken,
    Fish,
    #[default]
    Other,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::Beef,
            Category::Pork,
            Category::Chicken,
            Category::Fish,
            Category::Other,
        ]
    }

    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Beef => "beef",
            Category::Pork => "pork",
            Category::Chicken => "chicken",
            Category::Fish => "fish",
            Category::Other => "other",
        }
    }

    /// Display name ("Beef", "Pork", ...)
    pub fn title(&self) -> &'static str {
        match self {
            Category::Beef => "Beef",
            Category::Pork => "Pork",
            Category::Chicken => "Chicken",
            Category::Fish => "Fish",
            Category::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beef" => Ok(Category::Beef),
            "pork" => Ok(Category::Pork),
            "chicken" => Ok(Category::Chicken),
            "fish" => Ok(Category::Fish),
            "other" => Ok(Category::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// Field-level problems with a product record
#[derive(Debug, Error, Diagnostic)]
pub enum ProductError {
    #[error("Product name must not be empty")]
    #[diagnostic(code(minv::product::empty_name))]
    EmptyName,

    #[error("SKU must not be empty")]
    #[diagnostic(code(minv::product::empty_sku))]
    EmptySku,

    #[error("Unit price must not be negative (got {0})")]
    #[diagnostic(code(minv::product::negative_price))]
    NegativePrice(f64),

    #[error("Weight must not be negative (got {0})")]
    #[diagnostic(code(minv::product::negative_weight))]
    NegativeWeight(f64),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Stock(#[from] ValidationError),
}

/// A Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier
    pub id: EntityId,

    /// Product name
    pub name: String,

    /// Stock keeping unit, unique within the project
    pub sku: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub category: Category,

    /// Units on hand
    #[serde(default)]
    pub current_stock: i64,

    /// Restock threshold; 0 means no minimum
    #[serde(default)]
    pub min_stock_level: i64,

    /// Price per unit
    #[serde(default)]
    pub unit_price: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,

    /// Where the product is kept (e.g., "Freezer A")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    /// Path or URL of a product photo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Last modification timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,

    /// Author (who created this record)
    pub author: String,

    /// Revision number, bumped on every write
    #[serde(default = "default_revision")]
    pub entity_revision: u32,
}

fn default_revision() -> u32 {
    1
}

impl Product {
    /// Create a product with required fields; everything else defaults
    pub fn new(
        name: String,
        sku: String,
        category: Category,
        author: String,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Prod),
            name,
            sku,
            description: None,
            category,
            current_stock: 0,
            min_stock_level: 0,
            unit_price: 0.0,
            weight_kg: None,
            expiration_date: None,
            batch_number: None,
            storage_location: None,
            supplier: None,
            image: None,
            created,
            updated: None,
            author,
            entity_revision: 1,
        }
    }

    /// Check the invariants every written product must satisfy
    pub fn validate(&self) -> Result<(), ProductError> {
        if self.name.trim().is_empty() {
            return Err(ProductError::EmptyName);
        }
        if self.sku.trim().is_empty() {
            return Err(ProductError::EmptySku);
        }
        if self.unit_price < 0.0 || self.unit_price.is_nan() {
            return Err(ProductError::NegativePrice(self.unit_price));
        }
        if let Some(w) = self.weight_kg.filter(|w| *w < 0.0 || w.is_nan()) {
            return Err(ProductError::NegativeWeight(w));
        }
        classify_stock(self.current_stock, self.min_stock_level, false)?;
        Ok(())
    }

    /// Value of the stock on hand
    pub fn stock_value(&self) -> f64 {
        self.current_stock.max(0) as f64 * self.unit_price
    }

    /// Record a modification
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated = Some(at);
        self.entity_revision += 1;
    }

    /// Case-insensitive substring match on name or SKU
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.sku.to_lowercase().contains(&query)
    }

    /// File name of this product within its category directory
    pub fn file_name(&self) -> String {
        format!("{}{}", self.id, crate::core::project::ENTITY_SUFFIX)
    }
}

impl Classifiable for Product {
    fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot::new(self.current_stock, self.min_stock_level, self.expiration_date)
    }
}

impl Entity for Product {
    const PREFIX: &'static str = "PROD";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn author(&self) -> &str {
        &self.author
    }
}
