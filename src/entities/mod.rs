//! Entity type definitions

pub mod activity;
pub mod product;
pub mod transaction;

pub use activity::{ActivityEntry, ActivityType, EntityType};
pub use product::{Category, Product};
pub use transaction::{InventoryTransaction, TransactionType};
