//! Stock adjustments - applying inventory transactions to products

use miette::Diagnostic;
use thiserror::Error;

use crate::core::clock::Clock;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::journal::{Journal, JournalError};
use crate::core::project::Project;
use crate::entities::activity::ActivityType;
use crate::entities::product::Product;
use crate::entities::transaction::{InventoryTransaction, TransactionType};

#[derive(Debug, Error, Diagnostic)]
pub enum StockError {
    #[error("Quantity must be at least {min} for {kind} (got {quantity})")]
    #[diagnostic(code(minv::stock::invalid_quantity))]
    InvalidQuantity {
        kind: TransactionType,
        quantity: i64,
        min: i64,
    },

    #[error("Insufficient stock for {product}: {available} on hand, {requested} requested")]
    #[diagnostic(
        code(minv::stock::insufficient),
        help("Record received stock with `--type addition` or correct the count with `--type adjustment`")
    )]
    Insufficient {
        product: String,
        available: i64,
        requested: i64,
    },

    #[error("Stock overflow for {product}: cannot add {quantity} units")]
    #[diagnostic(
        code(minv::stock::overflow),
        help("Check the quantity, or correct the count with `--type adjustment`")
    )]
    Overflow { product: String, quantity: i64 },

    #[error("Product {0} has a negative stock count; correct it with an adjustment first")]
    #[diagnostic(code(minv::stock::corrupt_count))]
    CorruptCount(String),
}

/// Stock level after applying a movement of `quantity` to `current`
pub fn resulting_stock(
    product_name: &str,
    current: i64,
    kind: TransactionType,
    quantity: i64,
) -> Result<i64, StockError> {
    let min = match kind {
        TransactionType::Adjustment => 0,
        _ => 1,
    };
    if quantity < min {
        return Err(StockError::InvalidQuantity { kind, quantity, min });
    }
    if current < 0 && kind != TransactionType::Adjustment {
        return Err(StockError::CorruptCount(product_name.to_string()));
    }

    match kind {
        TransactionType::Addition => current
            .checked_add(quantity)
            .ok_or_else(|| StockError::Overflow {
                product: product_name.to_string(),
                quantity,
            }),
        TransactionType::Removal | TransactionType::Sale => {
            if quantity > current {
                Err(StockError::Insufficient {
                    product: product_name.to_string(),
                    available: current,
                    requested: quantity,
                })
            } else {
                Ok(current - quantity)
            }
        }
        TransactionType::Adjustment => Ok(quantity),
    }
}

/// Activity type recorded for a transaction type
pub fn activity_for(kind: TransactionType) -> ActivityType {
    match kind {
        TransactionType::Addition => ActivityType::StockAdded,
        TransactionType::Removal | TransactionType::Sale => ActivityType::StockRemoved,
        TransactionType::Adjustment => ActivityType::StockAdjusted,
    }
}

/// Apply a movement to `product` in memory and return the transaction record
///
/// The product is left untouched when the movement is rejected.
pub fn apply(
    product: &mut Product,
    kind: TransactionType,
    quantity: i64,
    notes: Option<String>,
    author: &str,
    clock: &dyn Clock,
) -> Result<InventoryTransaction, StockError> {
    let before = product.current_stock;
    let after = resulting_stock(&product.name, before, kind, quantity)?;
    let now = clock.now();

    product.current_stock = after;
    product.touch(now);

    Ok(InventoryTransaction {
        id: EntityId::new(EntityPrefix::Txn),
        product_id: product.id,
        product_name: product.name.clone(),
        transaction_type: kind,
        quantity,
        stock_before: before,
        stock_after: after,
        notes: notes.filter(|n| !n.trim().is_empty()),
        created_by: author.to_string(),
        created: now,
    })
}

pub fn transaction_journal(project: &Project) -> Journal<InventoryTransaction> {
    Journal::new(project.transactions_path())
}

/// All recorded transactions, oldest first
pub fn load_transactions(project: &Project) -> Result<Vec<InventoryTransaction>, JournalError> {
    transaction_journal(project).read_all()
}
