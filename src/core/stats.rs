//! Dashboard statistics - aggregate figures over products and transactions

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::core::classify::{
    classify_expiration, classify_stock, ExpirationStatus, ValidationError,
};
use crate::entities::product::{Category, Product};
use crate::entities::transaction::{InventoryTransaction, TransactionType};

/// Window for the recent sales figure
pub const SALES_WINDOW_DAYS: i64 = 30;

/// Per-category totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub product_count: usize,
    pub total_stock: i64,
    pub value: f64,
}

/// Headline figures of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_products: usize,
    pub low_stock: usize,
    pub inventory_value: f64,
    pub expiring_soon: usize,
    pub expired: usize,
    pub recent_sales: usize,
    pub categories: Vec<CategorySummary>,
}

impl DashboardStats {
    /// Compute the dashboard from already loaded records
    pub fn compute(
        products: &[Product],
        transactions: &[InventoryTransaction],
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let mut low_stock = 0;
        let mut expiring_soon = 0;
        let mut expired = 0;

        for product in products {
            if classify_stock(product.current_stock, product.min_stock_level, false)?.needs_restock() {
                low_stock += 1;
            }
            match classify_expiration(product.expiration_date, today) {
                ExpirationStatus::ExpiringSoon => expiring_soon += 1,
                ExpirationStatus::Expired => expired += 1,
                ExpirationStatus::Fresh | ExpirationStatus::None => {}
            }
        }

        let cutoff = now - Duration::days(SALES_WINDOW_DAYS);
        let recent_sales = transactions
            .iter()
            .filter(|t| t.transaction_type == TransactionType::Sale && t.created >= cutoff)
            .count();

        Ok(Self {
            total_products: products.len(),
            low_stock,
            inventory_value: products.iter().map(Product::stock_value).sum(),
            expiring_soon,
            expired,
            recent_sales,
            categories: category_overview(products),
        })
    }
}

/// Totals for every category, in display order, including empty ones
pub fn category_overview(products: &[Product]) -> Vec<CategorySummary> {
    Category::all()
        .iter()
        .map(|&category| {
            let items = products.iter().filter(|p| p.category == category);
            let mut summary = CategorySummary {
                category,
                product_count: 0,
                total_stock: 0,
                value: 0.0,
            };
            for p in items {
                summary.product_count += 1;
                summary.total_stock = summary.total_stock.saturating_add(p.current_stock);
                summary.value += p.stock_value();
            }
            summary
        })
        .collect()
}
