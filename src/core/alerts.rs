//! Alert lists - ranked low-stock and expiring products

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::classify::{
    classify_expiration, classify_stock, rank_urgency, AlertKind, ExpirationStatus, StockStatus,
    ValidationError,
};
use crate::entities::product::Product;

/// A product that needs restocking, with its severity tier
#[derive(Debug, Clone, Serialize)]
pub struct StockAlert<'a> {
    #[serde(flatten)]
    pub product: AlertProduct<'a>,
    pub severity: StockStatus,
    pub ratio: f64,
}

/// An expiring or expired product
#[derive(Debug, Clone, Serialize)]
pub struct ExpirationAlert<'a> {
    #[serde(flatten)]
    pub product: AlertProduct<'a>,
    pub status: ExpirationStatus,
    pub days_until: i64,
}

/// The product fields alert listings show
#[derive(Debug, Clone, Serialize)]
pub struct AlertProduct<'a> {
    pub id: String,
    pub name: &'a str,
    pub sku: &'a str,
    pub category: &'static str,
    pub current_stock: i64,
    pub min_stock_level: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
}

impl<'a> From<&'a Product> for AlertProduct<'a> {
    fn from(p: &'a Product) -> Self {
        Self {
            id: p.id.to_string(),
            name: &p.name,
            sku: &p.sku,
            category: p.category.title(),
            current_stock: p.current_stock,
            min_stock_level: p.min_stock_level,
            expiration_date: p.expiration_date,
        }
    }
}

/// Products needing restock, most depleted first, labelled with the detailed tier
pub fn stock_alerts<'a>(
    products: &'a [Product],
    reference: NaiveDate,
) -> Result<Vec<StockAlert<'a>>, ValidationError> {
    let mut alerts = Vec::new();
    for ranked in rank_urgency(products, AlertKind::Stock, reference)? {
        let p = ranked.item;
        let severity = classify_stock(p.current_stock, p.min_stock_level, true)?;
        if severity.needs_restock() {
            alerts.push(StockAlert {
                product: p.into(),
                severity,
                ratio: ranked.rank,
            });
        }
    }
    Ok(alerts)
}

/// Products expiring within `within_days` (inclusive), most imminent first
///
/// Already expired products are included only when `include_expired` is set.
pub fn expiration_alerts<'a>(
    products: &'a [Product],
    reference: NaiveDate,
    within_days: i64,
    include_expired: bool,
) -> Result<Vec<ExpirationAlert<'a>>, ValidationError> {
    let mut alerts = Vec::new();
    for ranked in rank_urgency(products, AlertKind::Expiration, reference)? {
        let p = ranked.item;
        let days_until = ranked.rank as i64;
        let status = classify_expiration(p.expiration_date, reference);
        let keep = match status {
            ExpirationStatus::Expired => include_expired,
            ExpirationStatus::None => false,
            _ => days_until <= within_days,
        };
        if keep {
            alerts.push(ExpirationAlert {
                product: p.into(),
                status,
                days_until,
            });
        }
    }
    Ok(alerts)
}
