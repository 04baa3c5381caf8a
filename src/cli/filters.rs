//! Filter enums for list commands

use clap::ValueEnum;

use crate::core::classify::{ExpirationStatus, StockStatus};

/// Stock filter for product listings (badge classification)
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum StockFilter {
    /// All products - default
    #[default]
    All,
    /// Products carrying a LOW STOCK badge (includes critical)
    Low,
    /// Critical stock only
    Critical,
    /// Products above their minimum
    Ok,
}

impl StockFilter {
    pub fn matches(&self, status: StockStatus) -> bool {
        match self {
            StockFilter::All => true,
            StockFilter::Low => status.needs_restock(),
            StockFilter::Critical => status == StockStatus::Critical,
            StockFilter::Ok => status == StockStatus::Ok,
        }
    }
}

impl std::fmt::Display for StockFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockFilter::All => write!(f, "all"),
            StockFilter::Low => write!(f, "low"),
            StockFilter::Critical => write!(f, "critical"),
            StockFilter::Ok => write!(f, "ok"),
        }
    }
}

/// Expiration filter for product listings
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum ExpirationFilter {
    /// All products - default
    #[default]
    All,
    /// Past their expiration date
    Expired,
    /// Expiring within a week (today included)
    Expiring,
    /// More than a week left
    Fresh,
    /// Without an expiration date
    None,
}

impl ExpirationFilter {
    pub fn matches(&self, status: ExpirationStatus) -> bool {
        match self {
            ExpirationFilter::All => true,
            ExpirationFilter::Expired => status == ExpirationStatus::Expired,
            ExpirationFilter::Expiring => status == ExpirationStatus::ExpiringSoon,
            ExpirationFilter::Fresh => status == ExpirationStatus::Fresh,
            ExpirationFilter::None => status == ExpirationStatus::None,
        }
    }
}

impl std::fmt::Display for ExpirationFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpirationFilter::All => write!(f, "all"),
            ExpirationFilter::Expired => write!(f, "expired"),
            ExpirationFilter::Expiring => write!(f, "expiring"),
            ExpirationFilter::Fresh => write!(f, "fresh"),
            ExpirationFilter::None => write!(f, "none"),
        }
    }
}
