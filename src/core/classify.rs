//! Inventory classification - stock status, expiration status and urgency ranking
//!
//! Every screen that renders a stock or expiration badge goes through this
//! module. All functions are pure: the reference date is always passed in by
//! the caller (see [`crate::core::clock::Clock`]), never read from the system.

use chrono::{DateTime, NaiveDate};
use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

/// Stock-to-minimum ratio at or below which stock is critical.
pub const CRITICAL_RATIO: f64 = 0.25;

/// Ratio at or below which stock is low in detailed (three-tier) mode.
pub const LOW_RATIO: f64 = 0.5;

/// Ratio at or below which a product needs restocking at all.
pub const ALERT_RATIO: f64 = 1.0;

/// Days before expiration (inclusive) at which a product is expiring soon.
pub const EXPIRING_SOON_DAYS: i64 = 7;

/// Input outside the documented domain of the classifier
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ValidationError {
    #[error("Invalid stock quantity: {0} (must not be negative)")]
    #[diagnostic(
        code(minv::validation::negative_stock),
        help("Correct the product file or record an adjustment with `minv stock adjust`")
    )]
    NegativeStock(i64),

    #[error("Invalid minimum stock level: {0} (must not be negative)")]
    #[diagnostic(
        code(minv::validation::negative_minimum),
        help("Use 0 when no minimum stock level applies")
    )]
    NegativeMinimum(i64),

    #[error("Invalid expiration date: '{0}'")]
    #[diagnostic(
        code(minv::validation::invalid_date),
        help("Dates are written as YYYY-MM-DD, e.g. 2025-06-30")
    )]
    InvalidDate(String),
}

/// Stock status derived from current stock and minimum stock level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Ok,
    /// Only produced in detailed mode, for stock between half and all of the minimum
    Warning,
    Low,
    Critical,
}

impl StockStatus {
    /// Whether the product should carry a restock badge
    ///
    /// Gives the same answer in both classification modes.
    pub fn needs_restock(&self) -> bool {
        !matches!(self, StockStatus::Ok)
    }

    /// Human-readable label used on alert badges
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::Ok => "OK",
            StockStatus::Warning => "Warning",
            StockStatus::Low => "Low",
            StockStatus::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockStatus::Ok => write!(f, "ok"),
            StockStatus::Warning => write!(f, "warning"),
            StockStatus::Low => write!(f, "low"),
            StockStatus::Critical => write!(f, "critical"),
        }
    }
}

/// Expiration status derived from an optional expiration date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpirationStatus {
    /// No expiration date recorded
    None,
    Fresh,
    ExpiringSoon,
    Expired,
}

impl std::fmt::Display for ExpirationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpirationStatus::None => write!(f, "none"),
            ExpirationStatus::Fresh => write!(f, "fresh"),
            ExpirationStatus::ExpiringSoon => write!(f, "expiring_soon"),
            ExpirationStatus::Expired => write!(f, "expired"),
        }
    }
}

/// The three product fields classification needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub current_stock: i64,
    pub min_stock_level: i64,
    pub expiration_date: Option<NaiveDate>,
}

impl ProductSnapshot {
    pub fn new(current_stock: i64, min_stock_level: i64, expiration_date: Option<NaiveDate>) -> Self {
        Self {
            current_stock,
            min_stock_level,
            expiration_date,
        }
    }

    pub fn stock_status(&self, detailed: bool) -> Result<StockStatus, ValidationError> {
        classify_stock(self.current_stock, self.min_stock_level, detailed)
    }

    pub fn expiration_status(&self, reference: NaiveDate) -> ExpirationStatus {
        classify_expiration(self.expiration_date, reference)
    }
}

/// Anything that can be projected onto a [`ProductSnapshot`]
pub trait Classifiable {
    fn snapshot(&self) -> ProductSnapshot;
}

impl Classifiable for ProductSnapshot {
    fn snapshot(&self) -> ProductSnapshot {
        *self
    }
}

fn check_domain(current_stock: i64, min_stock_level: i64) -> Result<(), ValidationError> {
    if current_stock < 0 {
        return Err(ValidationError::NegativeStock(current_stock));
    }
    if min_stock_level < 0 {
        return Err(ValidationError::NegativeMinimum(min_stock_level));
    }
    Ok(())
}

/// Classify stock against its minimum level
///
/// With no minimum configured (`min_stock_level == 0`) only an empty shelf is
/// alarming. Otherwise the stock-to-minimum ratio picks the tier:
///
/// | ratio          | badge mode | detailed mode |
/// |----------------|------------|---------------|
/// | `<= 0.25`      | Critical   | Critical      |
/// | `<= 0.5`       | Low        | Low           |
/// | `<= 1.0`       | Low        | Warning       |
/// | `> 1.0`        | Ok         | Ok            |
pub fn classify_stock(
    current_stock: i64,
    min_stock_level: i64,
    detailed: bool,
) -> Result<StockStatus, ValidationError> {
    check_domain(current_stock, min_stock_level)?;

    if min_stock_level == 0 {
        return Ok(if current_stock == 0 {
            StockStatus::Critical
        } else {
            StockStatus::Ok
        });
    }

    let ratio = current_stock as f64 / min_stock_level as f64;
    let status = if ratio <= CRITICAL_RATIO {
        StockStatus::Critical
    } else if detailed && ratio <= LOW_RATIO {
        StockStatus::Low
    } else if ratio <= ALERT_RATIO {
        if detailed {
            StockStatus::Warning
        } else {
            StockStatus::Low
        }
    } else {
        StockStatus::Ok
    };

    Ok(status)
}

/// Whole calendar days from `reference` until `expiration_date`
pub fn days_until_expiration(expiration_date: Option<NaiveDate>, reference: NaiveDate) -> Option<i64> {
    expiration_date.map(|date| date.signed_duration_since(reference).num_days())
}

/// Classify an expiration date relative to `reference`
///
/// A product expiring on the reference date is still expiring soon; it only
/// becomes expired once that day has passed.
pub fn classify_expiration(expiration_date: Option<NaiveDate>, reference: NaiveDate) -> ExpirationStatus {
    match days_until_expiration(expiration_date, reference) {
        None => ExpirationStatus::None,
        Some(days) if days < 0 => ExpirationStatus::Expired,
        Some(days) if days <= EXPIRING_SOON_DAYS => ExpirationStatus::ExpiringSoon,
        Some(_) => ExpirationStatus::Fresh,
    }
}

/// Parse an expiration date given as `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_expiration_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))
}

/// Parse and classify a textual expiration date; empty input means no date
pub fn classify_expiration_str(
    expiration_date: Option<&str>,
    reference: NaiveDate,
) -> Result<ExpirationStatus, ValidationError> {
    let date = match expiration_date.map(str::trim) {
        None | Some("") => None,
        Some(s) => Some(parse_expiration_date(s)?),
    };
    Ok(classify_expiration(date, reference))
}

/// Which alert list an urgency ranking is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Stock,
    Expiration,
}

/// An item paired with its urgency rank (lower is more urgent)
#[derive(Debug, Clone, Copy)]
pub struct Ranked<'a, T> {
    pub item: &'a T,
    pub rank: f64,
}

/// Urgency of a single snapshot, or `None` when it has no place in the list
pub fn urgency_rank(
    snapshot: &ProductSnapshot,
    kind: AlertKind,
    reference: NaiveDate,
) -> Result<Option<f64>, ValidationError> {
    check_domain(snapshot.current_stock, snapshot.min_stock_level)?;
    let rank = match kind {
        AlertKind::Stock => {
            Some(snapshot.current_stock as f64 / snapshot.min_stock_level.max(1) as f64)
        }
        AlertKind::Expiration => {
            days_until_expiration(snapshot.expiration_date, reference).map(|days| days as f64)
        }
    };
    Ok(rank)
}

/// Order items so the most at-risk come first
///
/// The sort is stable, so items of equal urgency keep their input order
/// (callers pass products newest first). For expiration rankings, items
/// without an expiration date are left out.
pub fn rank_urgency<'a, T: Classifiable>(
    items: &'a [T],
    kind: AlertKind,
    reference: NaiveDate,
) -> Result<Vec<Ranked<'a, T>>, ValidationError> {
    let mut ranked = Vec::with_capacity(items.len());
    for item in items {
        if let Some(rank) = urgency_rank(&item.snapshot(), kind, reference)? {
            ranked.push(Ranked { item, rank });
        }
    }
    ranked.sort_by(|a, b| a.rank.total_cmp(&b.rank));
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_stock_tiers_badge_mode() {
        assert_eq!(classify_stock(2, 10, false).unwrap(), StockStatus::Critical);
        assert_eq!(classify_stock(25, 100, false).unwrap(), StockStatus::Critical);
        assert_eq!(classify_stock(26, 100, false).unwrap(), StockStatus::Low);
        assert_eq!(classify_stock(10, 10, false).unwrap(), StockStatus::Low);
        assert_eq!(classify_stock(11, 10, false).unwrap(), StockStatus::Ok);
    }

    #[test]
    fn test_stock_tiers_detailed_mode() {
        assert_eq!(classify_stock(1, 4, true).unwrap(), StockStatus::Critical);
        assert_eq!(classify_stock(5, 10, true).unwrap(), StockStatus::Low);
        assert_eq!(classify_stock(6, 10, true).unwrap(), StockStatus::Warning);
        assert_eq!(classify_stock(10, 10, true).unwrap(), StockStatus::Warning);
        assert_eq!(classify_stock(11, 10, true).unwrap(), StockStatus::Ok);
    }

    #[test]
    fn test_restock_decision_matches_across_modes() {
        for min in 0..=12 {
            for cur in 0..=30 {
                let badge = classify_stock(cur, min, false).unwrap();
                let detailed = classify_stock(cur, min, true).unwrap();
                assert_eq!(badge.needs_restock(), detailed.needs_restock(), "{cur}/{min}");
            }
        }
    }

    #[test]
    fn test_zero_minimum() {
        assert_eq!(classify_stock(0, 0, false).unwrap(), StockStatus::Critical);
        assert_eq!(classify_stock(5, 0, false).unwrap(), StockStatus::Ok);
        assert_eq!(classify_stock(0, 0, true).unwrap(), StockStatus::Critical);
    }

    #[test]
    fn test_negative_input_rejected() {
        assert_eq!(
            classify_stock(-1, 10, false),
            Err(ValidationError::NegativeStock(-1))
        );
        assert_eq!(
            classify_stock(3, -2, true),
            Err(ValidationError::NegativeMinimum(-2))
        );
    }

    #[test]
    fn test_expiration_boundaries() {
        let today = day("2025-03-10");
        assert_eq!(classify_expiration(None, today), ExpirationStatus::None);
        assert_eq!(classify_expiration(Some(today), today), ExpirationStatus::ExpiringSoon);
        assert_eq!(
            classify_expiration(Some(day("2025-03-09")), today),
            ExpirationStatus::Expired
        );
        assert_eq!(
            classify_expiration(Some(day("2025-03-17")), today),
            ExpirationStatus::ExpiringSoon
        );
        assert_eq!(
            classify_expiration(Some(day("2025-03-18")), today),
            ExpirationStatus::Fresh
        );
    }

    #[test]
    fn test_expiration_across_month_and_year() {
        let today = day("2024-12-28");
        assert_eq!(days_until_expiration(Some(day("2025-01-04")), today), Some(7));
        assert_eq!(
            classify_expiration(Some(day("2025-01-05")), today),
            ExpirationStatus::Fresh
        );
    }

    #[test]
    fn test_parse_expiration_date() {
        assert_eq!(parse_expiration_date("2025-06-30").unwrap(), day("2025-06-30"));
        assert_eq!(
            parse_expiration_date("2025-06-30T23:30:00+00:00").unwrap(),
            day("2025-06-30")
        );
        assert_eq!(
            parse_expiration_date("30/06/2025"),
            Err(ValidationError::InvalidDate("30/06/2025".to_string()))
        );
    }

    #[test]
    fn test_classify_expiration_str() {
        let today = day("2025-03-10");
        assert_eq!(
            classify_expiration_str(None, today).unwrap(),
            ExpirationStatus::None
        );
        assert_eq!(
            classify_expiration_str(Some(""), today).unwrap(),
            ExpirationStatus::None
        );
        assert_eq!(
            classify_expiration_str(Some("2025-03-12"), today).unwrap(),
            ExpirationStatus::ExpiringSoon
        );
        assert!(classify_expiration_str(Some("soon"), today).is_err());
    }

    #[test]
    fn test_rank_stock_most_depleted_first() {
        let items = [
            ProductSnapshot::new(2, 10, None),
            ProductSnapshot::new(1, 10, None),
            ProductSnapshot::new(8, 10, None),
        ];
        let ranked = rank_urgency(&items, AlertKind::Stock, day("2025-01-01")).unwrap();
        let stocks: Vec<i64> = ranked.iter().map(|r| r.item.current_stock).collect();
        assert_eq!(stocks, vec![1, 2, 8]);
    }

    #[test]
    fn test_rank_stock_is_stable() {
        let items = [
            ProductSnapshot::new(5, 10, Some(day("2025-01-01"))),
            ProductSnapshot::new(1, 2, Some(day("2025-01-02"))),
            ProductSnapshot::new(0, 0, None),
        ];
        let ranked = rank_urgency(&items, AlertKind::Stock, day("2025-01-01")).unwrap();
        assert_eq!(ranked[0].item.current_stock, 0);
        // 5/10 and 1/2 tie; input order is kept
        assert_eq!(ranked[1].item.expiration_date, Some(day("2025-01-01")));
        assert_eq!(ranked[2].item.expiration_date, Some(day("2025-01-02")));
    }

    #[test]
    fn test_rank_expiration_excludes_undated() {
        let today = day("2025-03-10");
        let items = [
            ProductSnapshot::new(1, 1, None),
            ProductSnapshot::new(1, 1, Some(day("2025-03-15"))),
            ProductSnapshot::new(1, 1, Some(day("2025-03-08"))),
            ProductSnapshot::new(1, 1, None),
        ];
        let ranked = rank_urgency(&items, AlertKind::Expiration, today).unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].rank, -2.0);
        assert_eq!(ranked[1].rank, 5.0);
    }

    #[test]
    fn test_rank_fails_on_invalid_item() {
        let items = [
            ProductSnapshot::new(1, 10, None),
            ProductSnapshot::new(-4, 10, None),
        ];
        assert!(rank_urgency(&items, AlertKind::Stock, day("2025-01-01")).is_err());
    }

    #[test]
    fn test_scenario_low_and_expiring() {
        let today = day("2025-03-10");
        let product = ProductSnapshot::new(3, 10, Some(day("2025-03-12")));
        assert_eq!(product.stock_status(false).unwrap(), StockStatus::Low);
        assert_eq!(product.expiration_status(today), ExpirationStatus::ExpiringSoon);
    }
}
