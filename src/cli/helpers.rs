//! Shared helper functions for CLI commands

use chrono::NaiveDate;
use console::style;

use crate::core::classify::{days_until_expiration, ExpirationStatus, StockStatus};
use crate::core::identity::EntityId;
use crate::core::shortid::ShortIdIndex;

/// Format an EntityId for display, truncating if too long
///
/// IDs longer than 16 characters are truncated to 13 chars with "..." suffix.
pub fn format_short_id(id: &EntityId) -> String {
    let s = id.to_string();
    if s.len() > 16 {
        format!("{}...", &s[..13])
    } else {
        s
    }
}

/// Short ID (`PROD@N`) if one is assigned, else the truncated full ID
pub fn display_id(id: &EntityId, short_ids: &ShortIdIndex) -> String {
    short_ids
        .get_short_id(&id.to_string())
        .unwrap_or_else(|| format_short_id(id))
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Badge text shown next to a product in listings ("LOW STOCK", "EXPIRES IN 3D")
pub fn product_badges(
    stock: StockStatus,
    expiration: ExpirationStatus,
    expiration_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Vec<String> {
    let mut badges = Vec::new();
    if stock.needs_restock() {
        badges.push("LOW STOCK".to_string());
    }
    match expiration {
        ExpirationStatus::Expired => badges.push("EXPIRED".to_string()),
        ExpirationStatus::ExpiringSoon => {
            let days = days_until_expiration(expiration_date, today).unwrap_or(0);
            badges.push(format!("EXPIRES IN {}D", days));
        }
        ExpirationStatus::Fresh | ExpirationStatus::None => {}
    }
    badges
}

/// Colour a stock status for terminal output
pub fn styled_stock(status: StockStatus) -> String {
    let label = status.label();
    match status {
        StockStatus::Critical => style(label).red().bold().to_string(),
        StockStatus::Low => style(label).red().to_string(),
        StockStatus::Warning => style(label).yellow().to_string(),
        StockStatus::Ok => style(label).green().to_string(),
    }
}

/// Colour an expiration status for terminal output
pub fn styled_expiration(status: ExpirationStatus) -> String {
    let text = status.to_string();
    match status {
        ExpirationStatus::Expired => style(text).red().bold().to_string(),
        ExpirationStatus::ExpiringSoon => style(text).yellow().to_string(),
        ExpirationStatus::Fresh => style(text).green().to_string(),
        ExpirationStatus::None => style(text).dim().to_string(),
    }
}
