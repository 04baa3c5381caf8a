//! Clock collaborator - the single source of "now" for commands
//!
//! Commands receive a clock instead of reading the system time, so that
//! classification and time-window statistics are reproducible.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::core::classify::{parse_expiration_date, ValidationError};

/// Source of the current date and time
pub trait Clock {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date used as the classification reference
    fn today(&self) -> NaiveDate;
}

/// Reads the system clock; `today` is the local calendar date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to a fixed date (noon UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    date: NaiveDate,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    /// Build from a `YYYY-MM-DD` string
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        parse_expiration_date(s).map(Self::new)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()))
    }

    fn today(&self) -> NaiveDate {
        self.date
    }
}

/// Clock selected at startup: fixed when a reference date was given, else system
pub fn clock_for(today: Option<&str>) -> Result<Box<dyn Clock>, ValidationError> {
    match today {
        Some(s) => {
            log::debug!("Using fixed reference date {}", s);
            Ok(Box::new(FixedClock::parse(s)?))
        }
        None => Ok(Box::new(SystemClock)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::parse("2025-02-01").unwrap();
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert_eq!(clock.now().date_naive(), clock.today());
    }

    #[test]
    fn test_clock_for_rejects_bad_date() {
        assert!(clock_for(Some("yesterday")).is_err());
        assert!(clock_for(None).is_ok());
    }
}
