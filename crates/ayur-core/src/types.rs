//! Common value types used throughout the portal

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency every fee and transaction defaults to
pub const DEFAULT_CURRENCY: &str = "INR";

/// Inclusive date range used by date filters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn single(day: NaiveDate) -> Self {
        Self::new(Some(day), Some(day))
    }

    /// An unbounded range matches everything
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from.map_or(true, |from| day >= from) && self.to.map_or(true, |to| day <= to)
    }

    pub fn duration_days(&self) -> Option<i64> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => Some((to - from).num_days()),
            _ => None,
        }
    }
}

/// Amount of money with its currency code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub amount: f64,
    pub currency: String,
}

impl Money {
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    pub fn inr(amount: f64) -> Self {
        Self::new(amount, DEFAULT_CURRENCY)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}", self.currency, self.amount)
    }
}

/// Serde default for currency fields
pub fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_date_range_contains() {
        let range = DateRange::new(Some(day(5)), Some(day(10)));
        assert!(range.contains(day(5)));
        assert!(range.contains(day(10)));
        assert!(!range.contains(day(11)));
        assert_eq!(range.duration_days(), Some(5));
    }

    #[test]
    fn test_open_ended_range() {
        let range = DateRange::new(Some(day(5)), None);
        assert!(range.contains(day(30)));
        assert!(!range.contains(day(4)));
        assert!(DateRange::default().is_unbounded());
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::inr(1500.0).to_string(), "INR 1500.00");
    }
}
