//! Internal helpers for input validation.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every service enforces the same invariants.

use chrono::NaiveDate;

use crate::{
    EngineError, MoneyCents, ResultEngine,
    money::{FULL_BP, MAX_AMOUNT_MINOR},
};

/// Trim a required name and return `(display, normalized)`.
///
/// The normalized form is used for case-insensitive uniqueness checks.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<(String, String)> {
    let display = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if display.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    let normalized = display.to_lowercase();
    Ok((display, normalized))
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Reject zero, negative and oversized amounts.
pub(crate) fn validate_positive_amount(amount_minor: i64, label: &str) -> ResultEngine<()> {
    if amount_minor <= 0 {
        return Err(EngineError::InvalidAmount(format!(
            "{label} amount must be > 0"
        )));
    }
    if amount_minor > MAX_AMOUNT_MINOR {
        return Err(EngineError::InvalidAmount(format!(
            "{label} amount must be <= {}",
            MoneyCents::new(MAX_AMOUNT_MINOR)
        )));
    }
    Ok(())
}

pub(crate) fn validate_percentage(percentage_bp: i64) -> ResultEngine<()> {
    if !(0..=FULL_BP).contains(&percentage_bp) {
        return Err(EngineError::InvalidPercentage(format!(
            "percentage must be between 0 and {FULL_BP} basis points, got {percentage_bp}"
        )));
    }
    Ok(())
}

/// Inclusive calendar date range used by list filters and reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    #[must_use]
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Unbounded on both sides.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    pub(crate) fn validate(&self) -> ResultEngine<()> {
        if let (Some(from), Some(to)) = (self.from, self.to)
            && from > to
        {
            return Err(EngineError::InvalidRange(
                "from must be <= to".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn names_are_collapsed_and_normalized() {
        let (display, norm) = normalize_required_name("  Building   Fund ", "fund").unwrap();
        assert_eq!(display, "Building Fund");
        assert_eq!(norm, "building fund");
    }

    #[test]
    fn blank_name_is_rejected() {
        assert_eq!(
            normalize_required_name("   ", "sponsor"),
            Err(EngineError::InvalidName(
                "sponsor name must not be empty".to_string()
            ))
        );
    }

    #[test]
    fn amount_bounds() {
        assert!(validate_positive_amount(1, "receipt").is_ok());
        assert!(validate_positive_amount(MAX_AMOUNT_MINOR, "receipt").is_ok());
        assert!(validate_positive_amount(0, "receipt").is_err());
        assert_eq!(
            validate_positive_amount(MAX_AMOUNT_MINOR + 1, "receipt"),
            Err(EngineError::InvalidAmount(
                "receipt amount must be <= 10000000000000.00".to_string()
            ))
        );
    }

    #[test]
    fn percentage_bounds() {
        assert!(validate_percentage(0).is_ok());
        assert!(validate_percentage(10_000).is_ok());
        assert!(validate_percentage(-1).is_err());
        assert!(validate_percentage(10_001).is_err());
    }

    #[test]
    fn range_is_inclusive() {
        let range = DateRange::new(Some(day(2)), Some(day(4)));
        assert!(!range.contains(day(1)));
        assert!(range.contains(day(2)));
        assert!(range.contains(day(4)));
        assert!(!range.contains(day(5)));
        assert!(DateRange::all().contains(day(1)));
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(DateRange::new(Some(day(5)), Some(day(1))).validate().is_err());
        assert!(DateRange::new(Some(day(1)), Some(day(1))).validate().is_ok());
    }
}
