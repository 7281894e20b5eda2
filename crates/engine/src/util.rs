//! Internal helpers for input validation.
//!
//! Dates are kept as `YYYY-MM-DD` strings so range filters can compare them
//! lexicographically; these helpers make sure nothing else gets stored.

use chrono::{NaiveDate, NaiveTime};

use crate::{EngineError, ResultEngine};

/// Validate an ISO calendar date (`YYYY-MM-DD`) and return it trimmed.
pub(crate) fn validate_date(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    // `%Y` accepts fewer than four digits, which would break ordering.
    if trimmed.len() != 10 || NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_err() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must be a YYYY-MM-DD date"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn validate_optional_date(
    value: Option<&str>,
    label: &str,
) -> ResultEngine<Option<String>> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(date) => validate_date(date, label).map(Some),
        None => Ok(None),
    }
}

/// Validate a wall-clock time and normalize it to `HH:MM`.
pub(crate) fn validate_time(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    let parsed = NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| EngineError::InvalidInput("time must be HH:MM".to_string()))?;
    Ok(parsed.format("%H:%M").to_string())
}

pub(crate) fn validate_amount(amount: i64) -> ResultEngine<i64> {
    if amount < 0 {
        return Err(EngineError::InvalidInput("amount must be >= 0".to_string()));
    }
    Ok(amount)
}

pub(crate) fn normalize_required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_iso_dates() {
        assert_eq!(validate_date(" 2025-01-31 ", "date").unwrap(), "2025-01-31");
    }

    #[test]
    fn rejects_non_iso_dates() {
        for bad in ["31/01/2025", "2025-1-31", "2025-02-30", "25-01-31", ""] {
            assert_eq!(
                validate_date(bad, "date"),
                Err(EngineError::InvalidInput("date must be a YYYY-MM-DD date".to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn blank_optional_date_is_none() {
        assert_eq!(validate_optional_date(Some("  "), "returnDate").unwrap(), None);
        assert_eq!(validate_optional_date(None, "returnDate").unwrap(), None);
    }

    #[test]
    fn time_is_normalized_to_minutes() {
        assert_eq!(validate_time("09:05:59").unwrap(), "09:05");
        assert_eq!(validate_time("23:59").unwrap(), "23:59");
        assert!(validate_time("24:00").is_err());
    }

    #[test]
    fn negative_amount_is_rejected() {
        assert!(validate_amount(-1).is_err());
        assert_eq!(validate_amount(0).unwrap(), 0);
    }

    #[test]
    fn optional_text_drops_blanks() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(
            normalize_optional_text(Some(" Ali ")),
            Some("Ali".to_string())
        );
    }
}
