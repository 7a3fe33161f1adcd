//! Parsing of the free-text form inputs into typed bill values.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::BillField;

/// Layout used when a bill date is shown back to the user.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Accepted layouts for a year-last date, tried in order.
const YEAR_LAST_FORMATS: [&str; 2] = ["%d/%m/%Y", "%m/%d/%Y"];
const YEAR_FIRST_FORMAT: &str = "%Y/%m/%d";

/// A single form input that could not be turned into a bill value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{field} is required")]
    Required { field: BillField },

    #[error("{field} must be a valid number, got '{input}'")]
    InvalidNumber { field: BillField, input: String },

    #[error("{field} cannot be negative, got '{input}'")]
    Negative { field: BillField, input: String },

    #[error("{field} must be a date with a four-digit year, got '{input}'")]
    InvalidDate { field: BillField, input: String },
}

impl FieldError {
    pub fn field(&self) -> BillField {
        match self {
            Self::Required { field }
            | Self::InvalidNumber { field, .. }
            | Self::Negative { field, .. }
            | Self::InvalidDate { field, .. } => *field,
        }
    }
}

/// Trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a required, non-negative amount such as `"1,234.56"`.
pub fn parse_amount(
    field: BillField,
    s: &str,
) -> Result<Decimal, FieldError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Err(FieldError::Required { field });
    }

    let value: Decimal = normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, %field, "invalid decimal: {}", e);
        FieldError::InvalidNumber {
            field,
            input: s.to_string(),
        }
    })?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(FieldError::Negative {
            field,
            input: s.to_string(),
        });
    }
    Ok(value)
}

/// Parses a required bill date.
///
/// Day-first `DD/MM/YYYY` is preferred; `MM/DD/YYYY` and `YYYY/MM/DD` are
/// accepted when the day-first reading is impossible. Single-digit days and
/// months are fine, but the year must have four digits.
pub fn parse_bill_date(s: &str) -> Result<NaiveDate, FieldError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Required {
            field: BillField::Date,
        });
    }

    let invalid = || FieldError::InvalidDate {
        field: BillField::Date,
        input: s.to_string(),
    };

    let parts: Vec<&str> = trimmed.split('/').collect();
    let formats: &[&str] = match parts.as_slice() {
        [year, _, _] if is_four_digit_year(year) => &[YEAR_FIRST_FORMAT],
        [_, _, year] if is_four_digit_year(year) => &YEAR_LAST_FORMATS,
        _ => {
            tracing::debug!(input = %s, "bill date has no four-digit year");
            return Err(invalid());
        }
    };

    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| {
            tracing::debug!(input = %s, ?formats, "invalid bill date");
            invalid()
        })
}

fn is_four_digit_year(segment: &str) -> bool {
    segment.len() == 4 && segment.bytes().all(|b| b.is_ascii_digit())
}
