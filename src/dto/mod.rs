//! Request schemas.
//!
//! Every create, update and query payload is declared here with its
//! `validator` rules and OpenAPI schema, independent of the handler that
//! receives it. Conversions into domain inputs trim text and turn blank
//! optional strings into `None`.

pub mod auth;
pub mod dashboard;
pub mod finance;
pub mod order;
pub mod product;
pub mod scan;
pub mod stock;
pub mod user;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use crate::errors::{AppError, AppResult};

/// Digits with optional leading `+`, spaces and dashes
pub(crate) static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9][0-9 \-]{5,19}$").expect("phone pattern compiles")
});

pub(crate) fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

pub(crate) fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

pub(crate) fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("Must not be negative".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut err = ValidationError::new("positive");
        err.message = Some("Must be greater than 0".into());
        return Err(err);
    }
    Ok(())
}

/// Check an optional amount from a partial update.
pub(crate) fn non_negative(field: &str, value: Option<Decimal>) -> AppResult<Option<Decimal>> {
    match value {
        Some(v) if v < Decimal::ZERO => {
            Err(AppError::validation(format!("{} must not be negative", field)))
        }
        other => Ok(other),
    }
}

pub(crate) fn trimmed(value: String) -> String {
    value.trim().to_string()
}

/// Trim, mapping blank to `None`
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim but keep blank as `Some("")` so partial updates can clear a column
pub(crate) fn clearable(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_phone_pattern() {
        assert!(PHONE_REGEX.is_match("+213 555 00 11 22"));
        assert!(PHONE_REGEX.is_match("0555001122"));
        assert!(!PHONE_REGEX.is_match("call me"));
        assert!(!PHONE_REGEX.is_match("12"));
    }

    #[test]
    fn test_decimal_validators() {
        assert!(validate_non_negative(&dec!(0)).is_ok());
        assert!(validate_non_negative(&dec!(-0.01)).is_err());
        assert!(validate_positive(&dec!(0)).is_err());
        assert!(validate_positive(&dec!(0.01)).is_ok());
    }

    #[test]
    fn test_optional_blank_is_none() {
        assert_eq!(optional(Some("  ".into())), None);
        assert_eq!(optional(Some(" A1 ".into())), Some("A1".into()));
        assert_eq!(clearable(Some("  ".into())), Some(String::new()));
    }
}
