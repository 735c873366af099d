use email_address::EmailAddress;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{Category, TransactionKind};

pub const MAX_USERNAME_LENGTH: usize = 150;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_DESCRIPTION_LENGTH: usize = 200;

/// Largest accepted amount: ten digits total, two of them decimal places.
const AMOUNT_LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid transaction type: {0}. Must be 'income' or 'expense'")]
    InvalidKind(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Description must be at most 200 characters long")]
    DescriptionTooLong,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Validate a username: non-empty, at most 150 characters, restricted to
/// letters, digits and the @ . + - _ set.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::MissingParameter("username".to_string()));
    }

    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::InvalidUsername(
            "must be at most 150 characters".to_string(),
        ));
    }

    for c in username.chars() {
        if !c.is_alphanumeric() && !"@.+-_".contains(c) {
            return Err(ValidationError::InvalidUsername(format!(
                "unsupported character: {:?}",
                c
            )));
        }
    }

    Ok(())
}

/// Validate an email address using the full addr-spec grammar.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::MissingParameter("email".to_string()));
    }

    if !EmailAddress::is_valid(email) {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }

    Ok(())
}

/// Validate a transaction amount: non-negative, at most two decimal places
/// and within the ten-digit fixed-point range.
pub fn validate_amount(amount: Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::InvalidAmount(
            "must not be negative".to_string(),
        ));
    }

    if amount.normalize().scale() > 2 {
        return Err(ValidationError::InvalidAmount(
            "must have at most two decimal places".to_string(),
        ));
    }

    if amount >= AMOUNT_LIMIT {
        return Err(ValidationError::InvalidAmount(
            "must be less than 100000000".to_string(),
        ));
    }

    Ok(())
}

/// Parse the transaction type field, accepting any casing.
pub fn parse_kind(value: &str) -> Result<TransactionKind, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::MissingParameter("type".to_string()));
    }

    TransactionKind::parse(&value.to_lowercase())
        .ok_or_else(|| ValidationError::InvalidKind(value.to_string()))
}

/// Parse the optional category field; an absent category is `Other`.
pub fn parse_category(value: Option<&str>) -> Result<Category, ValidationError> {
    match value {
        None => Ok(Category::default()),
        Some(label) => {
            Category::parse(label).ok_or_else(|| ValidationError::InvalidCategory(label.to_string()))
        }
    }
}

pub fn validate_description(description: Option<&str>) -> Result<(), ValidationError> {
    if let Some(text) = description {
        if text.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(ValidationError::DescriptionTooLong);
        }
    }

    Ok(())
}

/// Parse a pagination offset; absent means zero.
pub fn validate_offset(value: Option<&str>) -> Result<i64, ValidationError> {
    match value {
        None => Ok(0),
        Some(raw) => match raw.parse::<i64>() {
            Ok(offset) if offset >= 0 => Ok(offset),
            _ => Err(ValidationError::InvalidParameter(
                "offset must be a non-negative integer".to_string(),
            )),
        },
    }
}

/// Parse a pagination limit; absent means no limit.
pub fn validate_limit(value: Option<&str>) -> Result<Option<i64>, ValidationError> {
    match value {
        None => Ok(None),
        Some(raw) => match raw.parse::<i64>() {
            Ok(limit) if limit >= 0 => Ok(Some(limit)),
            _ => Err(ValidationError::InvalidParameter(
                "limit must be a non-negative integer".to_string(),
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("alice.smith+banking@home_1").is_ok());
    }

    #[test]
    fn rejects_bad_usernames() {
        assert_eq!(
            validate_username(""),
            Err(ValidationError::MissingParameter("username".to_string()))
        );
        assert!(validate_username("has spaces").is_err());
        assert!(validate_username(&"x".repeat(151)).is_err());
        assert!(validate_username(&"x".repeat(150)).is_ok());
    }

    #[test]
    fn validates_email_addresses() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert_eq!(
            validate_email(""),
            Err(ValidationError::MissingParameter("email".to_string()))
        );
    }

    #[test]
    fn enforces_minimum_password_length() {
        assert!(validate_password("hunter2!").is_ok());
        assert_eq!(validate_password("short"), Err(ValidationError::PasswordTooShort));
    }

    #[test]
    fn accepts_amounts_within_range() {
        assert!(validate_amount("0".parse().unwrap()).is_ok());
        assert!(validate_amount("0.01".parse().unwrap()).is_ok());
        assert!(validate_amount("99999999.99".parse().unwrap()).is_ok());
    }

    #[test]
    fn rejects_out_of_range_amounts() {
        assert!(validate_amount("-5".parse().unwrap()).is_err());
        assert!(validate_amount("1.005".parse().unwrap()).is_err());
        assert!(validate_amount("100000000".parse().unwrap()).is_err());
    }

    #[test]
    fn trailing_zeros_do_not_count_as_extra_places() {
        assert!(validate_amount("10.100".parse().unwrap()).is_ok());
    }

    #[test]
    fn parses_transaction_kinds() {
        assert_eq!(parse_kind("income"), Ok(crate::models::TransactionKind::Income));
        assert_eq!(parse_kind("EXPENSE"), Ok(crate::models::TransactionKind::Expense));
        assert!(parse_kind("transfer").is_err());
        assert_eq!(
            parse_kind(""),
            Err(ValidationError::MissingParameter("type".to_string()))
        );
    }

    #[test]
    fn parses_categories_with_default() {
        assert_eq!(parse_category(None), Ok(Category::Other));
        assert_eq!(parse_category(Some("Rent")), Ok(Category::Rent));
        assert_eq!(parse_category(Some("food")), Ok(Category::Food));
        assert!(parse_category(Some("Gambling")).is_err());
    }

    #[test]
    fn bounds_description_length() {
        assert!(validate_description(None).is_ok());
        assert!(validate_description(Some(&"d".repeat(200))).is_ok());
        assert_eq!(
            validate_description(Some(&"d".repeat(201))),
            Err(ValidationError::DescriptionTooLong)
        );
    }

    #[test]
    fn parses_pagination_parameters() {
        assert_eq!(validate_offset(None), Ok(0));
        assert_eq!(validate_offset(Some("25")), Ok(25));
        assert!(validate_offset(Some("-1")).is_err());
        assert!(validate_offset(Some("abc")).is_err());

        assert_eq!(validate_limit(None), Ok(None));
        assert_eq!(validate_limit(Some("10")), Ok(Some(10)));
        assert!(validate_limit(Some("-10")).is_err());
    }
}
