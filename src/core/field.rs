//! Field value types and natural-key format validation

use std::cmp::Ordering;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A polymorphic field value that can hold different types
///
/// Sorting and filtering compare values of the same variant only; comparing
/// across variants yields no ordering and the row is left where it is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Decimal(Decimal),
    Boolean(bool),
    Id(u64),
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a decimal if possible
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Compare two values of the same variant.
    ///
    /// Returns `None` when the variants differ.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::String(a), FieldValue::String(b)) => Some(a.cmp(b)),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => Some(a.cmp(b)),
            (FieldValue::Decimal(a), FieldValue::Decimal(b)) => Some(a.cmp(b)),
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => Some(a.cmp(b)),
            (FieldValue::Id(a), FieldValue::Id(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Format validators applied to natural-key inputs before they reach the store
#[derive(Debug, Clone)]
pub enum FieldFormat {
    /// ISBN-10 or ISBN-13, hyphens and spaces allowed
    Isbn,
    Email,
    Custom(Regex),
}

impl FieldFormat {
    /// Validate a raw string against this format
    pub fn validate(&self, value: &str) -> bool {
        match self {
            FieldFormat::Isbn => Self::is_valid_isbn(value),
            FieldFormat::Email => Self::is_valid_email(value),
            FieldFormat::Custom(regex) => regex.is_match(value),
        }
    }

    fn is_valid_isbn(isbn: &str) -> bool {
        static ISBN_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = ISBN_REGEX.get_or_init(|| {
            // Ten digits (last may be X) or thirteen digits, separators optional
            Regex::new(r"^(?:\d[\- ]?){9}[\dXx]$|^(?:\d[\- ]?){12}\d$").unwrap()
        });
        regex.is_match(isbn)
    }

    fn is_valid_email(email: &str) -> bool {
        static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = EMAIL_REGEX.get_or_init(|| {
            Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
        });
        regex.is_match(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_string() {
        let value = FieldValue::String("test".to_string());
        assert_eq!(value.as_string(), Some("test"));
        assert_eq!(value.as_integer(), None);
    }

    #[test]
    fn test_compare_same_variant() {
        let a = FieldValue::Integer(1);
        let b = FieldValue::Integer(2);
        assert_eq!(a.compare(&b), Some(Ordering::Less));
        assert_eq!(b.compare(&a), Some(Ordering::Greater));
        assert_eq!(a.compare(&a.clone()), Some(Ordering::Equal));
    }

    #[test]
    fn test_compare_decimal_is_exact() {
        let a = FieldValue::Decimal(Decimal::new(1050, 2)); // 10.50
        let b = FieldValue::Decimal(Decimal::new(105, 1)); // 10.5
        assert_eq!(a.compare(&b), Some(Ordering::Equal));
    }

    #[test]
    fn test_compare_mixed_variants_has_no_ordering() {
        let a = FieldValue::Integer(1);
        let b = FieldValue::String("1".to_string());
        assert_eq!(a.compare(&b), None);
    }

    #[test]
    fn test_isbn_validation() {
        let format = FieldFormat::Isbn;

        assert!(format.validate("0306406152"));
        assert!(format.validate("0-306-40615-2"));
        assert!(format.validate("043942089X"));
        assert!(format.validate("9780306406157"));
        assert!(format.validate("978-0-306-40615-7"));
        assert!(!format.validate("12345"));
        assert!(!format.validate("not-an-isbn"));
    }

    #[test]
    fn test_email_validation() {
        let format = FieldFormat::Email;

        assert!(format.validate("admin@booktopia.com"));
        assert!(format.validate("user.name+tag@example.co.uk"));
        assert!(!format.validate("invalid-email"));
        assert!(!format.validate("@example.com"));
    }

    #[test]
    fn test_custom_regex_validation() {
        let format = FieldFormat::Custom(Regex::new(r"^[A-Z]{3}\d{3}$").unwrap());

        assert!(format.validate("ABC123"));
        assert!(!format.validate("abc123"));
    }
}
