//! Composable query predicates
//!
//! A [`Predicate`] is a condition tree evaluated structurally against any
//! [`Queryable`] entity. Filters are built by conjoining optional conditions
//! onto [`Predicate::True`], the identity element of conjunction: absent
//! filter values contribute no condition at all instead of matching on
//! zero or empty-string defaults.
//!
//! Field names inside predicates come from entity constants or from caller
//! input already validated against the entity's field allow-list; predicates
//! never interpolate raw caller strings into a query language.

use serde::{Deserialize, Serialize};

use crate::core::entity::Queryable;
use crate::core::field::FieldValue;

/// Comparison operators usable in a field predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cmp {
    /// Equal
    Eq,
    /// Strictly greater than
    Gt,
    /// Greater than or equal (inclusive lower bound)
    Ge,
    /// Less than or equal (inclusive upper bound)
    Le,
}

/// A composable filter condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// Matches every row; the starting point of every conjunction
    True,

    /// Matches rows satisfying every inner predicate
    All(Vec<Predicate>),

    /// Compares a named field against a typed value.
    ///
    /// Rows whose field is missing or of a different variant do not match.
    Compare {
        field: String,
        op: Cmp,
        value: FieldValue,
    },

    /// Case-sensitive substring match on a string field
    Contains { field: String, needle: String },

    /// Matches rows whose soft-delete flag is unset
    NotDeleted,
}

impl Predicate {
    /// Field equality condition.
    pub fn eq(field: impl Into<String>, value: FieldValue) -> Self {
        Predicate::Compare {
            field: field.into(),
            op: Cmp::Eq,
            value,
        }
    }

    /// Strict greater-than condition.
    pub fn gt(field: impl Into<String>, value: FieldValue) -> Self {
        Predicate::Compare {
            field: field.into(),
            op: Cmp::Gt,
            value,
        }
    }

    /// Inclusive lower-bound condition.
    pub fn ge(field: impl Into<String>, value: FieldValue) -> Self {
        Predicate::Compare {
            field: field.into(),
            op: Cmp::Ge,
            value,
        }
    }

    /// Inclusive upper-bound condition.
    pub fn le(field: impl Into<String>, value: FieldValue) -> Self {
        Predicate::Compare {
            field: field.into(),
            op: Cmp::Le,
            value,
        }
    }

    /// Case-sensitive substring condition.
    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Predicate::Contains {
            field: field.into(),
            needle: needle.into(),
        }
    }

    /// Conjoin another condition onto this one.
    ///
    /// `True` is absorbed on either side, so chains of optional filters
    /// collapse to exactly the conditions that were present.
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::True, p) | (p, Predicate::True) => p,
            (Predicate::All(mut conditions), p) => {
                conditions.push(p);
                Predicate::All(conditions)
            }
            (a, b) => Predicate::All(vec![a, b]),
        }
    }

    /// Evaluate this condition against an entity.
    pub fn matches<T: Queryable>(&self, entity: &T) -> bool {
        match self {
            Predicate::True => true,
            Predicate::All(conditions) => conditions.iter().all(|c| c.matches(entity)),
            Predicate::Compare { field, op, value } => {
                let Some(actual) = entity.field_value(field) else {
                    return false;
                };
                let Some(ordering) = actual.compare(value) else {
                    return false;
                };
                match op {
                    Cmp::Eq => ordering.is_eq(),
                    Cmp::Gt => ordering.is_gt(),
                    Cmp::Ge => ordering.is_ge(),
                    Cmp::Le => ordering.is_le(),
                }
            }
            Predicate::Contains { field, needle } => entity
                .field_value(field)
                .and_then(|value| value.as_string().map(|s| s.contains(needle.as_str())))
                .unwrap_or(false),
            Predicate::NotDeleted => !entity.is_deleted(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::category::CategoryId;
    use crate::catalog::product::{Product, fields};
    use rust_decimal::Decimal;

    fn book(name: &str, price: Decimal, quantity: u32) -> Product {
        Product::new(name, "978-0-306-40615-7", price, quantity, CategoryId::from(1))
    }

    #[test]
    fn test_true_matches_everything() {
        let product = book("Dune", Decimal::new(1999, 2), 3);
        assert!(Predicate::True.matches(&product));
    }

    #[test]
    fn test_and_absorbs_the_identity() {
        let bound = Predicate::ge(fields::PRICE, FieldValue::Decimal(Decimal::TEN));
        assert_eq!(Predicate::True.and(bound.clone()), bound.clone());
        assert_eq!(bound.clone().and(Predicate::True), bound);
    }

    #[test]
    fn test_and_flattens_into_one_conjunction() {
        let composed = Predicate::True
            .and(Predicate::ge(fields::PRICE, FieldValue::Decimal(Decimal::TEN)))
            .and(Predicate::NotDeleted)
            .and(Predicate::gt(fields::QUANTITY, FieldValue::Integer(0)));

        match composed {
            Predicate::All(conditions) => assert_eq!(conditions.len(), 3),
            other => panic!("expected All, got {:?}", other),
        }
    }

    #[test]
    fn test_inclusive_price_bounds() {
        let exactly_ten = book("Dune", Decimal::TEN, 1);
        let lower = Predicate::ge(fields::PRICE, FieldValue::Decimal(Decimal::TEN));
        let upper = Predicate::le(fields::PRICE, FieldValue::Decimal(Decimal::TEN));

        assert!(lower.matches(&exactly_ten));
        assert!(upper.matches(&exactly_ten));
    }

    #[test]
    fn test_contains_is_case_sensitive() {
        let product = book("The Rust Programming Language", Decimal::TEN, 1);

        assert!(Predicate::contains(fields::NAME, "Rust").matches(&product));
        assert!(!Predicate::contains(fields::NAME, "rust").matches(&product));
    }

    #[test]
    fn test_not_deleted_excludes_soft_deleted_rows() {
        let mut product = book("Dune", Decimal::TEN, 1);
        assert!(Predicate::NotDeleted.matches(&product));

        product.record.deleted = true;
        assert!(!Predicate::NotDeleted.matches(&product));
    }

    #[test]
    fn test_unknown_field_never_matches() {
        let product = book("Dune", Decimal::TEN, 1);
        let condition = Predicate::eq("publisher", FieldValue::String("Ace".to_string()));
        assert!(!condition.matches(&product));
    }

    #[test]
    fn test_variant_mismatch_never_matches() {
        let product = book("Dune", Decimal::TEN, 1);
        let condition = Predicate::eq(fields::PRICE, FieldValue::String("10".to_string()));
        assert!(!condition.matches(&product));
    }
}
