//! Typed errors for the persistence layer
//!
//! Four categories cover everything this layer can raise:
//!
//! - [`Error::NotFound`]: business lookups (availability, natural keys) that
//!   require a matching active row; distinct from an empty `Option`
//! - [`Error::Validation`]: malformed filter/field/page input, raised before
//!   the store is touched
//! - [`Error::Transaction`]: a mutating operation failed; the transaction was
//!   rolled back before this error propagated
//! - [`Error::Store`]: connectivity or internal datastore fault

use thiserror::Error;

/// Error type for all repository and datastore operations
#[derive(Debug, Error)]
pub enum Error {
    /// No matching active row for a business lookup
    #[error("{entity} not found ({key}={value})")]
    NotFound {
        entity: &'static str,
        key: &'static str,
        value: String,
    },

    /// Malformed caller input, rejected before any store call
    #[error("invalid input: {0}")]
    Validation(String),

    /// A mutating operation failed and was rolled back
    #[error("transaction failed during {op}: {source}")]
    Transaction {
        op: &'static str,
        #[source]
        source: Box<Error>,
    },

    /// Datastore connectivity or internal fault
    #[error("datastore fault: {0}")]
    Store(String),
}

impl Error {
    /// A business-lookup miss for `entity`, keyed by `key = value`.
    pub fn not_found(entity: &'static str, key: &'static str, value: impl Into<String>) -> Self {
        Error::NotFound {
            entity,
            key,
            value: value.into(),
        }
    }

    /// A caller-input validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Wrap a fault that aborted the mutating operation `op`.
    pub fn transaction(op: &'static str, source: Error) -> Self {
        Error::Transaction {
            op,
            source: Box::new(source),
        }
    }
}

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
