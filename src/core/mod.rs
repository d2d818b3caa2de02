//! Core module containing the entity contract, query machinery, and the
//! generic repository

pub mod entity;
pub mod error;
pub mod field;
pub mod predicate;
pub mod query;
pub mod repository;
pub mod store;

pub use entity::{Entity, EntityId, Queryable, Record};
pub use error::{Error, Result};
pub use field::{FieldFormat, FieldValue};
pub use predicate::{Cmp, Predicate};
pub use query::{DEFAULT_PAGE_SIZE, PageRequest};
pub use repository::Repository;
pub use store::{Datastore, Transaction};
