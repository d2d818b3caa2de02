//! # Booktopia Store
//!
//! Entity persistence and dynamic-query layer for the Booktopia online
//! bookstore.
//!
//! ## Features
//!
//! - **Entity contract**: identity, audit timestamps, attribution, and a
//!   soft-delete flag on every persisted type
//! - **Generic repository**: transactional CRUD over any entity type, one
//!   transaction per mutating call, rollback on every failure path
//! - **Predicate builder**: optional filters (price range, category, name
//!   substring) composed into a single query condition, with the
//!   soft-delete exclusion always applied
//! - **Deterministic pagination**: zero-based windows over id-ordered rows
//! - **Allow-listed dynamic fields**: sort/filter field names are validated
//!   against a closed per-entity list, never interpolated raw
//! - **Soft delete vs. purge**: `mark_deleted`/`restore` and physical
//!   `delete` are distinct operations with distinct contracts
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use booktopia_store::prelude::*;
//!
//! let store = Arc::new(InMemoryStore::<Product>::new());
//! let products = ProductRepository::new(store);
//!
//! let dune = products
//!     .save(Product::new(
//!         "Dune",
//!         "0-441-17271-7",
//!         Decimal::new(1899, 2),
//!         12,
//!         CategoryId::from(1),
//!     ))
//!     .await?;
//!
//! let filter = ProductFilter::new()
//!     .min_price(Decimal::TEN)
//!     .name("Dune");
//! let page = products.search(&filter, PageRequest::first()).await?;
//! ```

pub mod catalog;
pub mod core;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        entity::{Entity, EntityId, Queryable, Record},
        error::{Error, Result},
        field::{FieldFormat, FieldValue},
        predicate::{Cmp, Predicate},
        query::{DEFAULT_PAGE_SIZE, PageRequest},
        repository::Repository,
        store::{Datastore, Transaction},
    };

    // === Macros ===
    pub use crate::{entity_id, impl_entity};

    // === Catalog ===
    pub use crate::catalog::{
        Admin, AdminId, AdminRepository, Category, CategoryId, CategoryRepository, Product,
        ProductFilter, ProductId, ProductRepository,
    };

    // === Storage ===
    pub use crate::storage::InMemoryStore;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use rust_decimal::Decimal;
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
    pub use uuid::Uuid;
}
