//! Shared helpers for integration tests
//!
//! Provides repository constructors over fresh in-memory stores, entity
//! builders with sensible defaults, and a seeded catalog with known prices,
//! categories, and stock levels for search tests.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal::Decimal;

use booktopia_store::catalog::{
    Admin, AdminRepository, Category, CategoryId, CategoryRepository, Product, ProductRepository,
};
use booktopia_store::core::repository::Repository;
use booktopia_store::storage::InMemoryStore;

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("booktopia_store=debug")
        .with_test_writer()
        .try_init();
}

/// A product repository over a fresh, empty in-memory store.
pub fn product_repo() -> ProductRepository<InMemoryStore<Product>> {
    Repository::new(Arc::new(InMemoryStore::new()))
}

/// A category repository over a fresh, empty in-memory store.
pub fn category_repo() -> CategoryRepository<InMemoryStore<Category>> {
    Repository::new(Arc::new(InMemoryStore::new()))
}

/// An admin repository over a fresh, empty in-memory store.
pub fn admin_repo() -> AdminRepository<InMemoryStore<Admin>> {
    Repository::new(Arc::new(InMemoryStore::new()))
}

/// Price in cents, e.g. `price(1999)` is 19.99.
pub fn price(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// A product with a valid ISBN and stock on hand.
pub fn book(name: &str, cents: i64, quantity: u32, category: CategoryId) -> Product {
    Product::new(name, "978-0-306-40615-7", price(cents), quantity, category)
}

/// The fiction category id used by [`seed_catalog`].
pub fn fiction() -> CategoryId {
    CategoryId::from(1)
}

/// The reference category id used by [`seed_catalog`].
pub fn reference() -> CategoryId {
    CategoryId::from(2)
}

/// Seed a known catalog spanning both categories, the price range
/// boundaries, an out-of-stock title, and a soft-deleted title.
///
/// Returns the saved products in save order:
/// 0. "A Memory Called Empire", 9.99, fiction
/// 1. "Dune", 10.00, fiction (lower boundary)
/// 2. "Hyperion", 25.50, fiction
/// 3. "The Dispossessed", 50.00, fiction (upper boundary)
/// 4. "Blindsight", 55.00, fiction (above range)
/// 5. "Rust in Action", 39.99, reference
/// 6. "Out of Print", 20.00, fiction, quantity 0
/// 7. "Withdrawn", 20.00, fiction, soft-deleted after save
pub async fn seed_catalog(repo: &ProductRepository<InMemoryStore<Product>>) -> Vec<Product> {
    let mut saved = Vec::new();
    for product in [
        book("A Memory Called Empire", 999, 4, fiction()),
        book("Dune", 1000, 12, fiction()),
        book("Hyperion", 2550, 2, fiction()),
        book("The Dispossessed", 5000, 7, fiction()),
        book("Blindsight", 5500, 3, fiction()),
        book("Rust in Action", 3999, 9, reference()),
        book("Out of Print", 2000, 0, fiction()),
        book("Withdrawn", 2000, 5, fiction()),
    ] {
        saved.push(repo.save(product).await.expect("seeding should succeed"));
    }

    let withdrawn = saved.pop().expect("catalog is non-empty");
    saved.push(
        repo.mark_deleted(withdrawn)
            .await
            .expect("soft delete should succeed"),
    );
    saved
}

/// An admin account with a valid email.
pub fn admin(name: &str, email: &str) -> Admin {
    Admin::new(name, email, "+33612345678")
}

/// Assert that every product in `rows` satisfies `check`.
pub fn assert_all(rows: &[Product], check: impl Fn(&Product) -> bool, message: &str) {
    for row in rows {
        assert!(check(row), "{}: failed for {:?}", message, row.name);
    }
}
