//! Datastore contract consumed by the generic repository
//!
//! The datastore is opaque to the rest of the crate: anything that can open
//! a scoped transaction, fetch by id, run a predicate query with skip/limit,
//! and count rows can sit behind [`Datastore`]. The crate ships an in-memory
//! implementation in [`crate::storage::memory`].

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::entity::Queryable;
use crate::core::error::Result;
use crate::core::predicate::Predicate;

/// One open transaction against a datastore.
///
/// A transaction is created by [`Datastore::begin`] and consumed by exactly
/// one of [`commit`](Transaction::commit) or
/// [`rollback`](Transaction::rollback); the repository never lets the handle
/// escape the call that opened it. Writes staged through `insert`, `merge`,
/// and `remove` become visible to other callers atomically on commit and
/// leave no trace on rollback.
#[async_trait]
pub trait Transaction<T: Queryable>: Send {
    /// Token identifying this transaction in logs
    fn token(&self) -> Uuid;

    /// Stage a new row. The store assigns the identity; the returned copy
    /// carries it.
    async fn insert(&mut self, entity: T) -> Result<T>;

    /// Reattach a detached row and overwrite the stored copy with the given
    /// state. Returns the authoritative merged copy. The stored row's
    /// `created_at`/`created_by` are preserved; they are written once.
    async fn merge(&mut self, entity: T) -> Result<T>;

    /// Stage physical removal of a row. Distinct from soft deletion.
    async fn remove(&mut self, entity: T) -> Result<()>;

    /// Whether the row is already tracked (staged) by this transaction
    fn contains(&self, id: T::Id) -> bool;

    /// Apply all staged writes atomically.
    ///
    /// On failure no staged write is visible; the transaction is gone
    /// either way.
    async fn commit(self) -> Result<()>;

    /// Discard all staged writes.
    async fn rollback(self) -> Result<()>;
}

/// An opaque transactional datastore for one entity type.
///
/// Reads (`fetch`, `query`, `count`) run outside any explicit transaction as
/// auto-committing single statements. Query results are ordered by id so
/// skip/limit windows are deterministic.
#[async_trait]
pub trait Datastore<T: Queryable>: Send + Sync + 'static {
    /// The transaction handle type for this store
    type Tx: Transaction<T>;

    /// Open a new transaction.
    async fn begin(&self) -> Result<Self::Tx>;

    /// Fetch a single row by identity, soft-deleted rows included.
    async fn fetch(&self, id: T::Id) -> Result<Option<T>>;

    /// Return rows matching `predicate` in id order, skipping `skip` rows
    /// and returning at most `limit` rows when a limit is given.
    async fn query(
        &self,
        predicate: &Predicate,
        skip: usize,
        limit: Option<usize>,
    ) -> Result<Vec<T>>;

    /// Total row count, no filter applied.
    async fn count(&self) -> Result<u64>;
}
