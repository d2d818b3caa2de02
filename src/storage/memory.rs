//! In-memory implementation of the datastore contract
//!
//! Useful for testing and development, and the reference for how a backend
//! is expected to behave: staged writes become visible atomically on commit,
//! rollback leaves no trace, and the id sequence advances monotonically even
//! across rolled-back transactions (as real database sequences do).

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::core::entity::{Entity, Queryable};
use crate::core::error::{Error, Result};
use crate::core::predicate::Predicate;
use crate::core::store::{Datastore, Transaction};

fn poisoned() -> Error {
    Error::Store("row map lock poisoned".to_string())
}

struct Rows<T: Entity> {
    rows: BTreeMap<T::Id, T>,
    sequence: u64,
}

/// In-memory datastore keyed by entity id.
///
/// Rows live in an id-ordered map behind an `RwLock`; reads share the lock,
/// a commit takes it exclusively for the duration of applying its staged
/// writes. Transactions are serialized through a writer slot so only one is
/// open at a time; readers are never blocked by an open (uncommitted)
/// transaction.
pub struct InMemoryStore<T: Entity> {
    rows: Arc<RwLock<Rows<T>>>,
    writer: Arc<Mutex<()>>,
}

impl<T: Entity> InMemoryStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(Rows {
                rows: BTreeMap::new(),
                sequence: 0,
            })),
            writer: Arc::new(Mutex::new(())),
        }
    }
}

impl<T: Entity> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Clone for InMemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            writer: Arc::clone(&self.writer),
        }
    }
}

enum Staged<T> {
    Put(T),
    Removed,
}

/// One open transaction against an [`InMemoryStore`].
///
/// Holds the store's writer slot until committed or rolled back; dropping
/// the transaction without either behaves like a rollback.
pub struct MemoryTransaction<T: Entity> {
    rows: Arc<RwLock<Rows<T>>>,
    staged: BTreeMap<T::Id, Staged<T>>,
    token: Uuid,
    _writer: OwnedMutexGuard<()>,
}

#[async_trait]
impl<T> Transaction<T> for MemoryTransaction<T>
where
    T: Queryable,
    T::Id: From<u64>,
{
    fn token(&self) -> Uuid {
        self.token
    }

    async fn insert(&mut self, mut entity: T) -> Result<T> {
        // Sequences advance outside transactional scope: an id handed out
        // here is burned even if this transaction rolls back.
        let id = {
            let mut shared = self.rows.write().map_err(|_| poisoned())?;
            shared.sequence += 1;
            T::Id::from(shared.sequence)
        };
        entity.set_id(id);
        self.staged.insert(id, Staged::Put(entity.clone()));
        Ok(entity)
    }

    async fn merge(&mut self, mut entity: T) -> Result<T> {
        let Some(id) = entity.id() else {
            return Err(Error::validation(format!(
                "cannot merge a {} without an id",
                T::entity_name()
            )));
        };

        // Write-once fields keep their stored values; a staged copy from
        // this same transaction wins over the underlying row.
        let existing = match self.staged.get(&id) {
            Some(Staged::Put(staged)) => Some(staged.clone()),
            Some(Staged::Removed) => None,
            None => self
                .rows
                .read()
                .map_err(|_| poisoned())?
                .rows
                .get(&id)
                .cloned(),
        };
        if let Some(existing) = existing {
            let record = entity.record_mut();
            record.created_at = existing.record().created_at;
            record.created_by = existing.record().created_by.clone();
        }

        self.staged.insert(id, Staged::Put(entity.clone()));
        Ok(entity)
    }

    async fn remove(&mut self, entity: T) -> Result<()> {
        let Some(id) = entity.id() else {
            return Err(Error::validation(format!(
                "cannot remove a {} without an id",
                T::entity_name()
            )));
        };
        self.staged.insert(id, Staged::Removed);
        Ok(())
    }

    fn contains(&self, id: T::Id) -> bool {
        matches!(self.staged.get(&id), Some(Staged::Put(_)))
    }

    async fn commit(self) -> Result<()> {
        let Self {
            rows,
            staged,
            token,
            _writer,
        } = self;

        let mut shared = rows.write().map_err(|_| poisoned())?;
        for (id, op) in staged {
            match op {
                Staged::Put(entity) => {
                    shared.rows.insert(id, entity);
                }
                Staged::Removed => {
                    shared.rows.remove(&id);
                }
            }
        }
        tracing::trace!(%token, "transaction committed");
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        tracing::trace!(token = %self.token, staged = self.staged.len(), "transaction rolled back");
        Ok(())
    }
}

#[async_trait]
impl<T> Datastore<T> for InMemoryStore<T>
where
    T: Queryable,
    T::Id: From<u64>,
{
    type Tx = MemoryTransaction<T>;

    async fn begin(&self) -> Result<Self::Tx> {
        let guard = Arc::clone(&self.writer).lock_owned().await;
        Ok(MemoryTransaction {
            rows: Arc::clone(&self.rows),
            staged: BTreeMap::new(),
            token: Uuid::new_v4(),
            _writer: guard,
        })
    }

    async fn fetch(&self, id: T::Id) -> Result<Option<T>> {
        let shared = self.rows.read().map_err(|_| poisoned())?;
        Ok(shared.rows.get(&id).cloned())
    }

    async fn query(
        &self,
        predicate: &Predicate,
        skip: usize,
        limit: Option<usize>,
    ) -> Result<Vec<T>> {
        let shared = self.rows.read().map_err(|_| poisoned())?;
        let matching = shared
            .rows
            .values()
            .filter(|entity| predicate.matches(*entity))
            .skip(skip);
        let out = match limit {
            Some(n) => matching.take(n).cloned().collect(),
            None => matching.cloned().collect(),
        };
        Ok(out)
    }

    async fn count(&self) -> Result<u64> {
        let shared = self.rows.read().map_err(|_| poisoned())?;
        Ok(shared.rows.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::category::{Category, CategoryId};
    use crate::catalog::product::Product;
    use rust_decimal::Decimal;

    fn sample(name: &str) -> Product {
        Product::new(
            name,
            "978-0-306-40615-7",
            Decimal::new(1999, 2),
            5,
            CategoryId::from(1),
        )
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = InMemoryStore::<Product>::new();

        let mut tx = store.begin().await.unwrap();
        let first = tx.insert(sample("Dune")).await.unwrap();
        let second = tx.insert(sample("Hyperion")).await.unwrap();
        tx.commit().await.unwrap();

        assert!(first.id.is_some());
        assert!(second.id > first.id);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_staged_writes_invisible_until_commit() {
        let store = InMemoryStore::<Product>::new();

        let mut tx = store.begin().await.unwrap();
        let staged = tx.insert(sample("Dune")).await.unwrap();
        let id = staged.id.unwrap();

        assert!(store.fetch(id).await.unwrap().is_none());
        assert_eq!(store.count().await.unwrap(), 0);

        tx.commit().await.unwrap();
        assert!(store.fetch(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_rollback_discards_staged_writes() {
        let store = InMemoryStore::<Product>::new();

        let mut tx = store.begin().await.unwrap();
        let staged = tx.insert(sample("Dune")).await.unwrap();
        let id = staged.id.unwrap();
        tx.rollback().await.unwrap();

        assert!(store.fetch(id).await.unwrap().is_none());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sequence_is_not_rolled_back() {
        let store = InMemoryStore::<Product>::new();

        let mut tx = store.begin().await.unwrap();
        let first = tx.insert(sample("Dune")).await.unwrap();
        tx.rollback().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let second = tx.insert(sample("Hyperion")).await.unwrap();
        tx.commit().await.unwrap();

        assert!(second.id.unwrap() > first.id.unwrap());
    }

    #[tokio::test]
    async fn test_merge_preserves_created_at() {
        let store = InMemoryStore::<Category>::new();

        let mut tx = store.begin().await.unwrap();
        let saved = tx.insert(Category::new("Fantasy")).await.unwrap();
        tx.commit().await.unwrap();
        let original_created = saved.record.created_at;

        let mut tampered = saved.clone();
        tampered.record.created_at = original_created + chrono::Duration::hours(1);
        tampered.name = "Science Fiction".to_string();

        let mut tx = store.begin().await.unwrap();
        let merged = tx.merge(tampered).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(merged.record.created_at, original_created);
        assert_eq!(merged.name, "Science Fiction");
    }

    #[tokio::test]
    async fn test_query_orders_by_id_with_skip_and_limit() {
        let store = InMemoryStore::<Product>::new();

        let mut tx = store.begin().await.unwrap();
        for i in 0..5 {
            tx.insert(sample(&format!("Book {}", i))).await.unwrap();
        }
        tx.commit().await.unwrap();

        let window = store.query(&Predicate::True, 2, Some(2)).await.unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].name, "Book 2");
        assert_eq!(window[1].name, "Book 3");
    }

    #[tokio::test]
    async fn test_remove_then_commit_deletes_the_row() {
        let store = InMemoryStore::<Product>::new();

        let mut tx = store.begin().await.unwrap();
        let saved = tx.insert(sample("Dune")).await.unwrap();
        tx.commit().await.unwrap();
        let id = saved.id.unwrap();

        let mut tx = store.begin().await.unwrap();
        assert!(!tx.contains(id));
        let reattached = tx.merge(saved).await.unwrap();
        assert!(tx.contains(id));
        tx.remove(reattached).await.unwrap();
        tx.commit().await.unwrap();

        assert!(store.fetch(id).await.unwrap().is_none());
    }
}
