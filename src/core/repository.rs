//! Generic transactional repository
//!
//! [`Repository`] provides entity-agnostic CRUD over any [`Queryable`]
//! entity backed by any [`Datastore`]. Every mutating operation opens
//! exactly one transaction, performs one unit of work, and commits or rolls
//! back before returning; read operations run outside transactions.
//!
//! Soft deletion (`mark_deleted`/`restore`) and physical deletion (`delete`/
//! `delete_by_id`) are separate operations with separate contracts. Finders
//! document their own soft-delete behavior: `find_by_id` and `find_all`
//! apply no implicit filter.

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::core::entity::Queryable;
use crate::core::error::{Error, Result};
use crate::core::field::FieldValue;
use crate::core::predicate::Predicate;
use crate::core::store::{Datastore, Transaction};

/// Generic CRUD engine parameterized by entity type and datastore.
///
/// Cheap to clone; clones share the underlying store handle and are safe to
/// use from concurrent callers, each call holding its own transaction.
pub struct Repository<T, S> {
    store: Arc<S>,
    _entity: PhantomData<fn() -> T>,
}

impl<T, S> Clone for Repository<T, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<T, S> Repository<T, S>
where
    T: Queryable,
    S: Datastore<T>,
{
    /// Create a repository over the given store handle.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// The underlying datastore handle, for specialized finders.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Look up a row by identity. Soft-deleted rows are returned.
    ///
    /// Absence is not an error, and neither is a lookup fault: both map to
    /// `None`, so callers cannot distinguish the two here. Business lookups
    /// that must tell them apart live on the specialized repositories.
    pub async fn find_by_id(&self, id: T::Id) -> Option<T> {
        match self.store.fetch(id).await {
            Ok(row) => row,
            Err(err) => {
                tracing::debug!(
                    entity = T::entity_name(),
                    %id,
                    error = %err,
                    "lookup fault mapped to absent"
                );
                None
            }
        }
    }

    /// All rows in id order, soft-deleted rows included.
    pub async fn find_all(&self) -> Result<Vec<T>> {
        self.store.query(&Predicate::True, 0, None).await
    }

    /// Total row count, no filter applied.
    pub async fn count(&self) -> Result<u64> {
        self.store.count().await
    }

    /// Persist a new entity. The store assigns its identity.
    ///
    /// Stamps `created_at == updated_at`, then inserts and commits in one
    /// transaction; any failure rolls back and surfaces as
    /// [`Error::Transaction`].
    pub async fn save(&self, mut entity: T) -> Result<T> {
        if entity.id().is_some() {
            return Err(Error::validation(format!(
                "{} already has an id; use update for persisted rows",
                T::entity_name()
            )));
        }
        entity.record_mut().stamp_created();

        let mut tx = self.store.begin().await?;
        let saved = match tx.insert(entity).await {
            Ok(saved) => saved,
            Err(err) => return Err(self.abort("save", tx, err).await),
        };
        tx.commit().await.map_err(|err| Error::transaction("save", err))?;

        tracing::debug!(entity = T::entity_name(), collection = T::collection(), "saved");
        Ok(saved)
    }

    /// Merge the caller's state into the stored row and return the
    /// authoritative merged copy.
    ///
    /// Refreshes `updated_at`; `created_at` and `created_by` keep their
    /// stored values. One transaction, rolled back on any failure.
    pub async fn update(&self, mut entity: T) -> Result<T> {
        if entity.id().is_none() {
            return Err(Error::validation(format!(
                "cannot update a {} that has not been saved",
                T::entity_name()
            )));
        }
        entity.record_mut().touch();

        let mut tx = self.store.begin().await?;
        let merged = match tx.merge(entity).await {
            Ok(merged) => merged,
            Err(err) => return Err(self.abort("update", tx, err).await),
        };
        tx.commit().await.map_err(|err| Error::transaction("update", err))?;

        tracing::debug!(entity = T::entity_name(), "updated");
        Ok(merged)
    }

    /// Physically remove a row. Distinct from [`mark_deleted`](Self::mark_deleted).
    ///
    /// A row not yet tracked by the transaction is reattached (merged)
    /// before removal.
    pub async fn delete(&self, entity: T) -> Result<()> {
        let Some(id) = entity.id() else {
            return Err(Error::validation(format!(
                "cannot delete a {} that has not been saved",
                T::entity_name()
            )));
        };

        let mut tx = self.store.begin().await?;
        let removed = if tx.contains(id) {
            tx.remove(entity).await
        } else {
            match tx.merge(entity).await {
                Ok(reattached) => tx.remove(reattached).await,
                Err(err) => Err(err),
            }
        };
        if let Err(err) = removed {
            return Err(self.abort("delete", tx, err).await);
        }
        tx.commit().await.map_err(|err| Error::transaction("delete", err))?;

        tracing::debug!(entity = T::entity_name(), %id, "deleted");
        Ok(())
    }

    /// Physically remove the row with the given id; no-op when absent.
    pub async fn delete_by_id(&self, id: T::Id) -> Result<()> {
        match self.find_by_id(id).await {
            Some(found) => self.delete(found).await,
            None => {
                tracing::debug!(entity = T::entity_name(), %id, "delete_by_id: absent, no-op");
                Ok(())
            }
        }
    }

    /// Soft-delete: set the deleted flag and persist via [`update`](Self::update).
    ///
    /// The row stays in the store; filtered search stops returning it.
    pub async fn mark_deleted(&self, mut entity: T) -> Result<T> {
        entity.record_mut().deleted = true;
        self.update(entity).await
    }

    /// Clear the soft-delete flag and persist via [`update`](Self::update).
    pub async fn restore(&self, mut entity: T) -> Result<T> {
        entity.record_mut().deleted = false;
        self.update(entity).await
    }

    /// All rows ordered by the named field.
    ///
    /// The field name is checked against the entity's allow-list before
    /// anything touches the store; unknown names are a validation error.
    /// Ties (and rows missing the field) fall back to id order so the
    /// result is deterministic.
    pub async fn find_all_sorted(&self, field: &str, ascending: bool) -> Result<Vec<T>> {
        Self::ensure_field(field)?;

        let mut rows = self.find_all().await?;
        rows.sort_by(|a, b| {
            let by_field = match (a.field_value(field), b.field_value(field)) {
                (Some(x), Some(y)) => x.compare(&y).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            by_field.then_with(|| a.id().cmp(&b.id()))
        });
        if !ascending {
            rows.reverse();
        }
        Ok(rows)
    }

    /// Rows whose named field equals `value`, in id order.
    ///
    /// Same allow-list check as [`find_all_sorted`](Self::find_all_sorted).
    /// No implicit soft-delete filter.
    pub async fn find_by_field(&self, field: &str, value: FieldValue) -> Result<Vec<T>> {
        Self::ensure_field(field)?;
        self.store
            .query(&Predicate::eq(field, value), 0, None)
            .await
    }

    fn ensure_field(field: &str) -> Result<()> {
        if T::fields().contains(&field) {
            Ok(())
        } else {
            Err(Error::validation(format!(
                "unknown field `{}` for {}",
                field,
                T::entity_name()
            )))
        }
    }

    /// Roll back after a failed unit of work and wrap the fault.
    async fn abort(&self, op: &'static str, tx: S::Tx, err: Error) -> Error {
        let token = tx.token();
        if let Err(rollback_err) = tx.rollback().await {
            tracing::warn!(%token, error = %rollback_err, "rollback after failed {op} also failed");
        } else {
            tracing::debug!(%token, "rolled back failed {op}");
        }
        Error::transaction(op, err)
    }
}
