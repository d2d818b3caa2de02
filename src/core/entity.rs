//! Entity traits defining the base contract for all persisted types

use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::field::FieldValue;

/// Audit metadata carried by every persisted row.
///
/// The store owns these fields: `created_at` is stamped once on first save
/// and never changes afterwards, `updated_at` is refreshed on every
/// successful mutation, and `deleted` marks the row as soft-deleted without
/// physically removing it.
///
/// Invariant: `updated_at >= created_at` at all times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// When the store first persisted this row
    pub created_at: DateTime<Utc>,

    /// When this row was last mutated through the repository
    pub updated_at: DateTime<Utc>,

    /// Soft-delete marker; filtered search never returns deleted rows
    pub deleted: bool,

    /// Who created the row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    /// Who last modified the row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
}

impl Record {
    /// Create a fresh record block with both timestamps set to now.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            deleted: false,
            created_by: None,
            modified_by: None,
        }
    }

    /// Refresh `updated_at` to now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Stamp both timestamps to the same instant, as done on first save.
    pub fn stamp_created(&mut self) {
        let now = Utc::now();
        self.created_at = now;
        self.updated_at = now;
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

/// Marker contract for entity identifiers.
///
/// Identifiers are opaque to the repository layer: they are assigned by the
/// store on first save and never reassigned. `Ord` lets stores keep rows in
/// a stable id order so pagination windows are reproducible.
pub trait EntityId:
    Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
}

/// Base trait for all persisted types.
///
/// An entity exposes its typed identity, its [`Record`] audit block, and the
/// names the store files it under. The id starts out as `None` and is set
/// exactly once by the store when the entity is first saved.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The identity type assigned by the store
    type Id: EntityId;

    /// Singular name used in error messages (e.g., "product")
    fn entity_name() -> &'static str;

    /// Collection name the store files rows under (e.g., "products")
    fn collection() -> &'static str;

    /// The store-assigned identity, `None` until first save
    fn id(&self) -> Option<Self::Id>;

    /// Assign the identity. Called by the store on first save only.
    fn set_id(&mut self, id: Self::Id);

    /// The audit metadata block
    fn record(&self) -> &Record;

    /// Mutable access to the audit metadata block
    fn record_mut(&mut self) -> &mut Record;

    /// Check if the entity has been soft-deleted
    fn is_deleted(&self) -> bool {
        self.record().deleted
    }
}

/// Contract for entities usable with dynamic sorting and filtering.
///
/// `fields()` is the closed allow-list of names a caller may sort or filter
/// by; anything outside it is rejected with a validation error before a
/// query is built. `field_value` resolves a listed name to the typed value
/// carried by this instance.
pub trait Queryable: Entity {
    /// Names that may appear in sort/filter requests
    fn fields() -> &'static [&'static str];

    /// Get the value of a listed field by name
    fn field_value(&self, field: &str) -> Option<FieldValue>;
}
