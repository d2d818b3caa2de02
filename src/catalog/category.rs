//! Category entity and category-specific finders

use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, Queryable, Record};
use crate::core::error::Result;
use crate::core::field::FieldValue;
use crate::core::predicate::Predicate;
use crate::core::repository::Repository;
use crate::core::store::Datastore;
use crate::{entity_id, impl_entity};

entity_id! {
    /// Identity of a [`Category`] row
    CategoryId
}

/// Field names categories may be sorted and filtered by
pub mod fields {
    pub const NAME: &str = "name";
}

/// A product category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Store-assigned identity, `None` until first save
    pub id: Option<CategoryId>,

    /// Audit metadata
    #[serde(flatten)]
    pub record: Record,

    /// Unique category name
    pub name: String,

    /// Optional blurb shown on the category page
    pub description: String,
}

impl Category {
    /// Create an unsaved category.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            record: Record::new(),
            name: name.into(),
            description: String::new(),
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl_entity!(Category, CategoryId, "category", "categories");

impl Queryable for Category {
    fn fields() -> &'static [&'static str] {
        &[fields::NAME]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            fields::NAME => Some(FieldValue::String(self.name.clone())),
            _ => None,
        }
    }
}

/// Repository over categories; category-specific finders below
pub type CategoryRepository<S> = Repository<Category, S>;

impl<S: Datastore<Category>> Repository<Category, S> {
    /// Active category by id; soft-deleted rows are treated as absent.
    ///
    /// Contrast with [`Repository::find_by_id`], which returns soft-deleted
    /// rows: category callers only ever want rows a shopper can still
    /// browse to.
    pub async fn find_active(&self, id: CategoryId) -> Option<Category> {
        self.find_by_id(id).await.filter(|c| !c.is_deleted())
    }

    /// All active categories, in id order.
    pub async fn find_all_available(&self) -> Result<Vec<Category>> {
        self.store().query(&Predicate::NotDeleted, 0, None).await
    }

    /// Category by unique name, soft-deleted rows included.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        let matches = self
            .find_by_field(fields::NAME, FieldValue::String(name.to_string()))
            .await?;
        Ok(matches.into_iter().next())
    }

    /// Whether a category with this name exists, whatever its delete state.
    pub async fn exists_by_name(&self, name: &str) -> Result<bool> {
        Ok(self.find_by_name(name).await?.is_some())
    }

    /// The subset of `ids` that exist and are active, in input order.
    pub async fn retain_active_ids(&self, ids: &[CategoryId]) -> Result<Vec<CategoryId>> {
        let mut active = Vec::with_capacity(ids.len());
        for id in ids {
            if self.find_active(*id).await.is_some() {
                active.push(*id);
            }
        }
        Ok(active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category_is_unsaved_and_active() {
        let category = Category::new("Fantasy").with_description("Dragons and doorways");
        assert!(category.id.is_none());
        assert!(!category.record.deleted);
        assert_eq!(category.description, "Dragons and doorways");
    }

    #[test]
    fn test_only_name_is_queryable() {
        let category = Category::new("Fantasy");
        assert!(category.field_value(fields::NAME).is_some());
        assert!(category.field_value("description").is_none());
    }
}
