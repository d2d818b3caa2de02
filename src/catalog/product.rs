//! Product entity, search filter, and product-specific finders

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::category::CategoryId;
use crate::core::entity::{Queryable, Record};
use crate::core::error::{Error, Result};
use crate::core::field::{FieldFormat, FieldValue};
use crate::core::predicate::Predicate;
use crate::core::query::PageRequest;
use crate::core::repository::Repository;
use crate::core::store::Datastore;
use crate::{entity_id, impl_entity};

entity_id! {
    /// Identity of a [`Product`] row
    ProductId
}

/// Field names products may be sorted and filtered by
pub mod fields {
    pub const NAME: &str = "name";
    pub const ISBN: &str = "isbn";
    pub const PRICE: &str = "price";
    pub const QUANTITY: &str = "quantity";
    pub const CATEGORY_ID: &str = "category_id";
}

/// Request-parameter keys understood by [`ProductFilter::from_params`]
pub mod params {
    pub const MINIMUM_PRICE: &str = "minimum_price";
    pub const MAXIMUM_PRICE: &str = "maximum_price";
    pub const CATEGORY: &str = "category";
    pub const NAME: &str = "name";
}

/// A book in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identity, `None` until first save
    pub id: Option<ProductId>,

    /// Audit metadata
    #[serde(flatten)]
    pub record: Record,

    /// Title shown in listings and matched by substring search
    pub name: String,

    /// Back-cover description
    pub description: String,

    /// Unique business key
    pub isbn: String,

    /// Exact decimal price
    pub price: Decimal,

    /// Copies in stock; zero means unavailable
    pub quantity: u32,

    /// Owning category
    pub category_id: CategoryId,
}

impl Product {
    /// Create an unsaved product.
    pub fn new(
        name: impl Into<String>,
        isbn: impl Into<String>,
        price: Decimal,
        quantity: u32,
        category_id: CategoryId,
    ) -> Self {
        Self {
            id: None,
            record: Record::new(),
            name: name.into(),
            description: String::new(),
            isbn: isbn.into(),
            price,
            quantity,
            category_id,
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Active and in stock
    pub fn is_available(&self) -> bool {
        !self.record.deleted && self.quantity > 0
    }
}

impl_entity!(Product, ProductId, "product", "products");

impl Queryable for Product {
    fn fields() -> &'static [&'static str] {
        &[
            fields::NAME,
            fields::ISBN,
            fields::PRICE,
            fields::QUANTITY,
            fields::CATEGORY_ID,
        ]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            fields::NAME => Some(FieldValue::String(self.name.clone())),
            fields::ISBN => Some(FieldValue::String(self.isbn.clone())),
            fields::PRICE => Some(FieldValue::Decimal(self.price)),
            fields::QUANTITY => Some(FieldValue::Integer(i64::from(self.quantity))),
            fields::CATEGORY_ID => Some(FieldValue::Id(self.category_id.into())),
            _ => None,
        }
    }
}

/// Optional product search filters.
///
/// Each filter that is present contributes one condition to the composed
/// predicate; absent filters contribute nothing. The soft-delete exclusion
/// is always applied on top, whatever else is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Inclusive lower price bound
    pub min_price: Option<Decimal>,

    /// Inclusive upper price bound
    pub max_price: Option<Decimal>,

    /// Owning category
    pub category: Option<CategoryId>,

    /// Case-sensitive title substring
    pub name: Option<String>,
}

impl ProductFilter {
    /// An empty filter: matches every active product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inclusive lower price bound.
    pub fn min_price(mut self, value: Decimal) -> Self {
        self.min_price = Some(value);
        self
    }

    /// Set the inclusive upper price bound.
    pub fn max_price(mut self, value: Decimal) -> Self {
        self.max_price = Some(value);
        self
    }

    /// Restrict to one category.
    pub fn category(mut self, id: CategoryId) -> Self {
        self.category = Some(id);
        self
    }

    /// Require the title to contain `value` (case-sensitive).
    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    /// Build a filter from string-keyed request parameters.
    ///
    /// Keys are listed in [`params`]; missing keys leave the filter unset.
    /// Malformed numeric or identity values fail here, before anything
    /// reaches the store.
    pub fn from_params(parameters: &HashMap<String, String>) -> Result<Self> {
        let mut filter = Self::new();

        if let Some(raw) = parameters.get(params::MINIMUM_PRICE) {
            let value = raw.parse::<Decimal>().map_err(|_| {
                Error::validation(format!("minimum price `{raw}` is not a decimal number"))
            })?;
            filter.min_price = Some(value);
        }
        if let Some(raw) = parameters.get(params::MAXIMUM_PRICE) {
            let value = raw.parse::<Decimal>().map_err(|_| {
                Error::validation(format!("maximum price `{raw}` is not a decimal number"))
            })?;
            filter.max_price = Some(value);
        }
        if let Some(raw) = parameters.get(params::CATEGORY) {
            let value = raw.parse::<u64>().map_err(|_| {
                Error::validation(format!("category id `{raw}` is not a valid identifier"))
            })?;
            filter.category = Some(CategoryId::from(value));
        }
        if let Some(raw) = parameters.get(params::NAME) {
            filter.name = Some(raw.clone());
        }

        Ok(filter)
    }

    /// Compose the present filters into one conjunction, ending with the
    /// unconditional soft-delete exclusion.
    pub fn predicate(&self) -> Predicate {
        let mut predicate = Predicate::True;
        if let Some(min) = self.min_price {
            predicate = predicate.and(Predicate::ge(fields::PRICE, FieldValue::Decimal(min)));
        }
        if let Some(max) = self.max_price {
            predicate = predicate.and(Predicate::le(fields::PRICE, FieldValue::Decimal(max)));
        }
        if let Some(category) = self.category {
            predicate = predicate.and(Predicate::eq(
                fields::CATEGORY_ID,
                FieldValue::Id(category.into()),
            ));
        }
        if let Some(name) = &self.name {
            predicate = predicate.and(Predicate::contains(fields::NAME, name.clone()));
        }
        predicate.and(Predicate::NotDeleted)
    }
}

/// Repository over products; product-specific finders below
pub type ProductRepository<S> = Repository<Product, S>;

impl<S: Datastore<Product>> Repository<Product, S> {
    /// Paginated multi-filter search over active products.
    ///
    /// Results come back in id order, so consecutive pages are disjoint and
    /// together cover the whole filtered set. A page past the end is an
    /// empty list, not an error.
    pub async fn search(&self, filter: &ProductFilter, page: PageRequest) -> Result<Vec<Product>> {
        self.store()
            .query(&filter.predicate(), page.offset(), Some(page.size()))
            .await
    }

    /// Active products with stock on hand.
    pub async fn find_all_available(&self) -> Result<Vec<Product>> {
        let available =
            Predicate::NotDeleted.and(Predicate::gt(fields::QUANTITY, FieldValue::Integer(0)));
        self.store().query(&available, 0, None).await
    }

    /// Active, in-stock product by id.
    ///
    /// Errors with [`Error::NotFound`] when no such row — a deliberately
    /// different contract from [`Repository::find_by_id`], which returns an
    /// empty option and ignores the soft-delete flag.
    pub async fn find_available_by_id(&self, id: ProductId) -> Result<Product> {
        self.find_by_id(id)
            .await
            .filter(Product::is_available)
            .ok_or_else(|| Error::not_found("product", "id", id.to_string()))
    }

    /// Whether any product carries this ISBN, soft-deleted rows included.
    ///
    /// The ISBN is format-checked before the store is queried.
    pub async fn exists_by_isbn(&self, isbn: &str) -> Result<bool> {
        if !FieldFormat::Isbn.validate(isbn) {
            return Err(Error::validation(format!("`{isbn}` is not a valid ISBN")));
        }
        let matches = self
            .find_by_field(fields::ISBN, FieldValue::String(isbn.to_string()))
            .await?;
        Ok(!matches.is_empty())
    }
}
