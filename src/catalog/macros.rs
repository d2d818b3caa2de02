//! Macros for reducing boilerplate when defining catalog entities
//!
//! Every persisted type carries the same two base fields — `id:
//! Option<SomeId>` and `record: Record` — and the same accessor-style
//! [`Entity`](crate::core::entity::Entity) implementation over them. These
//! macros generate that repetition.

/// Define a store-assigned identifier newtype.
///
/// The wrapped value is the raw sequence number handed out by the store;
/// the `From<u64>` conversion is what lets a backend mint fresh ids.
///
/// # Example
/// ```rust,ignore
/// entity_id! {
///     /// Identity of a [`Product`] row
///     ProductId
/// }
/// ```
#[macro_export]
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl ::std::convert::From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl ::std::convert::From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl $crate::core::entity::EntityId for $name {}
    };
}

/// Implement [`Entity`](crate::core::entity::Entity) for a struct carrying
/// `id: Option<$id>` and `record: Record` fields.
///
/// # Example
/// ```rust,ignore
/// impl_entity!(Product, ProductId, "product", "products");
/// ```
#[macro_export]
macro_rules! impl_entity {
    ($type:ident, $id:ty, $singular:expr, $collection:expr) => {
        impl $crate::core::entity::Entity for $type {
            type Id = $id;

            fn entity_name() -> &'static str {
                $singular
            }

            fn collection() -> &'static str {
                $collection
            }

            fn id(&self) -> Option<$id> {
                self.id
            }

            fn set_id(&mut self, id: $id) {
                self.id = Some(id);
            }

            fn record(&self) -> &$crate::core::entity::Record {
                &self.record
            }

            fn record_mut(&mut self) -> &mut $crate::core::entity::Record {
                &mut self.record
            }
        }
    };
}
