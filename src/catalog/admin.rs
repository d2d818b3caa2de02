//! Admin account entity and natural-key lookups

use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, Queryable, Record};
use crate::core::error::{Error, Result};
use crate::core::field::{FieldFormat, FieldValue};
use crate::core::repository::Repository;
use crate::core::store::Datastore;
use crate::{entity_id, impl_entity};

entity_id! {
    /// Identity of an [`Admin`] row
    AdminId
}

/// Field names admins may be sorted and filtered by
pub mod fields {
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const PHONE_NUMBER: &str = "phone_number";
}

/// A store administrator account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    /// Store-assigned identity, `None` until first save
    pub id: Option<AdminId>,

    /// Audit metadata
    #[serde(flatten)]
    pub record: Record,

    /// Display name
    pub name: String,

    /// Unique login email
    pub email: String,

    /// Contact phone number
    pub phone_number: String,
}

impl Admin {
    /// Create an unsaved admin account.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            record: Record::new(),
            name: name.into(),
            email: email.into(),
            phone_number: phone_number.into(),
        }
    }
}

impl_entity!(Admin, AdminId, "admin", "admins");

impl Queryable for Admin {
    fn fields() -> &'static [&'static str] {
        &[fields::NAME, fields::EMAIL, fields::PHONE_NUMBER]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            fields::NAME => Some(FieldValue::String(self.name.clone())),
            fields::EMAIL => Some(FieldValue::String(self.email.clone())),
            fields::PHONE_NUMBER => Some(FieldValue::String(self.phone_number.clone())),
            _ => None,
        }
    }
}

/// Repository over admin accounts; natural-key lookups below
pub type AdminRepository<S> = Repository<Admin, S>;

impl<S: Datastore<Admin>> Repository<Admin, S> {
    /// Active admin by unique email.
    ///
    /// This is the login path: absence is [`Error::NotFound`], not an empty
    /// option, and soft-deleted accounts cannot be found. A malformed email
    /// is rejected before the store is queried.
    pub async fn find_by_email(&self, email: &str) -> Result<Admin> {
        if !FieldFormat::Email.validate(email) {
            return Err(Error::validation(format!(
                "`{email}` is not a valid email address"
            )));
        }
        let matches = self
            .find_by_field(fields::EMAIL, FieldValue::String(email.to_string()))
            .await?;
        matches
            .into_iter()
            .find(|admin| !admin.is_deleted())
            .ok_or_else(|| Error::not_found("admin", "email", email))
    }

    /// Active admin by phone number; same contract as
    /// [`find_by_email`](Self::find_by_email).
    pub async fn find_by_phone_number(&self, phone_number: &str) -> Result<Admin> {
        let matches = self
            .find_by_field(
                fields::PHONE_NUMBER,
                FieldValue::String(phone_number.to_string()),
            )
            .await?;
        matches
            .into_iter()
            .find(|admin| !admin.is_deleted())
            .ok_or_else(|| Error::not_found("admin", "phone_number", phone_number))
    }

    /// Whether an active admin uses this email.
    pub async fn exists_by_email(&self, email: &str) -> Result<bool> {
        match self.find_by_email(email).await {
            Ok(_) => Ok(true),
            Err(Error::NotFound { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queryable_fields_cover_natural_keys() {
        let admin = Admin::new("Mona", "mona@booktopia.com", "+33612345678");
        assert_eq!(
            admin.field_value(fields::EMAIL),
            Some(FieldValue::String("mona@booktopia.com".to_string()))
        );
        assert!(admin.field_value("password").is_none());
    }
}
