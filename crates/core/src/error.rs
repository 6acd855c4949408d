use crate::passport::PassportId;
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A lookup or targeted mutation matched zero rows.
    ///
    /// `key` describes how the row was addressed, e.g. `id 42` or
    /// `passport 1234 567890`.
    #[error("Entity not found: {entity} with {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Invalid identifier format: {0}")]
    InvalidIdentifierFormat(String),

    #[error("No fields to update")]
    NoFieldsToUpdate,

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl CoreError {
    /// `NotFound` for a row addressed by its primary key.
    pub fn not_found_by_id(entity: &'static str, id: DbId) -> Self {
        Self::NotFound {
            entity,
            key: format!("id {id}"),
        }
    }

    /// `NotFound` for a row addressed by its composite passport key.
    pub fn not_found_by_passport(entity: &'static str, passport: &PassportId) -> Self {
        Self::NotFound {
            entity,
            key: format!("passport {passport}"),
        }
    }
}
