//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timetrack_core::passport;
use timetrack_core::patch::Patch;
use timetrack_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub passport_series: String,
    pub passport_number: String,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Public `"SERIES NUMBER"` identifier.
    pub fn passport(&self) -> String {
        passport::encode(&self.passport_series, &self.passport_number)
    }
}

/// User representation for API responses, with the passport re-joined.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub passport: String,
    pub passport_series: String,
    pub passport_number: String,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            passport: user.passport(),
            passport_series: user.passport_series,
            passport_number: user.passport_number,
            name: user.name,
            surname: user.surname,
            address: user.address,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    /// `"SERIES NUMBER"`, decoded before storage.
    pub passport: String,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub address: Option<String>,
}

/// DTO for a partial update. A missing key leaves the column unchanged,
/// `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    #[serde(default)]
    pub name: Patch<Option<String>>,
    #[serde(default)]
    pub surname: Patch<Option<String>>,
    #[serde(default)]
    pub address: Patch<Option<String>>,
}

/// Equality filters for listing users. Absent or empty fields are ignored.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub passport_series: Option<String>,
    pub passport_number: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub address: Option<String>,
}

impl UserFilter {
    /// Filterable columns paired with the requested value, in clause order.
    pub fn conditions(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("passport_series", self.passport_series.as_deref()),
            ("passport_number", self.passport_number.as_deref()),
            ("name", self.name.as_deref()),
            ("surname", self.surname.as_deref()),
            ("address", self.address.as_deref()),
        ]
    }
}
