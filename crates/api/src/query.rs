//! Query parameter types for API handlers.

use serde::Deserialize;
use timetrack_core::error::CoreError;
use timetrack_core::pagination::PageRequest;
use timetrack_core::types::DbId;
use timetrack_db::models::user::UserFilter;

/// `GET /users` parameters: equality filters plus `?page=&per_page=`.
///
/// Kept flat (no `#[serde(flatten)]`) so numeric fields parse from the
/// query string.
#[derive(Debug, Default, Deserialize)]
pub struct UserListParams {
    pub passport_series: Option<String>,
    pub passport_number: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub address: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl UserListParams {
    /// Split into the repository's filter and a validated page request.
    pub fn into_parts(self) -> Result<(UserFilter, PageRequest), CoreError> {
        let page = PageRequest::from_query(self.page, self.per_page)?;
        let filter = UserFilter {
            passport_series: self.passport_series,
            passport_number: self.passport_number,
            name: self.name,
            surname: self.surname,
            address: self.address,
        };
        Ok((filter, page))
    }
}

/// `GET /work?user_id=` parameters.
#[derive(Debug, Deserialize)]
pub struct WorkListParams {
    pub user_id: DbId,
}
