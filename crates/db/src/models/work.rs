//! Work session model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timetrack_core::types::{DbId, Timestamp};

/// A row from the `work` table.
///
/// `stopped_at` is `None` while the session is running.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Work {
    pub id: DbId,
    pub user_id: DbId,
    pub started_at: Timestamp,
    pub stopped_at: Option<Timestamp>,
}

/// DTO for starting a work session.
#[derive(Debug, Clone, Deserialize)]
pub struct StartWork {
    pub user_id: DbId,
}
