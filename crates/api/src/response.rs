//! Shared response envelope types for API handlers.
//!
//! All JSON bodies use a `{ "data": ... }` envelope.

use serde::Serialize;
use timetrack_core::types::DbId;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Payload returned by endpoints that create a row.
#[derive(Debug, Serialize)]
pub struct Created {
    pub id: DbId,
}
