//! Route definitions for the `/work` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::work;
use crate::state::AppState;

/// Routes mounted at `/work`.
///
/// ```text
/// GET    /?user_id=     -> list_by_user
/// POST   /              -> start
/// GET    /{id}          -> get_by_id
/// POST   /{id}/stop     -> stop
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(work::list_by_user).post(work::start))
        .route("/{id}", get(work::get_by_id))
        .route("/{id}/stop", post(work::stop))
}
