//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /                       -> list
/// POST   /                       -> create
/// GET    /id/{id}                -> get_by_id
/// PATCH  /id/{id}                -> update_by_id
/// DELETE /id/{id}                -> delete_by_id
/// GET    /passport/{passport}    -> get_by_passport
/// PATCH  /passport/{passport}    -> update_by_passport
/// DELETE /passport/{passport}    -> delete_by_passport
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route(
            "/id/{id}",
            get(users::get_by_id)
                .patch(users::update_by_id)
                .delete(users::delete_by_id),
        )
        .route(
            "/passport/{passport}",
            get(users::get_by_passport)
                .patch(users::update_by_passport)
                .delete(users::delete_by_passport),
        )
}
