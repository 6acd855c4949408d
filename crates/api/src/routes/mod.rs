pub mod health;
pub mod users;
pub mod work;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users                                 list, create
/// /users/id/{id}                         get, update, delete
/// /users/passport/{passport}             get, update, delete
///
/// /work                                  list by user, start
/// /work/{id}                             get
/// /work/{id}/stop                        stop (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/work", work::router())
}
