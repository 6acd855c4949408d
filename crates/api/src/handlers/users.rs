//! Handlers for the `/users` resource.
//!
//! Users are addressed either by id (`/users/id/{id}`) or by the public
//! `"SERIES NUMBER"` passport identifier (`/users/passport/{passport}`,
//! percent-encoded in the URL).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use timetrack_core::types::DbId;
use timetrack_db::models::user::{CreateUser, UpdateUser, UserResponse};
use timetrack_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::query::UserListParams;
use crate::response::{Created, DataResponse};
use crate::state::AppState;

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<DataResponse<Created>>)> {
    let id = UserRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: Created { id } })))
}

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<UserListParams>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let (filter, page) = params.into_parts()?;
    let users = UserRepo::list(&state.pool, &filter, &page).await?;
    Ok(Json(DataResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// GET /api/v1/users/id/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, id).await?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// GET /api/v1/users/passport/{passport}
pub async fn get_by_passport(
    State(state): State<AppState>,
    Path(passport): Path<String>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_passport(&state.pool, &passport).await?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// PATCH /api/v1/users/id/{id}
pub async fn update_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<StatusCode> {
    UserRepo::update_by_id(&state.pool, id, &input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/users/passport/{passport}
pub async fn update_by_passport(
    State(state): State<AppState>,
    Path(passport): Path<String>,
    Json(input): Json<UpdateUser>,
) -> AppResult<StatusCode> {
    UserRepo::update_by_passport(&state.pool, &passport, &input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/users/id/{id}
pub async fn delete_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    UserRepo::delete_by_id(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/users/passport/{passport}
pub async fn delete_by_passport(
    State(state): State<AppState>,
    Path(passport): Path<String>,
) -> AppResult<StatusCode> {
    UserRepo::delete_by_passport(&state.pool, &passport).await?;
    Ok(StatusCode::NO_CONTENT)
}
