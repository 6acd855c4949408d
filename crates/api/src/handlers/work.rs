//! Handlers for the `/work` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use timetrack_core::types::DbId;
use timetrack_db::models::work::{StartWork, Work};
use timetrack_db::repositories::WorkRepo;

use crate::error::AppResult;
use crate::query::WorkListParams;
use crate::response::{Created, DataResponse};
use crate::state::AppState;

/// POST /api/v1/work
pub async fn start(
    State(state): State<AppState>,
    Json(input): Json<StartWork>,
) -> AppResult<(StatusCode, Json<DataResponse<Created>>)> {
    let id = WorkRepo::start(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: Created { id } })))
}

/// GET /api/v1/work?user_id=
pub async fn list_by_user(
    State(state): State<AppState>,
    Query(params): Query<WorkListParams>,
) -> AppResult<Json<DataResponse<Vec<Work>>>> {
    let works = WorkRepo::list_by_user(&state.pool, params.user_id).await?;
    Ok(Json(DataResponse { data: works }))
}

/// GET /api/v1/work/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Work>>> {
    let work = WorkRepo::find_by_id(&state.pool, id).await?;
    Ok(Json(DataResponse { data: work }))
}

/// POST /api/v1/work/{id}/stop
///
/// Stopping an already-stopped session returns 404.
pub async fn stop(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    WorkRepo::stop(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
