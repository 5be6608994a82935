//! Issue routes: list, CRUD by id.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::models::issue::{Issue, IssuePayload};
use crate::models::pagination::{ListParams, PagedResult};
use crate::services::issue as issue_service;
use crate::AppState;

/// GET /api/v1/issues — filtered, sorted, paginated list.
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<PagedResult<Issue>>, AppError> {
    let Query(params) = params?;
    let page = issue_service::list(state.store.as_ref(), &params, state.config.per_page).await?;
    Ok(Json(page))
}

/// GET /api/v1/issues/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Issue>, AppError> {
    let Path(id) = id?;
    let issue = issue_service::find_by_id(state.store.as_ref(), id).await?;
    Ok(Json(issue))
}

/// POST /api/v1/issues — 201 with the created issue.
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<IssuePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Issue>), AppError> {
    let Json(payload) = body?;
    let issue = issue_service::create(state.store.as_ref(), &payload).await?;
    Ok((StatusCode::CREATED, Json(issue)))
}

/// PATCH /api/v1/issues/{id} — partial update.
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<IssuePayload>, JsonRejection>,
) -> Result<Json<Issue>, AppError> {
    let Path(id) = id?;
    let Json(payload) = body?;
    let issue = issue_service::update(state.store.as_ref(), id, &payload).await?;
    Ok(Json(issue))
}

/// DELETE /api/v1/issues/{id} — 204 on success.
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    issue_service::delete(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
