// ABOUTME: REST CRUD endpoints for the per-user task store
// ABOUTME: All routes are bearer-authenticated and tenant-scoped by path user id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 taskchat contributors

//! Task routes under `/api/{user_id}/tasks`.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use axum::routing::{get, patch};
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;

use super::authorize_tenant;
use crate::database::tasks;
use crate::errors::{AppError, AppResult};
use crate::models::{validate_description, validate_title, StatusFilter, Task};
use crate::resources::ServerResources;

/// Task creation body
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Partial task update body
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// Listing filter query string
#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    #[serde(default)]
    pub status: StatusFilter,
}

/// Build the task router
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .route("/api/:user_id/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/:user_id/tasks/:task_id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route(
            "/api/:user_id/tasks/:task_id/complete",
            patch(toggle_complete),
        )
        .with_state(resources)
}

async fn list_tasks(
    State(resources): State<Arc<ServerResources>>,
    Path(user_id): Path<i64>,
    Query(query): Query<ListTasksQuery>,
    headers: HeaderMap,
) -> AppResult<Json<Vec<Task>>> {
    authorize_tenant(&resources, &headers, user_id)?;

    let mut conn = resources.database.pool().acquire().await?;
    let items = tasks::list_tasks(&mut conn, user_id, query.status).await?;
    Ok(Json(items))
}

async fn create_task(
    State(resources): State<Arc<ServerResources>>,
    Path(user_id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<Task>)> {
    authorize_tenant(&resources, &headers, user_id)?;
    validate_title(&request.title)?;
    validate_description(&request.description)?;

    let mut conn = resources.database.pool().acquire().await?;
    let task = tasks::create_task(&mut conn, user_id, &request.title, &request.description).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn get_task(
    State(resources): State<Arc<ServerResources>>,
    Path((user_id, task_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> AppResult<Json<Task>> {
    authorize_tenant(&resources, &headers, user_id)?;

    let mut conn = resources.database.pool().acquire().await?;
    let task = tasks::get_task(&mut conn, user_id, task_id)
        .await?
        .ok_or_else(|| AppError::not_found("Task"))?;
    Ok(Json(task))
}

async fn update_task(
    State(resources): State<Arc<ServerResources>>,
    Path((user_id, task_id)): Path<(i64, i64)>,
    headers: HeaderMap,
    Json(request): Json<UpdateTaskRequest>,
) -> AppResult<Json<Task>> {
    authorize_tenant(&resources, &headers, user_id)?;
    if let Some(ref title) = request.title {
        validate_title(title)?;
    }
    if let Some(ref description) = request.description {
        validate_description(description)?;
    }

    let mut conn = resources.database.pool().acquire().await?;
    let task = tasks::update_task(
        &mut conn,
        user_id,
        task_id,
        request.title.as_deref(),
        request.description.as_deref(),
        request.completed,
    )
    .await?
    .ok_or_else(|| AppError::not_found("Task"))?;
    Ok(Json(task))
}

async fn delete_task(
    State(resources): State<Arc<ServerResources>>,
    Path((user_id, task_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> AppResult<StatusCode> {
    authorize_tenant(&resources, &headers, user_id)?;

    let mut conn = resources.database.pool().acquire().await?;
    tasks::delete_task(&mut conn, user_id, task_id)
        .await?
        .ok_or_else(|| AppError::not_found("Task"))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_complete(
    State(resources): State<Arc<ServerResources>>,
    Path((user_id, task_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> AppResult<Json<Task>> {
    authorize_tenant(&resources, &headers, user_id)?;

    let mut conn = resources.database.pool().acquire().await?;
    let task = tasks::toggle_complete(&mut conn, user_id, task_id)
        .await?
        .ok_or_else(|| AppError::not_found("Task"))?;
    Ok(Json(task))
}
