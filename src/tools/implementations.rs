// ABOUTME: Bodies of the five task tools with their argument structs
// ABOUTME: Each runs in a savepoint so a failed tool leaves the turn transaction intact
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 taskchat contributors

//! Tool implementations.
//!
//! Each tool takes typed arguments (decoded by the registry), the enforced
//! owner id, and the turn's connection. Store writes run inside a savepoint
//! (`conn.begin()` nests when the outer transaction is open), so a
//! persistence failure unwinds only the tool's own work. Success payloads
//! carry `status: "success"` plus tool-specific fields; failures return
//! `Err` and are converted to error payloads at the dispatch boundary.

use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::{Connection, SqliteConnection};

use crate::database::tasks;
use crate::errors::{AppError, AppResult};
use crate::models::{validate_description, validate_title, StatusFilter, Task};

// ============================================================================
// Argument Structs
// ============================================================================

/// Arguments for `add_task`
#[derive(Debug, Deserialize)]
pub struct AddTaskArgs {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Arguments for `list_tasks`
#[derive(Debug, Deserialize)]
pub struct ListTasksArgs {
    #[serde(default)]
    pub status: StatusFilter,
}

/// Arguments for `update_task`
#[derive(Debug, Deserialize)]
pub struct UpdateTaskArgs {
    pub task_id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Arguments for `delete_task`
#[derive(Debug, Deserialize)]
pub struct DeleteTaskArgs {
    pub task_id: i64,
}

/// Arguments for `complete_task`
#[derive(Debug, Deserialize)]
pub struct CompleteTaskArgs {
    pub task_id: i64,
}

// ============================================================================
// Tool Bodies
// ============================================================================

/// Create a new task for the owner.
///
/// # Errors
///
/// Returns an error if validation or the insert fails.
pub async fn add_task(
    conn: &mut SqliteConnection,
    owner_id: i64,
    args: AddTaskArgs,
) -> AppResult<Value> {
    validate_title(&args.title)?;
    validate_description(&args.description)?;

    let mut sp = conn
        .begin()
        .await
        .map_err(|e| AppError::database(format!("Failed to create task: {e}")))?;
    let task = tasks::create_task(&mut sp, owner_id, &args.title, &args.description).await?;
    sp.commit()
        .await
        .map_err(|e| AppError::database(format!("Failed to create task: {e}")))?;

    Ok(json!({
        "task_id": task.id,
        "status": "success",
        "title": task.title,
        "message": format!("Task '{}' created successfully", task.title),
    }))
}

/// List the owner's tasks, optionally filtered by completion status.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn list_tasks(
    conn: &mut SqliteConnection,
    owner_id: i64,
    args: ListTasksArgs,
) -> AppResult<Value> {
    let items = tasks::list_tasks(conn, owner_id, args.status).await?;
    let task_list: Vec<Value> = items.iter().map(task_entry).collect();

    Ok(json!({
        "status": "success",
        "count": task_list.len(),
        "tasks": task_list,
        "message": format!("Found {} task(s)", task_list.len()),
    }))
}

/// Update a task's title and/or description.
///
/// # Errors
///
/// Returns an error if validation fails, the task is missing, or the update
/// fails.
pub async fn update_task(
    conn: &mut SqliteConnection,
    owner_id: i64,
    args: UpdateTaskArgs,
) -> AppResult<Value> {
    if let Some(ref title) = args.title {
        validate_title(title)?;
    }
    if let Some(ref description) = args.description {
        validate_description(description)?;
    }

    let mut sp = conn
        .begin()
        .await
        .map_err(|e| AppError::database(format!("Failed to update task: {e}")))?;
    let updated = tasks::update_task(
        &mut sp,
        owner_id,
        args.task_id,
        args.title.as_deref(),
        args.description.as_deref(),
        None,
    )
    .await?;
    let Some(task) = updated else {
        return Err(AppError::not_found(format!("Task {}", args.task_id)));
    };
    sp.commit()
        .await
        .map_err(|e| AppError::database(format!("Failed to update task: {e}")))?;

    Ok(json!({
        "task_id": task.id,
        "status": "success",
        "title": task.title,
        "message": format!("Task '{}' updated successfully", task.title),
    }))
}

/// Delete a task.
///
/// # Errors
///
/// Returns an error if the task is missing or the delete fails.
pub async fn delete_task(
    conn: &mut SqliteConnection,
    owner_id: i64,
    args: DeleteTaskArgs,
) -> AppResult<Value> {
    let mut sp = conn
        .begin()
        .await
        .map_err(|e| AppError::database(format!("Failed to delete task: {e}")))?;
    let Some(task) = tasks::delete_task(&mut sp, owner_id, args.task_id).await? else {
        return Err(AppError::not_found(format!("Task {}", args.task_id)));
    };
    sp.commit()
        .await
        .map_err(|e| AppError::database(format!("Failed to delete task: {e}")))?;

    Ok(json!({
        "task_id": args.task_id,
        "status": "success",
        "message": format!("Task '{}' deleted successfully", task.title),
    }))
}

/// Toggle a task's completion flag.
///
/// # Errors
///
/// Returns an error if the task is missing or the update fails.
pub async fn complete_task(
    conn: &mut SqliteConnection,
    owner_id: i64,
    args: CompleteTaskArgs,
) -> AppResult<Value> {
    let mut sp = conn
        .begin()
        .await
        .map_err(|e| AppError::database(format!("Failed to toggle task: {e}")))?;
    let Some(task) = tasks::toggle_complete(&mut sp, owner_id, args.task_id).await? else {
        return Err(AppError::not_found(format!("Task {}", args.task_id)));
    };
    sp.commit()
        .await
        .map_err(|e| AppError::database(format!("Failed to toggle task: {e}")))?;

    let status_text = if task.completed {
        "completed"
    } else {
        "marked as pending"
    };

    Ok(json!({
        "task_id": task.id,
        "status": "success",
        "completed": task.completed,
        "title": task.title,
        "message": format!("Task '{}' {status_text}", task.title),
    }))
}

// ============================================================================
// Helpers
// ============================================================================

fn task_entry(task: &Task) -> Value {
    json!({
        "id": task.id,
        "title": task.title,
        "description": task.description,
        "completed": task.completed,
        "created_at": task.created_at.to_rfc3339(),
    })
}
