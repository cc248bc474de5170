// ABOUTME: Owner-scoped task store operations shared by REST handlers and chat tools
// ABOUTME: All functions run against a caller-supplied SqliteConnection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 taskchat contributors

//! # Task Store
//!
//! Every operation takes `&mut SqliteConnection` as the executor, so the same
//! code path serves pooled CRUD handlers and tools running inside the chat
//! turn's transaction. Every query filters on `user_id`; a row belonging to a
//! different owner is indistinguishable from a missing row.

use crate::errors::{AppError, AppResult};
use crate::models::{StatusFilter, Task};
use chrono::Utc;
use sqlx::{Row, SqliteConnection};

/// Create a new task for the owner and return the full record.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub async fn create_task(
    conn: &mut SqliteConnection,
    owner_id: i64,
    title: &str,
    description: &str,
) -> AppResult<Task> {
    let now = Utc::now();

    let result = sqlx::query(
        r"
        INSERT INTO tasks (user_id, title, description, completed, created_at, updated_at)
        VALUES ($1, $2, $3, 0, $4, $4)
        ",
    )
    .bind(owner_id)
    .bind(title)
    .bind(description)
    .bind(now)
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to create task: {e}")))?;

    Ok(Task {
        id: result.last_insert_rowid(),
        user_id: owner_id,
        title: title.to_owned(),
        description: description.to_owned(),
        completed: false,
        created_at: now,
        updated_at: now,
    })
}

/// List the owner's tasks, newest created first, optionally filtered by
/// completion status.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn list_tasks(
    conn: &mut SqliteConnection,
    owner_id: i64,
    filter: StatusFilter,
) -> AppResult<Vec<Task>> {
    let rows = match filter.completed_flag() {
        Some(completed) => {
            sqlx::query(
                r"
                SELECT * FROM tasks
                WHERE user_id = $1 AND completed = $2
                ORDER BY created_at DESC, id DESC
                ",
            )
            .bind(owner_id)
            .bind(completed)
            .fetch_all(&mut *conn)
            .await
        }
        None => {
            sqlx::query(
                r"
                SELECT * FROM tasks
                WHERE user_id = $1
                ORDER BY created_at DESC, id DESC
                ",
            )
            .bind(owner_id)
            .fetch_all(&mut *conn)
            .await
        }
    }
    .map_err(|e| AppError::database(format!("Failed to list tasks: {e}")))?;

    Ok(rows.iter().map(row_to_task).collect())
}

/// Get one task by id, scoped to the owner.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn get_task(
    conn: &mut SqliteConnection,
    owner_id: i64,
    task_id: i64,
) -> AppResult<Option<Task>> {
    let row = sqlx::query("SELECT * FROM tasks WHERE id = $1 AND user_id = $2")
        .bind(task_id)
        .bind(owner_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to get task: {e}")))?;

    Ok(row.as_ref().map(row_to_task))
}

/// Partially update a task: only supplied fields change, absent fields are
/// preserved. Advances `updated_at`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn update_task(
    conn: &mut SqliteConnection,
    owner_id: i64,
    task_id: i64,
    title: Option<&str>,
    description: Option<&str>,
    completed: Option<bool>,
) -> AppResult<Option<Task>> {
    let Some(task) = get_task(conn, owner_id, task_id).await? else {
        return Ok(None);
    };

    let title = title.unwrap_or(&task.title);
    let description = description.unwrap_or(&task.description);
    let completed = completed.unwrap_or(task.completed);
    let now = Utc::now();

    sqlx::query(
        r"
        UPDATE tasks
        SET title = $1, description = $2, completed = $3, updated_at = $4
        WHERE id = $5 AND user_id = $6
        ",
    )
    .bind(title)
    .bind(description)
    .bind(completed)
    .bind(now)
    .bind(task_id)
    .bind(owner_id)
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to update task: {e}")))?;

    Ok(Some(Task {
        title: title.to_owned(),
        description: description.to_owned(),
        completed,
        updated_at: now,
        ..task
    }))
}

/// Delete a task, scoped to the owner. Returns the deleted record.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn delete_task(
    conn: &mut SqliteConnection,
    owner_id: i64,
    task_id: i64,
) -> AppResult<Option<Task>> {
    let Some(task) = get_task(conn, owner_id, task_id).await? else {
        return Ok(None);
    };

    sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
        .bind(task_id)
        .bind(owner_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete task: {e}")))?;

    Ok(Some(task))
}

/// Toggle a task's completion flag. Advances `updated_at`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn toggle_complete(
    conn: &mut SqliteConnection,
    owner_id: i64,
    task_id: i64,
) -> AppResult<Option<Task>> {
    let Some(task) = get_task(conn, owner_id, task_id).await? else {
        return Ok(None);
    };

    let completed = !task.completed;
    let now = Utc::now();

    sqlx::query(
        r"
        UPDATE tasks
        SET completed = $1, updated_at = $2
        WHERE id = $3 AND user_id = $4
        ",
    )
    .bind(completed)
    .bind(now)
    .bind(task_id)
    .bind(owner_id)
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to toggle task: {e}")))?;

    Ok(Some(Task {
        completed,
        updated_at: now,
        ..task
    }))
}

fn row_to_task(row: &sqlx::sqlite::SqliteRow) -> Task {
    Task {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        description: row.get("description"),
        completed: row.get("completed"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
