// ABOUTME: Database operations for chat conversations and their message transcripts
// ABOUTME: Owner-scoped CRUD over conversations plus append-only message history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 taskchat contributors

//! # Conversation Storage
//!
//! Conversations and messages, owner-scoped like the task store. Messages are
//! append-only; `created_at` (with the row id as a tiebreaker) defines the
//! transcript order replayed to the model on every turn.
//!
//! All functions take `&mut SqliteConnection` so the chat handler can run them
//! inside the per-turn transaction.

use crate::errors::{AppError, AppResult};
use crate::models::{Conversation, Message};
use chrono::Utc;
use sqlx::{Row, SqliteConnection};

/// Create a new empty conversation for the owner.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub async fn create_conversation(
    conn: &mut SqliteConnection,
    owner_id: i64,
) -> AppResult<Conversation> {
    let now = Utc::now();

    let result = sqlx::query(
        r"
        INSERT INTO conversations (user_id, created_at, updated_at)
        VALUES ($1, $2, $2)
        ",
    )
    .bind(owner_id)
    .bind(now)
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to create conversation: {e}")))?;

    Ok(Conversation {
        id: result.last_insert_rowid(),
        user_id: owner_id,
        created_at: now,
        updated_at: now,
    })
}

/// Get a conversation by id, scoped to the owner.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn get_conversation(
    conn: &mut SqliteConnection,
    owner_id: i64,
    conversation_id: i64,
) -> AppResult<Option<Conversation>> {
    let row = sqlx::query("SELECT * FROM conversations WHERE id = $1 AND user_id = $2")
        .bind(conversation_id)
        .bind(owner_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to get conversation: {e}")))?;

    Ok(row.map(|r| Conversation {
        id: r.get("id"),
        user_id: r.get("user_id"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }))
}

/// Advance a conversation's `updated_at` to now.
///
/// # Errors
///
/// Returns an error if the update fails.
pub async fn touch_conversation(
    conn: &mut SqliteConnection,
    owner_id: i64,
    conversation_id: i64,
) -> AppResult<()> {
    sqlx::query("UPDATE conversations SET updated_at = $1 WHERE id = $2 AND user_id = $3")
        .bind(Utc::now())
        .bind(conversation_id)
        .bind(owner_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to touch conversation: {e}")))?;

    Ok(())
}

/// Load a conversation's full transcript in creation order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn list_messages(
    conn: &mut SqliteConnection,
    owner_id: i64,
    conversation_id: i64,
) -> AppResult<Vec<Message>> {
    let rows = sqlx::query(
        r"
        SELECT * FROM messages
        WHERE conversation_id = $1 AND user_id = $2
        ORDER BY created_at ASC, id ASC
        ",
    )
    .bind(conversation_id)
    .bind(owner_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to list messages: {e}")))?;

    Ok(rows
        .iter()
        .map(|r| Message {
            id: r.get("id"),
            conversation_id: r.get("conversation_id"),
            user_id: r.get("user_id"),
            role: r.get("role"),
            content: r.get("content"),
            created_at: r.get("created_at"),
        })
        .collect())
}

/// Append a message to a conversation's transcript.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub async fn insert_message(
    conn: &mut SqliteConnection,
    owner_id: i64,
    conversation_id: i64,
    role: &str,
    content: &str,
) -> AppResult<Message> {
    let now = Utc::now();

    let result = sqlx::query(
        r"
        INSERT INTO messages (conversation_id, user_id, role, content, created_at)
        VALUES ($1, $2, $3, $4, $5)
        ",
    )
    .bind(conversation_id)
    .bind(owner_id)
    .bind(role)
    .bind(content)
    .bind(now)
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to insert message: {e}")))?;

    Ok(Message {
        id: result.last_insert_rowid(),
        conversation_id,
        user_id: owner_id,
        role: role.to_owned(),
        content: content.to_owned(),
        created_at: now,
    })
}
