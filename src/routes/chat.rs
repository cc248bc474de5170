// ABOUTME: The chat endpoint driving the LLM agent loop inside one transaction
// ABOUTME: Commits transcript and tool side effects atomically per turn
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 taskchat contributors

//! Chat route: `POST /api/{user_id}/chat`.
//!
//! One transaction spans the whole turn: conversation resolution, history
//! load, every tool side effect, and the transcript append. A single commit
//! makes them visible together; any failure before it rolls everything back.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::authorize_tenant;
use crate::agent;
use crate::database::chat;
use crate::errors::{AppError, AppResult};
use crate::models::validate_message;
use crate::resources::ServerResources;

/// Chat request body
#[derive(Debug, Deserialize)]
pub struct ChatTurnRequest {
    /// Existing conversation to continue; a new one is created when absent
    pub conversation_id: Option<i64>,
    /// The user's message
    pub message: String,
}

/// Chat response body
#[derive(Debug, Serialize)]
pub struct ChatTurnResponse {
    pub conversation_id: i64,
    pub response: String,
    pub tool_calls: Vec<String>,
}

/// Build the chat router
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .route("/api/:user_id/chat", post(chat_turn))
        .with_state(resources)
}

async fn chat_turn(
    State(resources): State<Arc<ServerResources>>,
    Path(user_id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<ChatTurnRequest>,
) -> AppResult<Json<ChatTurnResponse>> {
    authorize_tenant(&resources, &headers, user_id)?;
    validate_message(&request.message)?;

    let mut tx = resources.database.pool().begin().await?;

    let conversation = match request.conversation_id {
        Some(id) => chat::get_conversation(&mut tx, user_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Conversation"))?,
        None => chat::create_conversation(&mut tx, user_id).await?,
    };

    // History is loaded before the new message is stored; the agent receives
    // the new message separately.
    let history = chat::list_messages(&mut tx, user_id, conversation.id).await?;

    let outcome = agent::run_turn(
        resources.llm.as_ref(),
        &mut tx,
        user_id,
        &history,
        &request.message,
    )
    .await?;

    chat::insert_message(&mut tx, user_id, conversation.id, "user", &request.message).await?;
    chat::insert_message(
        &mut tx,
        user_id,
        conversation.id,
        "assistant",
        &outcome.reply,
    )
    .await?;
    chat::touch_conversation(&mut tx, user_id, conversation.id).await?;

    tx.commit().await?;

    info!(
        user_id,
        conversation_id = conversation.id,
        tools = outcome.invoked_tools.len(),
        "Chat turn committed"
    );

    Ok(Json(ChatTurnResponse {
        conversation_id: conversation.id,
        response: outcome.reply,
        tool_calls: outcome.invoked_tools,
    }))
}
