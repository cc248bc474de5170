// ABOUTME: The bounded tool-calling conversation loop driving one chat turn
// ABOUTME: Sends history to the LLM, executes requested tools, and terminates deterministically
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 taskchat contributors

//! # Agent Loop
//!
//! One call to [`run_turn`] drives a complete chat turn: replay the stored
//! transcript plus the new user message to the model, execute any tool calls
//! it requests against the turn's transaction, feed the results back, and
//! repeat until the model answers in plain text or the iteration cap is hit.
//!
//! Tool failures never abort the loop; they come back from the registry as
//! error payloads the model can react to. Provider failures are fatal to the
//! turn and propagate to the caller, which rolls the transaction back.

use sqlx::SqliteConnection;
use tracing::{debug, info, warn};

use crate::errors::AppResult;
use crate::llm::{todo_system_prompt, ChatMessage, ChatRequest, LlmProvider, MessageRole};
use crate::models::Message;
use crate::tools::{self, ToolContext, ToolKind};

/// Hard cap on model round-trips per turn
pub const MAX_TOOL_ITERATIONS: usize = 5;

/// Reply used when the loop exhausts its iterations without usable text
pub const FALLBACK_REPLY: &str =
    "I apologize, but I encountered an issue processing your request.";

/// Result of one completed chat turn
#[derive(Debug, Clone)]
pub struct AgentOutcome {
    /// The assistant's reply text
    pub reply: String,
    /// Names of every tool invoked, in execution order, duplicates included
    pub invoked_tools: Vec<String>,
}

/// Run one chat turn against the model.
///
/// `history` is the conversation's full stored transcript; `user_message` is
/// the new message, already validated by the caller. All tool side effects go
/// through `session`, so they share the caller's transaction.
///
/// # Errors
///
/// Returns an error if the provider call fails. Tool failures do not error;
/// they are surfaced to the model as result payloads.
pub async fn run_turn(
    provider: &dyn LlmProvider,
    session: &mut SqliteConnection,
    owner_id: i64,
    history: &[Message],
    user_message: &str,
) -> AppResult<AgentOutcome> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(todo_system_prompt()));
    for stored in history {
        let role = if stored.role == "assistant" {
            MessageRole::Assistant
        } else {
            MessageRole::User
        };
        messages.push(ChatMessage::new(role, stored.content.clone()));
    }
    messages.push(ChatMessage::user(user_message));

    let declarations = ToolKind::declarations();
    let mut invoked_tools = Vec::new();

    for iteration in 1..=MAX_TOOL_ITERATIONS {
        debug!(iteration, owner_id, "Agent iteration");

        let request = ChatRequest::new(messages.clone());
        let response = provider.complete_with_tools(&request, &declarations).await?;

        let Some(tool_calls) = response.tool_calls.filter(|calls| !calls.is_empty()) else {
            info!(
                iteration,
                tools = invoked_tools.len(),
                "Turn finished with final answer"
            );
            return Ok(AgentOutcome {
                reply: response.content.unwrap_or_default(),
                invoked_tools,
            });
        };

        // Keep the raw assistant frame so the next round-trip replays the
        // model's own tool requests verbatim.
        messages.push(ChatMessage::assistant_with_tools(
            response.content,
            tool_calls.clone(),
        ));

        for call in tool_calls {
            invoked_tools.push(call.name.clone());

            let mut ctx = ToolContext::new(owner_id, &mut *session);
            let payload = tools::dispatch(&call.name, call.arguments, &mut ctx).await;

            messages.push(ChatMessage::tool_result(
                call.id,
                call.name,
                payload.to_string(),
            ));
        }
    }

    warn!(
        owner_id,
        tools = invoked_tools.len(),
        "Agent hit iteration cap without a final answer"
    );

    // Best effort: the trailing frame is normally a tool-result payload;
    // return its text rather than nothing.
    let reply = messages
        .last()
        .and_then(|frame| frame.content.clone())
        .filter(|content| !content.is_empty())
        .unwrap_or_else(|| FALLBACK_REPLY.to_owned());

    Ok(AgentOutcome {
        reply,
        invoked_tools,
    })
}
